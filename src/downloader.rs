use crate::error::ReportError;
use crate::layout::{BRANDING_LAST_COL, BRANDING_ROWS, RowKind, SheetLayout};
use crate::order::Order;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Image, Workbook};

/// MIME type of the generated file
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Longest filename, in bytes, before the `.xlsx` extension
pub const MAX_FILENAME_STEM_BYTES: usize = 200;

const SEPARATOR_FILL: u32 = 0xD9D9D9;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s").unwrap();
    static ref ILLEGAL_FILENAME_CHARS: Regex = Regex::new(r#"[\\/:*?"<>|\p{Cc}]"#).unwrap();
}

/// Formats for each kind of row, built once per workbook
struct ReportFormats {
    branding: Format,
    title: Format,
    greeting: Format,
    message: Format,
    label: Format,
    value: Format,
    section_title: Format,
    header: Format,
    data: Format,
    separator: Format,
}

impl ReportFormats {
    fn new(brand_color: u32) -> Self {
        let brand = Color::RGB(brand_color);
        Self {
            branding: Format::new().set_align(FormatAlign::Left),
            title: Format::new()
                .set_bold()
                .set_font_size(16.0)
                .set_font_color(brand)
                .set_align(FormatAlign::Left),
            greeting: Format::new().set_italic().set_font_size(12.0),
            message: Format::new().set_font_size(12.0),
            label: Format::new().set_bold(),
            value: Format::new(),
            section_title: Format::new()
                .set_bold()
                .set_font_size(13.0)
                .set_font_color(brand),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(brand)
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            data: Format::new().set_border(FormatBorder::Thin),
            separator: Format::new()
                .set_background_color(Color::RGB(SEPARATOR_FILL))
                .set_border(FormatBorder::Thin),
        }
    }

    fn for_cell(&self, kind: RowKind, col: usize) -> &Format {
        match kind {
            RowKind::Branding | RowKind::Blank => &self.branding,
            RowKind::Title => &self.title,
            RowKind::Greeting => &self.greeting,
            RowKind::Message => &self.message,
            RowKind::Metadata if col == 0 => &self.label,
            RowKind::Metadata => &self.value,
            RowKind::SectionTitle(_) => &self.section_title,
            RowKind::Header(_) => &self.header,
            RowKind::Data(_) => &self.data,
            RowKind::Separator => &self.separator,
        }
    }
}

/// Render a laid-out report to XLSX bytes
///
/// Uses the rust_xlsxwriter library to write a single worksheet: the merged
/// branding block (with the logo when one is given), every row of `layout`
/// with the format of its kind, and the fixed column widths.
///
/// # Arguments
/// * `layout` - Rows to write, in worksheet order
/// * `sheet_name` - Name of the worksheet
/// * `brand_color` - RGB colour for the title text and header fill
/// * `logo` - PNG bytes already sized for the branding block, if any
///
/// # Returns
/// * `Result<Vec<u8>, ReportError>` - XLSX file content as bytes or a writer error
pub fn to_xlsx(
    layout: &SheetLayout,
    sheet_name: &str,
    brand_color: u32,
    logo: Option<&[u8]>,
) -> Result<Vec<u8>, ReportError> {
    let formats = ReportFormats::new(brand_color);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    worksheet.merge_range(0, 0, BRANDING_ROWS - 1, BRANDING_LAST_COL, "", &formats.branding)?;
    if let Some(png) = logo {
        // A logo the writer rejects is dropped like any other branding failure
        match Image::new_from_buffer(png) {
            Ok(image) => {
                worksheet.insert_image(0, 0, &image)?;
            }
            Err(e) => warn!("logo rejected by workbook writer: {}, report will have no logo", e),
        }
    }

    for (row, layout_row) in layout.rows.iter().enumerate() {
        let row = row as u32;
        for (col, text) in layout_row.cells.iter().enumerate() {
            let format = formats.for_cell(layout_row.kind, col);
            if text.is_empty() {
                worksheet.write_blank(row, col as u16, format)?;
            } else {
                worksheet.write_string_with_format(row, col as u16, text, format)?;
            }
        }
    }

    for (col, width) in layout.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

/// Download filename for an order
///
/// Built as `<prefix>_<client>_<order>.xlsx`. Whitespace becomes `_`,
/// control characters and characters that are not allowed in file names
/// are dropped, and the part before `.xlsx` is capped at
/// [`MAX_FILENAME_STEM_BYTES`].
///
/// # Examples
/// ```
/// use safari_serials::downloader::report_filename;
/// use safari_serials::order::Order;
///
/// let order = Order::new("Acme Co", "123");
/// assert_eq!(report_filename("SafariMicro", &order), "SafariMicro_Acme_Co_123.xlsx");
/// ```
pub fn report_filename(prefix: &str, order: &Order) -> String {
    let stem = format!("{}_{}_{}", prefix, order.client_name, order.order_number);
    let stem = WHITESPACE.replace_all(&stem, "_");
    let mut stem = ILLEGAL_FILENAME_CHARS.replace_all(&stem, "").into_owned();

    if stem.len() > MAX_FILENAME_STEM_BYTES {
        let mut end = MAX_FILENAME_STEM_BYTES;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem.truncate(end);
    }

    format!("{}.xlsx", stem)
}
