use crate::config::ReportConfig;
use crate::order::{Order, Report};
use log::debug;

/// Rows reserved for the merged branding block at the top of the sheet
pub const BRANDING_ROWS: u32 = 3;

/// Last column (0-based, so D) covered by the branding block
pub const BRANDING_LAST_COL: u16 = 3;

/// Longest text Excel accepts in a single cell
pub const MAX_CELL_CHARS: usize = 32_767;

pub const HARDWARE_HEADERS: [&str; 3] = ["Product", "Model Number", "Serial Number"];
pub const SOFTWARE_HEADERS: [&str; 3] = ["Software Name", "License Type", "License Key"];

/// The two tables a report can contain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Hardware,
    Software,
}

/// What a row of the sheet is for; decides how it is formatted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Branding,
    Title,
    Greeting,
    Message,
    Metadata,
    Blank,
    SectionTitle(Section),
    Header(Section),
    Data(Section),
    Separator,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutRow {
    pub kind: RowKind,
    pub cells: Vec<String>,
}

/// A fully positioned report: row `i` of `rows` is worksheet row `i`
#[derive(Clone, Debug, PartialEq)]
pub struct SheetLayout {
    pub rows: Vec<LayoutRow>,
    pub column_widths: [f64; 3],
}

impl SheetLayout {
    /// Number of worksheet rows used
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row indexes of every row of the given kind, top to bottom
    pub fn positions(&self, kind: RowKind) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.kind == kind)
            .map(|(index, _)| index)
            .collect()
    }

    /// Cell texts of the data rows in a section, top to bottom
    pub fn data_rows(&self, section: Section) -> Vec<&[String]> {
        self.rows
            .iter()
            .filter(|row| row.kind == RowKind::Data(section))
            .map(|row| row.cells.as_slice())
            .collect()
    }
}

/// Place every part of the report on the sheet
///
/// The layout is fixed and top to bottom: branding block, title, customer
/// message, order metadata, then the hardware and software sections when
/// they have items. Nothing here can fail; missing values become blank cells.
///
/// # Arguments
/// * `report` - Order and line items to lay out
/// * `config` - Texts and options for the fixed parts of the sheet
///
/// # Returns
/// * `SheetLayout` - One entry per worksheet row
///
/// # Examples
/// ```
/// use safari_serials::config::ReportConfig;
/// use safari_serials::layout::{lay_out, Section};
/// use safari_serials::order::{HardwareLineItem, Order, Report};
///
/// let report = Report::new(Order::new("Acme Co", "123"))
///     .with_hardware(HardwareLineItem::new("Router", "RT-1", ["S1", "S2"]));
/// let layout = lay_out(&report, &ReportConfig::default());
/// assert_eq!(layout.data_rows(Section::Hardware).len(), 2);
/// ```
pub fn lay_out(report: &Report, config: &ReportConfig) -> SheetLayout {
    let mut sheet = LayoutWriter::default();

    for _ in 0..BRANDING_ROWS {
        sheet.push(RowKind::Branding, Vec::new());
    }
    sheet.push(RowKind::Title, vec![config.title.clone()]);
    sheet.blank();
    sheet.push(RowKind::Greeting, vec![config.greeting.clone()]);
    sheet.push(RowKind::Message, vec![config.message.clone()]);
    sheet.blank();

    for (label, value) in metadata(&report.order) {
        sheet.push(RowKind::Metadata, vec![label.to_string(), value]);
    }

    if !report.hardware.is_empty() {
        sheet.section_heading(Section::Hardware, &config.hardware_title, HARDWARE_HEADERS);

        let mut emitted_item = false;
        for item in &report.hardware {
            let mut serials = item.entries().peekable();
            if serials.peek().is_none() {
                continue;
            }
            if emitted_item && config.separate_hardware_items {
                sheet.push(RowKind::Separator, vec![String::new(); 3]);
            }
            for serial in serials {
                sheet.push(
                    RowKind::Data(Section::Hardware),
                    vec![item.product.clone(), item.model.clone(), serial.to_string()],
                );
            }
            emitted_item = true;
        }
    }

    if !report.software.is_empty() {
        sheet.section_heading(Section::Software, &config.software_title, SOFTWARE_HEADERS);

        for item in &report.software {
            for key in item.entries() {
                sheet.push(
                    RowKind::Data(Section::Software),
                    vec![item.name.clone(), item.license_type.clone(), key.to_string()],
                );
            }
        }
    }

    let layout = SheetLayout {
        rows: sheet.rows,
        column_widths: config.column_widths,
    };
    debug!(
        "laid out report for order {:?}: {} rows",
        report.order.order_number,
        layout.len()
    );
    layout
}

fn metadata(order: &Order) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Client Name:", order.client_name.clone()),
        ("Order Number:", order.order_number.clone()),
    ];
    if let Some(po) = order.po() {
        rows.push(("Client PO:", po.to_string()));
    }
    if let Some(date) = order.report_date {
        rows.push(("Report Date:", date.format("%B %-d, %Y").to_string()));
    }
    rows
}

#[derive(Default)]
struct LayoutWriter {
    rows: Vec<LayoutRow>,
}

impl LayoutWriter {
    fn push(&mut self, kind: RowKind, cells: Vec<String>) {
        let cells = cells.into_iter().map(clamp_cell).collect();
        self.rows.push(LayoutRow { kind, cells });
    }

    fn blank(&mut self) {
        self.push(RowKind::Blank, Vec::new());
    }

    /// Exactly one blank row before the next block
    fn ensure_gap(&mut self) {
        if self.rows.last().map(|row| row.kind) != Some(RowKind::Blank) {
            self.blank();
        }
    }

    fn section_heading(&mut self, section: Section, title: &str, headers: [&str; 3]) {
        self.ensure_gap();
        self.push(RowKind::SectionTitle(section), vec![title.to_string()]);
        self.push(
            RowKind::Header(section),
            headers.iter().map(|h| h.to_string()).collect(),
        );
        debug!("{:?} header at row {}", section, self.rows.len() - 1);
    }
}

fn clamp_cell(text: String) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        text
    } else {
        text.chars().take(MAX_CELL_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{HardwareLineItem, SoftwareLineItem};
    use chrono::NaiveDate;

    fn kinds(layout: &SheetLayout) -> Vec<RowKind> {
        layout.rows.iter().map(|row| row.kind).collect()
    }

    fn acme() -> Order {
        Order::new("Acme Co", "123")
    }

    #[test]
    fn empty_report_has_only_fixed_rows() {
        let layout = lay_out(&Report::new(acme()), &ReportConfig::default());

        assert_eq!(
            kinds(&layout),
            vec![
                RowKind::Branding,
                RowKind::Branding,
                RowKind::Branding,
                RowKind::Title,
                RowKind::Blank,
                RowKind::Greeting,
                RowKind::Message,
                RowKind::Blank,
                RowKind::Metadata,
                RowKind::Metadata,
            ]
        );
        assert_eq!(layout.rows[8].cells, vec!["Client Name:", "Acme Co"]);
        assert_eq!(layout.rows[9].cells, vec!["Order Number:", "123"]);
    }

    #[test]
    fn po_and_date_add_metadata_rows() {
        let order = acme()
            .with_po("PO-55")
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        let layout = lay_out(&Report::new(order), &ReportConfig::default());

        let metadata: Vec<&Vec<String>> = layout
            .rows
            .iter()
            .filter(|row| row.kind == RowKind::Metadata)
            .map(|row| &row.cells)
            .collect();
        assert_eq!(metadata.len(), 4);
        assert_eq!(metadata[2], &vec!["Client PO:".to_string(), "PO-55".to_string()]);
        assert_eq!(
            metadata[3],
            &vec!["Report Date:".to_string(), "March 5, 2024".to_string()]
        );
    }

    #[test]
    fn blank_order_fields_still_lay_out() {
        let layout = lay_out(&Report::new(Order::default()), &ReportConfig::default());
        assert_eq!(layout.rows[8].cells, vec!["Client Name:", ""]);
        assert_eq!(layout.rows[9].cells, vec!["Order Number:", ""]);
    }

    #[test]
    fn hardware_rows_repeat_product_per_serial_in_order() {
        let report = Report::new(acme())
            .with_hardware(HardwareLineItem::new("Switch", "SW-24", ["S1", "S2", "S3"]))
            .with_hardware(HardwareLineItem::new("Router", "RT-9", ["R1"]));
        let layout = lay_out(&report, &ReportConfig::default());

        let rows = layout.data_rows(Section::Hardware);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], ["Switch", "SW-24", "S1"]);
        assert_eq!(rows[1], ["Switch", "SW-24", "S2"]);
        assert_eq!(rows[2], ["Switch", "SW-24", "S3"]);
        assert_eq!(rows[3], ["Router", "RT-9", "R1"]);
    }

    #[test]
    fn hardware_section_starts_after_one_gap_row() {
        let report = Report::new(acme())
            .with_hardware(HardwareLineItem::new("Switch", "SW-24", ["S1"]));
        let layout = lay_out(&report, &ReportConfig::default());

        assert_eq!(layout.rows[10].kind, RowKind::Blank);
        assert_eq!(layout.rows[11].kind, RowKind::SectionTitle(Section::Hardware));
        assert_eq!(layout.rows[11].cells, vec!["Hardware"]);
        assert_eq!(layout.rows[12].kind, RowKind::Header(Section::Hardware));
        assert_eq!(layout.rows[12].cells, HARDWARE_HEADERS);
        assert_eq!(layout.rows[13].cells, vec!["Switch", "SW-24", "S1"]);
    }

    #[test]
    fn separators_sit_between_hardware_items_only() {
        let report = Report::new(acme())
            .with_hardware(HardwareLineItem::new("A", "a", ["1", "2"]))
            .with_hardware(HardwareLineItem::new("B", "b", ["3"]))
            .with_hardware(HardwareLineItem::new("C", "c", ["4"]));
        let layout = lay_out(&report, &ReportConfig::default());

        let header = layout.positions(RowKind::Header(Section::Hardware))[0];
        assert_eq!(
            kinds(&layout)[header + 1..].to_vec(),
            vec![
                RowKind::Data(Section::Hardware),
                RowKind::Data(Section::Hardware),
                RowKind::Separator,
                RowKind::Data(Section::Hardware),
                RowKind::Separator,
                RowKind::Data(Section::Hardware),
            ]
        );
    }

    #[test]
    fn separators_can_be_switched_off() {
        let config = ReportConfig {
            separate_hardware_items: false,
            ..ReportConfig::default()
        };
        let report = Report::new(acme())
            .with_hardware(HardwareLineItem::new("A", "a", ["1"]))
            .with_hardware(HardwareLineItem::new("B", "b", ["2"]));
        let layout = lay_out(&report, &config);

        assert!(layout.positions(RowKind::Separator).is_empty());
        assert_eq!(layout.data_rows(Section::Hardware).len(), 2);
    }

    #[test]
    fn items_without_serials_add_no_rows_or_separators() {
        let report = Report::new(acme())
            .with_hardware(HardwareLineItem::new("Empty", "E", Vec::<String>::new()))
            .with_hardware(HardwareLineItem::new("A", "a", ["1"]))
            .with_hardware(HardwareLineItem::new("Blank", "B", ["  ", ""]))
            .with_hardware(HardwareLineItem::new("C", "c", ["2"]));
        let layout = lay_out(&report, &ReportConfig::default());

        assert_eq!(layout.positions(RowKind::Separator).len(), 1);
        let rows = layout.data_rows(Section::Hardware);
        assert_eq!(rows, vec![["A", "a", "1"], ["C", "c", "2"]]);
    }

    #[test]
    fn software_rows_follow_hardware_after_a_gap() {
        let report = Report::new(acme())
            .with_hardware(HardwareLineItem::new("Switch", "SW-24", ["S1"]))
            .with_software(SoftwareLineItem::new("Office", "Volume", ["K1", "K2"]))
            .with_software(SoftwareLineItem::new("Antivirus", "Subscription", ["K3"]));
        let layout = lay_out(&report, &ReportConfig::default());

        let title = layout.positions(RowKind::SectionTitle(Section::Software))[0];
        assert_eq!(layout.rows[title - 1].kind, RowKind::Blank);
        assert_eq!(layout.rows[title - 2].kind, RowKind::Data(Section::Hardware));
        assert_eq!(layout.rows[title + 1].cells, SOFTWARE_HEADERS);

        let rows = layout.data_rows(Section::Software);
        assert_eq!(
            rows,
            vec![
                ["Office", "Volume", "K1"],
                ["Office", "Volume", "K2"],
                ["Antivirus", "Subscription", "K3"],
            ]
        );
        // no separators in the software table
        assert!(layout.positions(RowKind::Separator).is_empty());
    }

    #[test]
    fn software_only_report_has_a_single_gap() {
        let report = Report::new(acme())
            .with_software(SoftwareLineItem::new("Office", "Volume", ["K1"]));
        let layout = lay_out(&report, &ReportConfig::default());

        assert!(layout.positions(RowKind::SectionTitle(Section::Hardware)).is_empty());
        assert_eq!(layout.rows[10].kind, RowKind::Blank);
        assert_eq!(layout.rows[11].kind, RowKind::SectionTitle(Section::Software));
        assert_eq!(layout.rows[9].kind, RowKind::Metadata);
    }

    #[test]
    fn blank_keys_never_reach_the_sheet() {
        let report = Report::new(acme())
            .with_software(SoftwareLineItem::new("Office", "Volume", ["", "K1", " \t "]));
        let layout = lay_out(&report, &ReportConfig::default());

        let rows = layout.data_rows(Section::Software);
        assert_eq!(rows, vec![["Office", "Volume", "K1"]]);
        assert!(layout.rows.iter().all(|row| row.kind != RowKind::Data(Section::Software)
            || !row.cells[2].trim().is_empty()));
    }

    #[test]
    fn oversized_cells_are_truncated() {
        let long = "x".repeat(MAX_CELL_CHARS + 10);
        let report = Report::new(acme())
            .with_hardware(HardwareLineItem::new(long, "M", ["S"]));
        let layout = lay_out(&report, &ReportConfig::default());

        let rows = layout.data_rows(Section::Hardware);
        assert_eq!(rows[0][0].chars().count(), MAX_CELL_CHARS);
    }

    #[test]
    fn column_widths_come_from_config() {
        let layout = lay_out(&Report::new(acme()), &ReportConfig::default());
        assert_eq!(layout.column_widths, [25.0, 20.0, 40.0]);
    }
}
