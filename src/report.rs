use crate::branding::{LogoSource, NoLogo, prepare_logo};
use crate::config::ReportConfig;
use crate::downloader::{XLSX_MIME, report_filename, to_xlsx};
use crate::error::ReportError;
use crate::layout::{SheetLayout, lay_out};
use crate::order::{HardwareLineItem, Order, Report, SoftwareLineItem};
use log::debug;

/// A generated report ready to hand to whoever delivers the file
#[derive(Clone, Debug)]
pub struct ReportDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns orders into serial number / license key workbooks
///
/// Holds no per-report state, so one builder can serve any number of
/// reports, including from several threads.
///
/// # Examples
/// ```
/// use safari_serials::order::{HardwareLineItem, Order, Report};
/// use safari_serials::report::ReportBuilder;
///
/// let report = Report::new(Order::new("Acme Co", "123"))
///     .with_hardware(HardwareLineItem::new("Switch", "SW-24", ["SN1", "SN2"]));
///
/// let document = ReportBuilder::default().build_document(&report).unwrap();
/// assert_eq!(document.filename, "SafariMicro_Acme_Co_123.xlsx");
/// assert_eq!(&document.bytes[0..2], b"PK");
/// ```
pub struct ReportBuilder {
    config: ReportConfig,
    logo: Box<dyn LogoSource>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

impl ReportBuilder {
    pub fn new(config: ReportConfig) -> Self {
        ReportBuilder {
            config,
            logo: Box::new(NoLogo),
        }
    }

    /// Use `logo` for the branding block
    pub fn with_logo(mut self, logo: impl LogoSource + 'static) -> Self {
        self.logo = Box::new(logo);
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Rows the report would occupy, without rendering anything
    pub fn layout(&self, report: &Report) -> SheetLayout {
        lay_out(report, &self.config)
    }

    /// Build the workbook for `report`
    ///
    /// # Arguments
    /// * `report` - Order and line items
    ///
    /// # Returns
    /// * `Result<Vec<u8>, ReportError>` - XLSX bytes; errors only come from the
    ///   workbook writer, never from the report content
    pub fn build(&self, report: &Report) -> Result<Vec<u8>, ReportError> {
        let layout = self.layout(report);
        let logo = prepare_logo(self.logo.as_ref());
        debug!(
            "rendering {} rows for order {:?} ({})",
            layout.len(),
            report.order.order_number,
            if logo.is_some() { "with logo" } else { "no logo" }
        );
        to_xlsx(
            &layout,
            &self.config.sheet_name,
            self.config.brand_color,
            logo.as_deref(),
        )
    }

    /// Build the workbook and pair it with its download filename and MIME type
    pub fn build_document(&self, report: &Report) -> Result<ReportDocument, ReportError> {
        let bytes = self.build(report)?;
        Ok(ReportDocument {
            filename: self.filename(&report.order),
            content_type: XLSX_MIME,
            bytes,
        })
    }

    pub fn filename(&self, order: &Order) -> String {
        report_filename(&self.config.file_prefix, order)
    }
}

/// Build a report with the default configuration and no logo
///
/// # Arguments
/// * `order` - Client and order details
/// * `hardware` - Hardware line items, one row per serial number
/// * `software` - Software line items, one row per license key
///
/// # Returns
/// * `Result<Vec<u8>, ReportError>` - XLSX file content as bytes
pub fn build_report(
    order: &Order,
    hardware: &[HardwareLineItem],
    software: &[SoftwareLineItem],
) -> Result<Vec<u8>, ReportError> {
    let report = Report {
        order: order.clone(),
        hardware: hardware.to_vec(),
        software: software.to_vec(),
    };
    ReportBuilder::default().build(&report)
}
