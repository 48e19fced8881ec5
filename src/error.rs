use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Failure while turning a laid-out report into xlsx bytes
///
/// Report content never produces this; it only comes from the workbook
/// writer, e.g. when a sheet would run past the last xlsx row.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write workbook: {0}")]
    Workbook(#[from] XlsxError),
}

/// Reasons a logo could not be used. Never escapes the builder.
#[derive(Debug, Error)]
pub enum BrandingError {
    #[error("could not read logo: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode logo: {0}")]
    Image(#[from] image::ImageError),

    #[error("logo has zero width or height")]
    Empty,
}
