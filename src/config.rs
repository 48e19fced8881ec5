use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

/// Brand colour used for the title, section titles and header fill
pub const BRAND_COLOR: u32 = 0x004785;

/// Report text and layout options
///
/// Every field has a default, so a JSON config only needs to name the
/// values it changes.
///
/// # Examples
/// ```
/// use safari_serials::config::ReportConfig;
///
/// let config: ReportConfig = serde_json::from_str(r#"{"title": "Shipment"}"#).unwrap();
/// assert_eq!(config.title, "Shipment");
/// assert_eq!(config.sheet_name, "Serial Numbers");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Name of the single worksheet
    pub sheet_name: String,

    /// Title written below the branding block
    pub title: String,

    /// First line of the customer message
    pub greeting: String,

    /// Body of the customer message
    pub message: String,

    pub hardware_title: String,
    pub software_title: String,

    /// Prefix of the download filename
    pub file_prefix: String,

    /// Widths of columns A, B and C in character units
    pub column_widths: [f64; 3],

    /// RGB colour for title text and header fill
    pub brand_color: u32,

    /// Emit a separator row between hardware line items
    pub separate_hardware_items: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Serial Numbers".to_string(),
            title: "Safari Micro - Serial Number Report".to_string(),
            greeting: "Dear Valued Customer,".to_string(),
            message: "Please find below the serial numbers and license keys for your order. \
                      If you need any assistance, don't hesitate to reach out."
                .to_string(),
            hardware_title: "Hardware".to_string(),
            software_title: "Software Licenses".to_string(),
            file_prefix: "SafariMicro".to_string(),
            column_widths: [25.0, 20.0, 40.0],
            brand_color: BRAND_COLOR,
            separate_hardware_items: true,
        }
    }
}

impl ReportConfig {
    /// Load a config from a JSON file, falling back to defaults for
    /// missing fields
    ///
    /// # Arguments
    /// * `path` - Path to the JSON file
    ///
    /// # Returns
    /// * `Result<ReportConfig, Box<dyn Error>>` - The config or an I/O / parse error
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let raw = fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }
}
