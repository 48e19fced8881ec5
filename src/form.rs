//! Raw form input and its conversion into a [`Report`].
//!
//! The form hands over plain strings: one field per order value and, per
//! line item, a free-text list of serial numbers or license keys. This is
//! the only place input is cleaned up; the builder takes what it gets.

use crate::order::{HardwareLineItem, Order, Report, SoftwareLineItem};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref ENTRY_SEPARATOR: Regex = Regex::new(r"[,\r\n]+").unwrap();
}

/// One hardware line as typed into the form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareEntry {
    pub product: String,
    pub model: String,
    /// Serial numbers separated by commas or line breaks
    pub serials: String,
}

/// One software line as typed into the form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareEntry {
    pub name: String,
    pub license_type: String,
    /// License keys separated by commas or line breaks
    pub keys: String,
}

/// Everything submitted by the order form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportForm {
    pub client_name: String,
    pub order_number: String,
    pub client_po: String,
    pub report_date: Option<NaiveDate>,
    pub hardware: Vec<HardwareEntry>,
    pub software: Vec<SoftwareEntry>,
}

/// Split a free-text list into trimmed, non-empty entries
///
/// # Examples
/// ```
/// use safari_serials::form::parse_entries;
///
/// assert_eq!(parse_entries(" SN1, ,SN2,\nSN3 "), vec!["SN1", "SN2", "SN3"]);
/// assert!(parse_entries(" , ").is_empty());
/// ```
pub fn parse_entries(input: &str) -> Vec<String> {
    ENTRY_SEPARATOR
        .split(input)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

impl HardwareEntry {
    fn is_blank(&self) -> bool {
        self.product.trim().is_empty()
            && self.model.trim().is_empty()
            && self.serials.trim().is_empty()
    }

    pub fn into_line_item(self) -> HardwareLineItem {
        HardwareLineItem {
            product: self.product.trim().to_string(),
            model: self.model.trim().to_string(),
            serials: parse_entries(&self.serials),
        }
    }
}

impl SoftwareEntry {
    fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.license_type.trim().is_empty()
            && self.keys.trim().is_empty()
    }

    pub fn into_line_item(self) -> SoftwareLineItem {
        SoftwareLineItem {
            name: self.name.trim().to_string(),
            license_type: self.license_type.trim().to_string(),
            keys: parse_entries(&self.keys),
        }
    }
}

impl ReportForm {
    /// Convert the submitted form into a report
    ///
    /// Text fields are trimmed, a blank PO is dropped, entry lists are split
    /// with [`parse_entries`] and lines left completely empty are skipped.
    /// Nothing is rejected.
    pub fn into_report(self) -> Report {
        let client_po = self.client_po.trim();
        let order = Order {
            client_name: self.client_name.trim().to_string(),
            order_number: self.order_number.trim().to_string(),
            client_po: (!client_po.is_empty()).then(|| client_po.to_string()),
            report_date: self.report_date,
        };

        Report {
            order,
            hardware: self
                .hardware
                .into_iter()
                .filter(|entry| !entry.is_blank())
                .map(HardwareEntry::into_line_item)
                .collect(),
            software: self
                .software
                .into_iter()
                .filter(|entry| !entry.is_blank())
                .map(SoftwareEntry::into_line_item)
                .collect(),
        }
    }
}
