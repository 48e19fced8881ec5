use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Order header shown in the metadata rows of the report
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Order {
    pub client_name: String,
    pub order_number: String,
    #[serde(default)]
    pub client_po: Option<String>,
    #[serde(default)]
    pub report_date: Option<NaiveDate>,
}

/// A hardware product with the serial numbers shipped for it
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct HardwareLineItem {
    pub product: String,
    pub model: String,
    pub serials: Vec<String>,
}

/// A software product with the license keys issued for it
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct SoftwareLineItem {
    pub name: String,
    pub license_type: String,
    pub keys: Vec<String>,
}

/// Everything the builder needs to lay out one report
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Report {
    pub order: Order,
    #[serde(default)]
    pub hardware: Vec<HardwareLineItem>,
    #[serde(default)]
    pub software: Vec<SoftwareLineItem>,
}

impl Order {
    pub fn new(client_name: impl Into<String>, order_number: impl Into<String>) -> Self {
        Order {
            client_name: client_name.into(),
            order_number: order_number.into(),
            client_po: None,
            report_date: None,
        }
    }

    pub fn with_po(mut self, po: impl Into<String>) -> Self {
        self.client_po = Some(po.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.report_date = Some(date);
        self
    }

    /// The PO, if one was given and it is not blank
    pub fn po(&self) -> Option<&str> {
        self.client_po
            .as_deref()
            .map(str::trim)
            .filter(|po| !po.is_empty())
    }
}

impl HardwareLineItem {
    pub fn new<I, S>(product: impl Into<String>, model: impl Into<String>, serials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        HardwareLineItem {
            product: product.into(),
            model: model.into(),
            serials: serials.into_iter().map(Into::into).collect(),
        }
    }

    /// Serials that would actually produce a row
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.serials)
    }
}

impl SoftwareLineItem {
    pub fn new<I, S>(name: impl Into<String>, license_type: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SoftwareLineItem {
            name: name.into(),
            license_type: license_type.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.keys)
    }
}

impl Report {
    pub fn new(order: Order) -> Self {
        Report {
            order,
            hardware: Vec::new(),
            software: Vec::new(),
        }
    }

    pub fn with_hardware(mut self, item: HardwareLineItem) -> Self {
        self.hardware.push(item);
        self
    }

    pub fn with_software(mut self, item: SoftwareLineItem) -> Self {
        self.software.push(item);
        self
    }
}

// Items built by hand (not through the form) can still carry blank entries.
fn non_blank(entries: &[String]) -> impl Iterator<Item = &str> {
    entries
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
}
