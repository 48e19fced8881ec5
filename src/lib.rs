/*!
# Serial Number Report Generator

Builds the Safari Micro serial number / license key report: a single-sheet
XLSX workbook listing, per order, the serial numbers shipped for each
hardware product and the license keys issued for each software product.

## Overview

An order is captured through a form (client, order number, optional PO and
one entry per line item). The report builder turns it into a workbook in
memory and the web front hands the bytes back as a download named
`SafariMicro_<client>_<order>.xlsx`.

## Sheet Layout

| Rows      | Content                                                |
|-----------|--------------------------------------------------------|
| 1-3       | Branding block (merged A1:D3, logo when available)     |
| 4         | Report title                                           |
| 6-7       | Customer greeting and message                          |
| 9..       | Client Name / Order Number / Client PO / Report Date   |
| then      | Hardware: title, header, one row per serial number     |
| then      | Software: title, header, one row per license key       |

Hardware line items are split by a shaded separator row. Columns A-C have
fixed widths.

## Modules

- **order**: Order and line item data model
- **form**: Raw form input, entry list parsing
- **config**: Report texts, widths and colours
- **layout**: Row-by-row placement of the report
- **branding**: Optional logo loading and sizing
- **downloader**: XLSX rendering, download filename and MIME type
- **report**: The report builder tying it all together
- **app**: Web front (feature `web`)

## REST API Endpoints

- `GET /` - Order form
- `POST /api/report` - JSON form body, returns the XLSX download
- `GET /api/health` - Liveness check
*/

#[cfg(feature = "web")]
pub mod app;
pub mod branding;
pub mod config;
pub mod downloader;
pub mod error;
pub mod form;
pub mod layout;
pub mod order;
pub mod report;

/// Re-export the types most callers need
pub use branding::{BytesLogo, FileLogo, LogoSource, NoLogo};
pub use config::ReportConfig;
pub use error::ReportError;
pub use form::ReportForm;
pub use order::{HardwareLineItem, Order, Report, SoftwareLineItem};
pub use report::{ReportBuilder, ReportDocument, build_report};
