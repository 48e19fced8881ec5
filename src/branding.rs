//! Optional logo for the report's branding block.
//!
//! Loading a logo is a capability the builder may call: a [`LogoSource`]
//! answers with the raw image bytes or with nothing, and never fails. The
//! bytes are then decoded, shrunk to fit the branding block and re-encoded
//! as PNG. Any problem along the way leaves the block empty.

use crate::error::BrandingError;
use image::imageops::FilterType;
use image::{GenericImageView, ImageOutputFormat};
use log::warn;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Height of the branding block in pixels (three default-height rows)
pub const LOGO_MAX_HEIGHT: u32 = 60;

/// Width available to the logo inside the merged A:D region
pub const LOGO_MAX_WIDTH: u32 = 320;

/// Something that may provide logo bytes
pub trait LogoSource: Send + Sync {
    /// Raw image bytes in any format the `image` crate can decode, or `None`
    fn load(&self) -> Option<Vec<u8>>;
}

/// No branding image
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLogo;

impl LogoSource for NoLogo {
    fn load(&self) -> Option<Vec<u8>> {
        None
    }
}

/// Logo read from disk on every build, so a replaced file is picked up
#[derive(Clone, Debug)]
pub struct FileLogo {
    path: PathBuf,
}

impl FileLogo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileLogo { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogoSource for FileLogo {
    fn load(&self) -> Option<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("{}, report will have no logo", BrandingError::from(e));
                None
            }
        }
    }
}

/// Logo held in memory, e.g. embedded with `include_bytes!`
#[derive(Clone, Debug)]
pub struct BytesLogo(pub Vec<u8>);

impl LogoSource for BytesLogo {
    fn load(&self) -> Option<Vec<u8>> {
        Some(self.0.clone())
    }
}

impl<F> LogoSource for F
where
    F: Fn() -> Option<Vec<u8>> + Send + Sync,
{
    fn load(&self) -> Option<Vec<u8>> {
        self()
    }
}

/// Ask `source` for a logo and turn it into a PNG that fits the branding
/// block
///
/// # Arguments
/// * `source` - Where the logo comes from
///
/// # Returns
/// * `Option<Vec<u8>>` - PNG bytes, or `None` when there is no usable logo
pub fn prepare_logo(source: &dyn LogoSource) -> Option<Vec<u8>> {
    let raw = source.load()?;
    match fit_logo(&raw, LOGO_MAX_WIDTH, LOGO_MAX_HEIGHT) {
        Ok(png) => Some(png),
        Err(e) => {
            warn!("{}, report will have no logo", e);
            None
        }
    }
}

/// Decode `raw`, shrink it (keeping its aspect ratio) until it fits
/// `max_width` x `max_height`, and encode the result as PNG
///
/// Images that already fit are re-encoded without scaling.
pub fn fit_logo(raw: &[u8], max_width: u32, max_height: u32) -> Result<Vec<u8>, BrandingError> {
    let mut logo = image::load_from_memory(raw)?;
    let (width, height) = logo.dimensions();
    if width == 0 || height == 0 {
        return Err(BrandingError::Empty);
    }

    if width > max_width || height > max_height {
        logo = logo.resize(max_width, max_height, FilterType::Lanczos3);
    }

    let mut png = Vec::new();
    logo.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
    Ok(png)
}
