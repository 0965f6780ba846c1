use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma};
use tracing::{debug, warn};

use crate::config::{DEFAULT_BORDER, DEFAULT_TARGET_SIZE};
use crate::error::RenderError;
use crate::qrcode::{byte_capacity, QrCode, QrCodeEcc, Version};

/// Widest quiet zone accepted, in modules.
pub const MAX_BORDER: u32 = 64;
/// Largest requested image side, in pixels.
pub const MAX_TARGET_SIZE: u32 = 8192;

const DARK: Luma<u8> = Luma([0u8]);
const LIGHT: Luma<u8> = Luma([255u8]);

/// How a payload is turned into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub ecc: QrCodeEcc,
    /// Requested image side in pixels, quiet zone included.
    pub target_size: u32,
    /// Quiet zone width in modules.
    pub border: u32,
    /// Largest symbol version to try before giving up.
    pub max_version: Version,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ecc: QrCodeEcc::High,
            target_size: DEFAULT_TARGET_SIZE,
            border: DEFAULT_BORDER,
            max_version: Version::MAX,
        }
    }
}

/// A rendered QR symbol, ready to display or export.
#[derive(Debug, Clone)]
pub struct QrImage {
    qr: QrCode,
    image: GrayImage,
    border: u32,
}

/// Renders `payload` at `ecc` with the default size and quiet zone.
///
/// # Example
///
/// ```
/// use qiprofile::qrcode::QrCodeEcc;
/// use qiprofile::render::render;
///
/// let img = render("Hello, World!", QrCodeEcc::High).unwrap();
/// assert_eq!(img.dimensions(), (231, 231));
/// ```
pub fn render(payload: &str, ecc: QrCodeEcc) -> Result<QrImage, RenderError> {
    render_with(
        payload,
        &RenderOptions {
            ecc,
            ..RenderOptions::default()
        },
    )
}

/// Renders `payload` using the smallest version that fits at exactly `options.ecc`.
///
/// The image side is the largest whole multiple of the symbol width (quiet zone included) that
/// does not exceed `target_size`, but never less than one pixel per module.
pub fn render_with(payload: &str, options: &RenderOptions) -> Result<QrImage, RenderError> {
    if options.border > MAX_BORDER {
        return Err(RenderError::InvalidOptions(format!(
            "border of {} modules exceeds {MAX_BORDER}",
            options.border
        )));
    }
    if options.target_size > MAX_TARGET_SIZE {
        return Err(RenderError::InvalidOptions(format!(
            "target size of {} px exceeds {MAX_TARGET_SIZE}",
            options.target_size
        )));
    }

    let qr = QrCode::encode_bytes(payload.as_bytes(), options.ecc, Version::MIN, options.max_version, None, false)
        .map_err(|e| {
            let capacity = byte_capacity(options.ecc, options.max_version);
            warn!(payload_bytes = payload.len(), capacity, error = %e, "payload does not fit a QR symbol");
            RenderError::CapacityExceeded {
                payload_bytes: payload.len(),
                capacity_bytes: capacity,
                level: options.ecc.letter(),
            }
        })?;
    debug!(version = qr.version().value(), ecc = %options.ecc.letter(), "QR symbol encoded");

    let border = options.border;
    let (modules, side) = image_side(qr.size() as u32, options)?;
    let scale = side / modules;
    let image = GrayImage::from_fn(side, side, |x, y| {
        let qr_x = (x / scale) as i32 - border as i32;
        let qr_y = (y / scale) as i32 - border as i32;
        if qr.get_module(qr_x, qr_y) {
            DARK
        } else {
            LIGHT
        }
    });

    Ok(QrImage { qr, image, border })
}

/// Symbol width including the quiet zone, and the image side in pixels.
fn image_side(qr_size: u32, options: &RenderOptions) -> Result<(u32, u32), RenderError> {
    let too_large = || RenderError::InvalidOptions("image dimensions overflow".into());
    let modules = options
        .border
        .checked_mul(2)
        .and_then(|quiet| quiet.checked_add(qr_size))
        .ok_or_else(too_large)?;
    let scale = (options.target_size / modules).max(1);
    let side = modules.checked_mul(scale).ok_or_else(too_large)?;
    Ok((modules, side))
}

impl QrImage {
    pub fn version(&self) -> Version {
        self.qr.version()
    }

    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.qr.error_correction_level()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Raw 8-bit grey pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Encodes the image as a PNG byte stream.
    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Writes the PNG to `directory/filename`, creating the directory if needed.
    pub fn save_png(&self, directory: &Path, filename: &str) -> Result<PathBuf, RenderError> {
        if !directory.exists() {
            fs::create_dir_all(directory)?;
        }
        let path = directory.join(filename);
        fs::write(&path, self.to_png()?)?;
        Ok(path)
    }

    /// SVG document with one unit per module. Always uses `\n` line endings.
    pub fn to_svg_string(&self) -> String {
        let border = self.border as i32;
        let dimension = self.qr.size() + border * 2;
        let mut result = String::new();
        result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
        result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
        result += &format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
            dimension
        );
        result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
        result += "\t<path d=\"";
        let mut first = true;
        for y in 0..self.qr.size() {
            for x in 0..self.qr.size() {
                if self.qr.get_module(x, y) {
                    if !first {
                        result += " ";
                    }
                    first = false;
                    result += &format!("M{},{}h1v1h-1z", x + border, y + border);
                }
            }
        }
        result += "\" fill=\"#000000\"/>\n";
        result += "</svg>\n";
        result
    }

    /// Block-character rendering for terminals, two characters per module.
    pub fn to_text(&self) -> String {
        let border = self.border as i32;
        let mut out = String::new();
        for y in -border..self.qr.size() + border {
            for x in -border..self.qr.size() + border {
                out += if self.qr.get_module(x, y) { "██" } else { "  " };
            }
            out.push('\n');
        }
        out
    }
}
