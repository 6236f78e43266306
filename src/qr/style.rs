//! Styling parameters for QR rendering.

use image::Rgba;

/// Error-correction level for the encoded symbol.
///
/// Higher levels spend more modules on redundancy; [`ErrorCorrection::High`]
/// is required when a logo overlays the center of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCorrection {
    /// Recovers up to 7% damage.
    Low,
    /// Recovers up to 15% damage.
    Medium,
    /// Recovers up to 25% damage.
    Quartile,
    /// Recovers up to 30% damage.
    High,
}

/// How a QR symbol is rendered to pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrStyle {
    /// Standard black-on-white square modules, medium error correction.
    Plain,
    /// Custom colors, rounded data modules, optional embedded logo.
    Colored(ColoredStyle),
}

/// Parameters for the branded rendering.
///
/// Finder patterns are always drawn as plain black squares regardless of
/// the configured colors; scanners locate the symbol by them and styled
/// finders cost real-world scan reliability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredStyle {
    /// Pixel size of one module.
    pub module_size: u32,
    /// Quiet-zone border width, in modules.
    pub quiet_zone: u32,
    /// Error-correction level.
    pub error_correction: ErrorCorrection,
    /// Color of data modules.
    pub foreground: Rgba<u8>,
    /// Color of the background and quiet zone.
    pub background: Rgba<u8>,
    /// Corner radius of data modules, in pixels. Clamped to half the
    /// module size; zero draws sharp squares.
    pub corner_radius: u32,
    /// PNG bytes of a logo composited over the symbol center, on a rounded
    /// white backing plate. Scaled down, aspect ratio preserved, so its
    /// longest edge covers at most 20% of the encoded area and the symbol
    /// stays within the error-correction budget.
    pub logo_png: Option<Vec<u8>>,
}

impl Default for ColoredStyle {
    /// Matches the parameters the shop's branded slips were produced with:
    /// 8px modules, 2-module border, high error correction.
    fn default() -> Self {
        Self {
            module_size: 8,
            quiet_zone: 2,
            error_correction: ErrorCorrection::High,
            foreground: Rgba([0, 0, 0, 255]),
            background: Rgba([255, 255, 255, 255]),
            corner_radius: 2,
            logo_png: None,
        }
    }
}
