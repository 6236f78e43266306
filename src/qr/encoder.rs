//! QR symbol rendering.

use cap_std::fs_utf8::Dir;
use image::{Rgba, RgbaImage, imageops};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use std::sync::Arc;
use thiserror::Error;

use super::style::{ColoredStyle, ErrorCorrection, QrStyle};

/// Module pixel size of the plain rendering.
const PLAIN_MODULE_SIZE: u32 = 8;

/// Quiet-zone width of the plain rendering, in modules (the symbol
/// standard's minimum).
const PLAIN_QUIET_ZONE: u32 = 4;

/// Finder patterns are 7x7 modules in three corners of every symbol.
const FINDER_SIZE: u32 = 7;

/// A logo may cover at most a fifth of the encoded area's width/height;
/// larger overlays eat past the error-correction budget and stop scanning.
const LOGO_MAX_FRACTION: u32 = 5;

/// Errors returned by QR rendering.
#[derive(Debug, Clone, Error)]
pub enum QrEncodeError {
    /// The URL exceeds the capacity of the chosen error-correction level.
    /// Nothing is truncated; the caller must shorten the payload.
    #[error("payload too long for QR capacity at this error-correction level")]
    PayloadTooLong,

    /// The QR library rejected the payload for another reason.
    #[error("QR encoding failed: {0}")]
    Encoding(String),

    /// The logo bytes or the output raster could not be processed.
    #[error("image processing failed: {0}")]
    Image(String),

    /// Writing the PNG to disk failed.
    #[error("could not write QR image: {0}")]
    Io(Arc<std::io::Error>),
}

/// Pixel-level parameters shared by both styles.
struct DrawParams {
    module_size: u32,
    quiet_zone: u32,
    foreground: Rgba<u8>,
    background: Rgba<u8>,
    corner_radius: u32,
}

/// Renders `url` as a QR symbol in the given style.
///
/// Deterministic: the same URL and style always produce byte-identical
/// pixels.
///
/// # Errors
///
/// Returns [`QrEncodeError::PayloadTooLong`] when the URL exceeds symbol
/// capacity and [`QrEncodeError::Image`] when a configured logo cannot be
/// decoded.
pub fn encode(url: &str, style: &QrStyle) -> Result<RgbaImage, QrEncodeError> {
    match style {
        QrStyle::Plain => {
            let code = build_code(url, EcLevel::M)?;
            Ok(draw_symbol(&code, &DrawParams {
                module_size: PLAIN_MODULE_SIZE,
                quiet_zone: PLAIN_QUIET_ZONE,
                foreground: Rgba([0, 0, 0, 255]),
                background: Rgba([255, 255, 255, 255]),
                corner_radius: 0,
            }))
        }
        QrStyle::Colored(colored) => {
            let code = build_code(url, ec_level(colored.error_correction))?;
            let mut image = draw_symbol(&code, &DrawParams {
                module_size: colored.module_size,
                quiet_zone: colored.quiet_zone,
                foreground: colored.foreground,
                background: colored.background,
                corner_radius: colored.corner_radius.min(colored.module_size >> 1),
            });
            if let Some(logo_png) = &colored.logo_png {
                overlay_logo(&mut image, logo_png, colored)?;
            }
            Ok(image)
        }
    }
}

/// Serializes the rendered symbol as PNG bytes.
///
/// # Errors
///
/// Returns [`QrEncodeError::Image`] when PNG encoding fails.
pub fn to_png_bytes(image: &RgbaImage) -> Result<Vec<u8>, QrEncodeError> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, image::ImageFormat::Png)
        .map_err(|err| QrEncodeError::Image(err.to_string()))?;
    Ok(cursor.into_inner())
}

/// Writes the symbol as `<file_stem>.png` under `dir` and returns the file
/// name.
///
/// # Errors
///
/// Returns [`QrEncodeError::Image`] when PNG encoding fails and
/// [`QrEncodeError::Io`] when the write fails.
pub fn write_png(dir: &Dir, file_stem: &str, image: &RgbaImage) -> Result<String, QrEncodeError> {
    let bytes = to_png_bytes(image)?;
    let file_name = format!("{file_stem}.png");
    dir.write(&file_name, &bytes)
        .map_err(|err| QrEncodeError::Io(Arc::new(err)))?;
    Ok(file_name)
}

const fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::Low => EcLevel::L,
        ErrorCorrection::Medium => EcLevel::M,
        ErrorCorrection::Quartile => EcLevel::Q,
        ErrorCorrection::High => EcLevel::H,
    }
}

fn build_code(url: &str, level: EcLevel) -> Result<QrCode, QrEncodeError> {
    QrCode::with_error_correction_level(url.as_bytes(), level).map_err(|err| match err {
        QrError::DataTooLong => QrEncodeError::PayloadTooLong,
        other => QrEncodeError::Encoding(other.to_string()),
    })
}

/// Draws the module matrix to pixels.
///
/// Finder patterns are drawn as sharp black squares no matter the style;
/// data modules use the configured color and corner radius.
fn draw_symbol(code: &QrCode, params: &DrawParams) -> RgbaImage {
    let width = code.width();
    let colors = code.to_colors();
    let side_modules = u32::try_from(width).unwrap_or(0);
    let total = (side_modules + 2 * params.quiet_zone) * params.module_size;
    let mut image = RgbaImage::from_pixel(total, total, params.background);

    let dark_at = |x: u32, y: u32| -> bool {
        let index = usize::try_from(y).unwrap_or(0) * width + usize::try_from(x).unwrap_or(0);
        matches!(colors.get(index), Some(qrcode::Color::Dark))
    };

    for module_y in 0..side_modules {
        for module_x in 0..side_modules {
            if !dark_at(module_x, module_y) {
                continue;
            }
            let in_finder = is_finder_module(module_x, module_y, side_modules);
            let color = if in_finder {
                Rgba([0, 0, 0, 255])
            } else {
                params.foreground
            };
            let radius = if in_finder { 0 } else { params.corner_radius };
            let origin_x = (params.quiet_zone + module_x) * params.module_size;
            let origin_y = (params.quiet_zone + module_y) * params.module_size;
            fill_rounded_square(
                &mut image,
                origin_x,
                origin_y,
                params.module_size,
                radius,
                color,
            );
        }
    }
    image
}

/// Whether the module belongs to one of the three 7x7 finder patterns.
const fn is_finder_module(x: u32, y: u32, side_modules: u32) -> bool {
    let near_end = side_modules.saturating_sub(FINDER_SIZE);
    (x < FINDER_SIZE && y < FINDER_SIZE)
        || (x >= near_end && y < FINDER_SIZE)
        || (x < FINDER_SIZE && y >= near_end)
}

/// Fills a square of `size` pixels at (`origin_x`, `origin_y`), leaving the
/// corners outside `radius` untouched.
fn fill_rounded_square(
    image: &mut RgbaImage,
    origin_x: u32,
    origin_y: u32,
    size: u32,
    radius: u32,
    color: Rgba<u8>,
) {
    for dy in 0..size {
        for dx in 0..size {
            if inside_rounded(dx, dy, size, radius) {
                image.put_pixel(origin_x + dx, origin_y + dy, color);
            }
        }
    }
}

/// Integer squared-distance test against the corner circles of a rounded
/// square.
fn inside_rounded(dx: u32, dy: u32, size: u32, radius: u32) -> bool {
    if radius == 0 {
        return true;
    }
    let in_x_band = dx >= radius && dx < size - radius;
    let in_y_band = dy >= radius && dy < size - radius;
    if in_x_band || in_y_band {
        return true;
    }
    let center_x = if dx < radius { radius } else { size - radius - 1 };
    let center_y = if dy < radius { radius } else { size - radius - 1 };
    let delta_x = i64::from(dx) - i64::from(center_x);
    let delta_y = i64::from(dy) - i64::from(center_y);
    delta_x * delta_x + delta_y * delta_y <= i64::from(radius) * i64::from(radius)
}

/// Composites the logo over the symbol center on a rounded white plate.
fn overlay_logo(
    image: &mut RgbaImage,
    logo_png: &[u8],
    style: &ColoredStyle,
) -> Result<(), QrEncodeError> {
    let logo = image::load_from_memory(logo_png)
        .map_err(|err| QrEncodeError::Image(err.to_string()))?
        .to_rgba8();

    let total = image.width();
    // The 20% budget is taken over the encoded area, quiet zone excluded.
    let symbol_px = total.saturating_sub(2 * style.quiet_zone * style.module_size);
    let max_side = symbol_px.div_euclid(LOGO_MAX_FRACTION);
    let longest = logo.width().max(logo.height()).max(1);
    let side = max_side.min(longest).max(1);
    // The longest edge maps to `side`; the other edge scales with it so the
    // logo keeps its aspect ratio.
    let scaled_width = scale_edge(logo.width(), side, longest);
    let scaled_height = scale_edge(logo.height(), side, longest);
    let scaled = imageops::resize(
        &logo,
        scaled_width,
        scaled_height,
        imageops::FilterType::Triangle,
    );

    let padding = style.module_size;
    let plate_side = side + 2 * padding;
    if plate_side >= total {
        return Err(QrEncodeError::Image(
            "logo plate larger than the symbol".to_owned(),
        ));
    }
    let plate_origin = (total - plate_side) >> 1;

    let white = Rgba([255, 255, 255, 255]);
    for dy in 0..plate_side {
        for dx in 0..plate_side {
            if inside_rounded(dx, dy, plate_side, padding) {
                image.put_pixel(plate_origin + dx, plate_origin + dy, white);
            }
        }
    }

    let logo_x = i64::from(plate_origin + padding + ((side - scaled_width) >> 1));
    let logo_y = i64::from(plate_origin + padding + ((side - scaled_height) >> 1));
    imageops::overlay(image, &scaled, logo_x, logo_y);
    Ok(())
}

/// Scales one logo edge so the longest edge becomes `side`.
fn scale_edge(edge: u32, side: u32, longest: u32) -> u32 {
    let scaled = u64::from(edge) * u64::from(side);
    u32::try_from(scaled.div_euclid(u64::from(longest)))
        .unwrap_or(side)
        .max(1)
}
