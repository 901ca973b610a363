//! Logo raster processing
//!
//! Converts a business logo image into `GS v 0` raster data. Logo printing
//! is best-effort: any failure yields `None` and the ticket prints without
//! the logo.

use image::GenericImageView;
use tracing::{error, info, instrument};

/// Process an image file and return ESC/POS raster data
///
/// The image will be:
/// - Resized to fit max width (384 dots)
/// - Converted to 1-bit monochrome
/// - Encoded as GS v 0 raster graphics, center aligned
#[instrument]
pub fn process_logo(path: &str) -> Option<Vec<u8>> {
    let img = match image::open(path) {
        Ok(i) => {
            info!(dimensions = ?i.dimensions(), "logo image opened");
            i
        }
        Err(e) => {
            error!(error = %e, "open logo failed");
            return None;
        }
    };

    let (w, h) = img.dimensions();

    // Resize if too wide (max 384 dots for 58mm/80mm)
    let max_width = 384;
    let (new_w, new_h) = if w > max_width {
        let ratio = max_width as f64 / w as f64;
        (max_width, (h as f64 * ratio) as u32)
    } else {
        (w, h)
    };

    let resized = img.resize(new_w, new_h, image::imageops::FilterType::Nearest);

    // Raster bit image command GS v 0
    let x_bytes = new_w.div_ceil(8);

    let mut data = Vec::new();

    // Center align for image
    data.extend_from_slice(&[0x1B, 0x61, 0x01]);

    // GS v 0 m xL xH yL yH
    data.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
    data.push(x_bytes as u8);
    data.push((x_bytes >> 8) as u8);
    data.push(new_h as u8);
    data.push((new_h >> 8) as u8);

    // Convert to RGBA for transparency handling
    let rgba = resized.to_rgba8();

    for y in 0..new_h {
        for x_byte in 0..x_bytes {
            let mut byte = 0u8;
            for bit in 0..8 {
                let x = x_byte * 8 + bit;
                if x < new_w {
                    let pixel = rgba.get_pixel(x, y);

                    // Handle transparency
                    let alpha = pixel[3];
                    if alpha >= 128 {
                        // Opaque - check luminance
                        let luma = (0.299 * pixel[0] as f32
                            + 0.587 * pixel[1] as f32
                            + 0.114 * pixel[2] as f32) as u8;

                        // Dark enough = print black (1)
                        if luma < 128 {
                            byte |= 1 << (7 - bit);
                        }
                    }
                    // Transparent = white (0)
                }
            }
            data.push(byte);
        }
    }

    // Newline after image
    data.push(0x0A);

    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_logo_is_none() {
        assert!(process_logo("/nonexistent/logo.png").is_none());
    }
}
