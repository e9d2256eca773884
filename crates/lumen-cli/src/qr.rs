//! QR output for signatures
//!
//! Payloads longer than one frame are split into `LUMEN:<i>:<n>:<chunk>`
//! frames which the receiving wallet reassembles.

use lumen_core::QrDensity;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};

/// Frame header prefix for multi-frame payloads
pub const FRAME_PREFIX: &str = "LUMEN";

/// Split a payload into QR frames sized for the density setting
pub fn encode_frames(payload: &str, density: QrDensity) -> Vec<String> {
    let capacity = density.frame_capacity();
    if payload.len() <= capacity {
        return vec![payload.to_string()];
    }

    let total = payload.len().div_ceil(capacity);
    payload
        .as_bytes()
        .chunks(capacity)
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "{}:{}:{}:{}",
                FRAME_PREFIX,
                i + 1,
                total,
                String::from_utf8_lossy(chunk)
            )
        })
        .collect()
}

fn ec_level(density: QrDensity) -> EcLevel {
    match density {
        QrDensity::Low => EcLevel::Q,
        QrDensity::Medium => EcLevel::M,
        QrDensity::High => EcLevel::L,
    }
}

/// Render one frame with Unicode half blocks, two module rows per line
pub fn render_frame(frame: &str, density: QrDensity) -> Result<String, QrError> {
    let code = QrCode::with_error_correction_level(frame, ec_level(density))?;
    let colors = code.to_colors();
    let width = code.width();

    let mut result = String::new();
    for y in (0..width).step_by(2) {
        for x in 0..width {
            let top = colors[y * width + x];
            let bottom = if y + 1 < width {
                colors[(y + 1) * width + x]
            } else {
                Color::Light
            };

            let ch = match (top, bottom) {
                (Color::Dark, Color::Dark) => '█',
                (Color::Dark, Color::Light) => '▀',
                (Color::Light, Color::Dark) => '▄',
                (Color::Light, Color::Light) => ' ',
            };
            result.push(ch);
        }
        result.push('\n');
    }

    Ok(result)
}
