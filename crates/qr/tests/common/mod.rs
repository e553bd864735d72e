use {
    base::Vec2,
    image::{Image, PixelFormat},
    qrcode::{Color, QrCode},
};

pub const MODULE_PIXELS: usize = 4;

/// White luma canvas.
pub fn canvas(width: usize, height: usize) -> Image {
    Image::new(
        Vec2::new(width, height),
        vec![255; width * height],
        PixelFormat::Luma8,
    )
}

/// Draw a QR symbol for `text` with its top-left module at `origin`.
///
/// Returns the centre of the drawn symbol.
pub fn draw_qr(canvas: &mut Image, text: &str, origin: Vec2<usize>) -> Vec2<f32> {
    let code = QrCode::new(text.as_bytes()).unwrap();
    let modules = code.width();
    let colors = code.to_colors();
    for my in 0..modules {
        for mx in 0..modules {
            if colors[my * modules + mx] != Color::Dark {
                continue;
            }
            for dy in 0..MODULE_PIXELS {
                for dx in 0..MODULE_PIXELS {
                    let x = origin.x + mx * MODULE_PIXELS + dx;
                    let y = origin.y + my * MODULE_PIXELS + dy;
                    canvas.data[y * canvas.size.x + x] = 0;
                }
            }
        }
    }
    let side = (modules * MODULE_PIXELS) as f32;
    Vec2::new(origin.x as f32 + side / 2.0, origin.y as f32 + side / 2.0)
}

/// Side length in pixels of the symbol `draw_qr` would draw for `text`.
pub fn qr_side(text: &str) -> usize {
    QrCode::new(text.as_bytes()).unwrap().width() * MODULE_PIXELS
}
