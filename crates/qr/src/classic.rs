use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
};

/// Decode every grid rqrr finds in a luma image.
///
/// Grids that are located but fail to decode are skipped.
pub(crate) fn decode_luma(luma: &Image) -> Vec<SymbolOccurrence> {
    debug_assert_eq!(luma.format, PixelFormat::Luma8);
    let width = luma.width();
    let height = luma.height();
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| luma.data[y * width + x]);
    let mut occurrences = Vec::new();
    for grid in prepared.detect_grids() {
        match grid.decode() {
            Ok((_, text)) => {
                let (sum_x, sum_y) = grid
                    .bounds
                    .iter()
                    .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x as f32, sy + p.y as f32));
                occurrences.push(SymbolOccurrence::new(
                    text,
                    Vec2::new(sum_x / 4.0, sum_y / 4.0),
                ));
            }
            Err(error) => {
                log::debug!("qr: grid located but not decoded: {}", error);
            }
        }
    }
    occurrences
}

/// Classical (non-ML) QR detection on the whole frame.
#[derive(Debug, Default, Clone)]
pub struct ClassicDecoder;

impl ClassicDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Detect for ClassicDecoder {
    fn name(&self) -> &str {
        "classic"
    }

    fn detect(&self, image: &Image) -> Result<Vec<SymbolOccurrence>, DecodeError> {
        let luma = image.to_luma()?;
        Ok(decode_luma(&luma))
    }
}
