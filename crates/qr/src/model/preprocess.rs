use {
    crate::*,
    base::{Tensor, Vec2},
    image::{Image, PixelFormat},
};

// gray padding, normalized
const PAD_VALUE: f32 = 114.0 / 255.0;

/// How the frame was fitted into the square model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad: Vec2<f32>,
}

impl Letterbox {
    /// Map a point from model input space back to frame pixels.
    pub fn to_frame(&self, point: Vec2<f32>) -> Vec2<f32> {
        (point - self.pad) / self.scale
    }
}

/// Letterbox a packed 3-channel image into a `[1, 3, target, target]` tensor
/// with values in `[0, 1]`, keeping the channel order of `image`.
pub fn letterbox(image: &Image, target: usize) -> Result<(Tensor<f32>, Letterbox), DecodeError> {
    if !matches!(image.format, PixelFormat::Rgb8 | PixelFormat::Bgr8) {
        return Err(DecodeError::ShapeMismatch {
            expected: "packed 3-channel image".to_string(),
            got: format!("{:?}", image.format),
        });
    }
    image.validate()?;
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 || target == 0 {
        return Err(DecodeError::ShapeMismatch {
            expected: "non-empty image".to_string(),
            got: format!("{}", image.size),
        });
    }

    let scale = (target as f32 / w as f32).min(target as f32 / h as f32);
    let new_w = ((w as f32 * scale) as usize).clamp(1, target);
    let new_h = ((h as f32 * scale) as usize).clamp(1, target);
    let pad_x = (target - new_w) / 2;
    let pad_y = (target - new_h) / 2;

    let plane = target * target;
    let mut data = vec![PAD_VALUE; 3 * plane];
    for y in 0..new_h {
        // nearest neighbour
        let src_y = ((y as f32 / scale) as usize).min(h - 1);
        for x in 0..new_w {
            let src_x = ((x as f32 / scale) as usize).min(w - 1);
            let src = (src_y * w + src_x) * 3;
            let dst = (y + pad_y) * target + x + pad_x;
            for channel in 0..3 {
                data[channel * plane + dst] = image.data[src + channel] as f32 / 255.0;
            }
        }
    }

    let tensor = Tensor::new(vec![1, 3, target, target], data)?;
    Ok((
        tensor,
        Letterbox {
            scale,
            pad: Vec2::new(pad_x as f32, pad_y as f32),
        },
    ))
}
