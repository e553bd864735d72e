use {crate::*, base::Vec2, std::fmt};

/// A packed pixel buffer with its size and declared format.
#[derive(Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("size", &self.size)
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    /// Check that the buffer length matches size and format.
    pub fn validate(&self) -> Result<(), ImageError> {
        match self.format.buffer_len(self.size) {
            Some(expected) if expected != self.data.len() => Err(ImageError::Size {
                expected,
                got: self.data.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Convert to packed RGB, whatever the source layout.
    pub fn to_rgb(&self) -> Result<Image, ImageError> {
        self.validate()?;
        let data = match self.format {
            PixelFormat::Rgb8 => self.data.clone(),
            PixelFormat::Bgr8 => swap_red_blue(&self.data),
            PixelFormat::Luma8 => luma_to_rgb(&self.data),
            PixelFormat::Yuyv => yuyv_to_rgb(self.size, &self.data),
            PixelFormat::Jpeg => return jpeg_to_rgb(self),
        };
        Ok(Image::new(self.size, data, PixelFormat::Rgb8))
    }

    /// Convert to packed BGR.
    pub fn to_bgr(&self) -> Result<Image, ImageError> {
        let rgb = self.to_rgb()?;
        Ok(Image::new(rgb.size, swap_red_blue(&rgb.data), PixelFormat::Bgr8))
    }

    /// Convert to single-channel 8-bit luma.
    pub fn to_luma(&self) -> Result<Image, ImageError> {
        self.validate()?;
        let data = match self.format {
            PixelFormat::Luma8 => self.data.clone(),
            PixelFormat::Rgb8 => rgb_to_luma(&self.data),
            PixelFormat::Bgr8 => self
                .data
                .chunks_exact(3)
                .map(|c| rgb_to_y(c[2], c[1], c[0]))
                .collect(),
            // YUYV already carries luma in every other byte
            PixelFormat::Yuyv => self.data.iter().step_by(2).copied().collect(),
            PixelFormat::Jpeg => return jpeg_to_luma(self),
        };
        Ok(Image::new(self.size, data, PixelFormat::Luma8))
    }

    /// Copy out a sub-rectangle of a packed (non-JPEG, non-YUYV) image.
    ///
    /// The rectangle is clamped to the image bounds; an empty intersection
    /// yields a 0x0 image.
    pub fn crop(&self, origin: Vec2<usize>, size: Vec2<usize>) -> Result<Image, ImageError> {
        self.validate()?;
        let channels = match self.format {
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
            PixelFormat::Luma8 => 1,
            PixelFormat::Yuyv | PixelFormat::Jpeg => {
                return Err(ImageError::Decode(format!(
                    "cannot crop {:?} image, convert it first",
                    self.format
                )));
            }
        };
        let x0 = origin.x.min(self.size.x);
        let y0 = origin.y.min(self.size.y);
        let x1 = (origin.x + size.x).min(self.size.x);
        let y1 = (origin.y + size.y).min(self.size.y);
        let out_size = Vec2::new(x1 - x0, y1 - y0);

        let mut data = Vec::with_capacity(out_size.area() * channels);
        for row in y0..y1 {
            let start = (row * self.size.x + x0) * channels;
            let end = (row * self.size.x + x1) * channels;
            data.extend_from_slice(&self.data[start..end]);
        }
        Ok(Image::new(out_size, data, self.format))
    }
}
