use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    std::path::PathBuf,
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

const BUFFER_COUNT: u32 = 4;

#[derive(Debug, Clone)]
pub struct V4l2Config {
    /// Device node; `None` means index 0.
    pub path: Option<PathBuf>,
    pub size: Option<Vec2<usize>>,
    /// `None` keeps the device's current format.
    pub format: Option<PixelFormat>,
    pub frame_rate: Option<f32>,
}

impl Default for V4l2Config {
    fn default() -> Self {
        Self {
            path: None,
            size: Some(Vec2::new(640, 480)),
            format: None,
            frame_rate: None,
        }
    }
}

impl V4l2Config {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_size(mut self, size: Vec2<usize>) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = Some(frame_rate);
        self
    }
}

pub(crate) struct V4l2 {
    config: V4l2Config,
    stream: Option<MmapStream<'static>>,
    size: Vec2<usize>,
    format: PixelFormat,
}

impl V4l2 {
    pub fn new(config: V4l2Config) -> Self {
        Self {
            config,
            stream: None,
            size: Vec2::new(0, 0),
            format: PixelFormat::Yuyv,
        }
    }
}

impl VideoInDevice for V4l2 {
    fn open(&mut self) -> Result<VideoInfo, VideoError> {
        // close stream
        self.stream.take();

        let device = match &self.config.path {
            Some(path) => Device::with_path(path)?,
            None => Device::new(0)?,
        };
        let device_format = Capture::format(&device)?;

        let desired_size = match self.config.size {
            Some(size) => size,
            None => Vec2::new(device_format.width as usize, device_format.height as usize),
        };

        let desired_fourcc = match self.config.format {
            Some(format) => FourCC::new(&format.as_fourcc().to_le_bytes()),
            None => device_format.fourcc,
        };

        // set the format and get the actual format back
        let actual_format = Capture::set_format(
            &device,
            &Format::new(desired_size.x as u32, desired_size.y as u32, desired_fourcc),
        )?;

        self.size = Vec2::new(actual_format.width as usize, actual_format.height as usize);
        self.format = PixelFormat::from_fourcc(u32::from_le_bytes(actual_format.fourcc.repr))
            .map_err(|_| {
                VideoError::Unsupported(format!("device settled on {}", actual_format.fourcc))
            })?;

        let desired_frame_rate = match self.config.frame_rate {
            Some(frame_rate) => frame_rate,
            None => {
                let params = Capture::params(&device)?;
                params.interval.denominator as f32 / params.interval.numerator.max(1) as f32
            }
        };

        // set the frame rate and get the actual frame rate back
        let actual_params = Capture::set_params(
            &device,
            &v4l::video::capture::Parameters::with_fps(desired_frame_rate as u32),
        )?;
        let frame_rate = actual_params.interval.denominator as f32
            / actual_params.interval.numerator.max(1) as f32;

        self.stream = match MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT) {
            Ok(stream) => Some(stream),
            Err(error) => {
                return Err(VideoError::Open(format!("cannot map buffers: {}", error)));
            }
        };

        Ok(VideoInfo {
            size: self.size,
            format: self.format,
            frame_rate,
        })
    }

    fn close(&mut self) {
        self.stream.take();
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(VideoError::Capture("device is not open".to_string()));
        };
        let (frame_data, metadata) =
            CaptureStream::next(stream).map_err(|error| VideoError::Capture(error.to_string()))?;

        // drivers may hand out padded buffers; MJPG frames only fill part of theirs
        let used = (metadata.bytesused as usize).min(frame_data.len());
        let data = match self.format.buffer_len(self.size) {
            Some(expected) if frame_data.len() >= expected => frame_data[..expected].to_vec(),
            Some(_) => frame_data.to_vec(),
            None if used > 0 => frame_data[..used].to_vec(),
            None => frame_data.to_vec(),
        };

        let image = Image::new(self.size, data, self.format);
        image.validate()?;
        Ok(image)
    }
}
