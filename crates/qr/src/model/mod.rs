use {
    crate::{classic::decode_luma, *},
    base::{Tensor, Vec2},
    image::Image,
    ndarray::ArrayD,
    ort::{inputs, session::Session, value::TensorRef},
    std::{path::PathBuf, sync::Mutex},
};

mod postprocess;
pub use postprocess::*;

mod preprocess;
pub use preprocess::*;

/// Channel order the detector was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_path: PathBuf,
    /// Side of the square model input.
    pub input_size: usize,
    pub conf_threshold: f32,
    pub iou_threshold: f32,
    pub channel_order: ChannelOrder,
    /// Margin added around each box before decoding, as a fraction of its size.
    pub crop_padding: f32,
}

impl ModelConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            input_size: 640,
            conf_threshold: 0.5,
            iou_threshold: 0.45,
            channel_order: ChannelOrder::Rgb,
            crop_padding: 0.1,
        }
    }

    pub fn with_input_size(mut self, input_size: usize) -> Self {
        self.input_size = input_size;
        self
    }

    pub fn with_conf_threshold(mut self, conf_threshold: f32) -> Self {
        self.conf_threshold = conf_threshold;
        self
    }

    pub fn with_iou_threshold(mut self, iou_threshold: f32) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    pub fn with_channel_order(mut self, channel_order: ChannelOrder) -> Self {
        self.channel_order = channel_order;
        self
    }

    pub fn with_crop_padding(mut self, crop_padding: f32) -> Self {
        self.crop_padding = crop_padding;
        self
    }
}

/// Decode the region of each detection.
///
/// Each box is grown by `padding` on every side, clamped to the frame and
/// decoded on its own. The occurrence is placed at the box centre; boxes
/// whose crop does not decode yield `None`.
pub fn decode_detections(
    luma: &Image,
    detections: &[Detection],
    padding: f32,
) -> Result<Vec<Option<SymbolOccurrence>>, DecodeError> {
    let mut results = Vec::with_capacity(detections.len());
    for detection in detections {
        let margin = detection.bbox.size * padding;
        let min = detection.bbox.origin - margin;
        let max = detection.bbox.max() + margin;
        let x0 = min.x.max(0.0) as usize;
        let y0 = min.y.max(0.0) as usize;
        let x1 = max.x.max(0.0).ceil() as usize;
        let y1 = max.y.max(0.0).ceil() as usize;
        if x1 <= x0 || y1 <= y0 {
            results.push(None);
            continue;
        }
        let crop = luma.crop(Vec2::new(x0, y0), Vec2::new(x1 - x0, y1 - y0))?;
        let text = decode_luma(&crop).into_iter().next().map(|found| found.text);
        results.push(text.map(|text| SymbolOccurrence::new(text, detection.bbox.center())));
    }
    Ok(results)
}

/// ONNX QR region detector followed by per-region decoding.
pub struct ModelDecoder {
    config: ModelConfig,
    // ort sessions need exclusive access to run
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl ModelDecoder {
    pub fn new(config: ModelConfig) -> Result<Self, DecodeError> {
        let session = Session::builder()
            .map_err(|e| DecodeError::ModelLoad(format!("failed to create session builder: {}", e)))?
            .commit_from_file(&config.model_path)
            .map_err(|e| {
                DecodeError::ModelLoad(format!(
                    "failed to load model from {}: {}",
                    config.model_path.display(),
                    e
                ))
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| DecodeError::ModelLoad("model has no inputs".to_string()))?;
        let output_name = session
            .outputs()
            .first()
            .map(|output| output.name().to_string())
            .ok_or_else(|| DecodeError::ModelLoad("model has no outputs".to_string()))?;
        log::info!(
            "qr: loaded detector {} ({} -> {})",
            config.model_path.display(),
            input_name,
            output_name
        );

        Ok(Self {
            config,
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn infer(&self, input: Tensor<f32>) -> Result<Tensor<f32>, DecodeError> {
        let array = ArrayD::from_shape_vec(input.shape, input.data)
            .map_err(|e| DecodeError::Inference(format!("failed to create input array: {}", e)))?;
        let tensor_ref = TensorRef::from_array_view(array.view())
            .map_err(|e| DecodeError::Inference(format!("failed to create tensor ref: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| DecodeError::Inference("session lock poisoned".to_string()))?;
        let outputs = session
            .run(inputs![self.input_name.as_str() => tensor_ref])
            .map_err(|e| DecodeError::Inference(format!("inference failed: {}", e)))?;

        let output = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(|e| {
                DecodeError::Inference(format!("output '{}' is not f32: {}", self.output_name, e))
            })?;
        let shape = output.shape().to_vec();
        let data = output.iter().copied().collect();
        Ok(Tensor::new(shape, data)?)
    }
}

impl Detect for ModelDecoder {
    fn name(&self) -> &str {
        "model"
    }

    fn detect(&self, image: &Image) -> Result<Vec<SymbolOccurrence>, DecodeError> {
        let packed = match self.config.channel_order {
            ChannelOrder::Rgb => image.to_rgb()?,
            ChannelOrder::Bgr => image.to_bgr()?,
        };
        let (input, letterbox) = letterbox(&packed, self.config.input_size)?;
        let output = self.infer(input)?;
        let detections = postprocess(
            &output,
            &letterbox,
            self.config.conf_threshold,
            self.config.iou_threshold,
        )?;
        if detections.is_empty() {
            return Ok(Vec::new());
        }

        let luma = image.to_luma()?;
        let decoded = decode_detections(&luma, &detections, self.config.crop_padding)?;
        let total = decoded.len();
        let occurrences = usable_occurrences(decoded);
        if occurrences.len() < total {
            log::debug!(
                "qr: {} of {} detected regions did not decode",
                total - occurrences.len(),
                total
            );
        }
        Ok(occurrences)
    }
}
