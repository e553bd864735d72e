use {
    crate::*,
    base::{Rect, Tensor, Vec2},
};

/// A candidate QR region, in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub bbox: Rect<f32>,
    pub confidence: f32,
}

/// Turn a raw `[1, 5, N]` single-class detector output into boxes.
///
/// Rows are `cx, cy, w, h, confidence` in model input space. Boxes under
/// `conf_threshold` are dropped, the rest go through greedy NMS and come out
/// sorted by confidence, highest first.
pub fn postprocess(
    output: &Tensor<f32>,
    letterbox: &Letterbox,
    conf_threshold: f32,
    iou_threshold: f32,
) -> Result<Vec<Detection>, DecodeError> {
    if output.shape.len() != 3 || output.shape[0] != 1 || output.shape[1] != 5 {
        return Err(DecodeError::ShapeMismatch {
            expected: "[1, 5, N]".to_string(),
            got: format!("{:?}", output.shape),
        });
    }

    let n = output.shape[2];
    let mut candidates = Vec::new();
    for i in 0..n {
        let confidence = output.data[4 * n + i];
        if confidence < conf_threshold {
            continue;
        }
        let center = letterbox.to_frame(Vec2::new(output.data[i], output.data[n + i]));
        let size = Vec2::new(output.data[2 * n + i], output.data[3 * n + i]) / letterbox.scale;
        candidates.push(Detection {
            bbox: Rect::from_center(center, size),
            confidence,
        });
    }

    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<Detection> = Vec::new();
    for candidate in candidates {
        if keep
            .iter()
            .all(|kept| kept.bbox.iou(&candidate.bbox) <= iou_threshold)
        {
            keep.push(candidate);
        }
    }
    Ok(keep)
}
