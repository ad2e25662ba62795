use image::RgbImage;

use crate::pipeline::result_aggregator::DetectionResult;

/// Draws aggregated detection results onto a color canvas.
///
/// Implementations modify the canvas in place and never touch the results.
pub trait RenderSink: Send {
    fn render(
        &self,
        canvas: &mut RgbImage,
        results: &[DetectionResult],
    ) -> Result<(), Box<dyn std::error::Error>>;
}
