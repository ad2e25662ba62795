use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::detection::domain::landmark_point::{LandmarkPoint, PointKind};
use crate::pipeline::result_aggregator::DetectionResult;
use crate::render::domain::render_sink::RenderSink;

const FACE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const EYE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LANDMARK_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// Markers centered farther than this many canvas diagonals away are dropped.
const MAX_CENTER_OFFSET: f64 = 8.0;

/// Outline used for face markers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaceShape {
    /// Circle of radius `scale / 2`.
    #[default]
    Circle,
    /// Square of side `scale`.
    Square,
}

/// Marker overlay for detection results.
///
/// Faces are red outlines (see [`FaceShape`]), pupils green square outlines
/// of side `scale`, landmarks filled yellow dots of radius `scale / 10`.
/// Faces rejected by the quality gate are not drawn. Every shape is culled
/// and clamped against the canvas before drawing.
pub struct MarkerRenderer {
    line_width: f64,
    face_shape: FaceShape,
}

impl MarkerRenderer {
    pub fn new(line_width: f64) -> Self {
        Self {
            line_width: line_width.max(1.0),
            face_shape: FaceShape::default(),
        }
    }

    pub fn with_face_shape(mut self, shape: FaceShape) -> Self {
        self.face_shape = shape;
        self
    }

    fn draw_point(&self, canvas: &mut RgbImage, point: &LandmarkPoint) {
        let Some(reach) = CanvasReach::of(canvas, point) else {
            return;
        };
        match (point.kind, self.face_shape) {
            (PointKind::Face, FaceShape::Circle) => {
                self.hollow_circle(canvas, &reach, point.scale / 2.0)
            }
            (PointKind::Face, FaceShape::Square) => {
                self.hollow_square(canvas, point, point.scale, FACE_COLOR)
            }
            (PointKind::Eye, _) => self.hollow_square(canvas, point, point.scale, EYE_COLOR),
            (PointKind::Landmark, _) => {
                filled_circle(canvas, &reach, (point.scale / 10.0).max(1.0))
            }
        }
    }

    fn hollow_circle(&self, canvas: &mut RgbImage, reach: &CanvasReach, radius: f64) {
        let half = self.line_width / 2.0;
        if radius + half < reach.near || radius - half > reach.far {
            return;
        }
        let inner = (radius - half).max(0.0).round() as i32;
        let outer = (radius + half).min(reach.far + 1.0).round() as i32;
        for r in inner..=outer {
            draw_hollow_circle_mut(canvas, reach.center, r, FACE_COLOR);
        }
    }

    fn hollow_square(
        &self,
        canvas: &mut RgbImage,
        center: &LandmarkPoint,
        side: f64,
        color: Rgb<u8>,
    ) {
        // Edges are clamped one pixel outside the canvas so off-canvas edges stay invisible.
        let (w, h) = (canvas.width() as f64, canvas.height() as f64);
        let half = side / 2.0;
        let stroke = self.line_width.round().max(1.0) as u32;
        for i in 0..stroke {
            let inset = i as f64;
            let x0 = (center.col - half).round() + inset;
            let x1 = (center.col + half).round() - inset;
            let y0 = (center.row - half).round() + inset;
            let y1 = (center.row + half).round() - inset;
            if x1 < x0 || y1 < y0 {
                break;
            }
            let (x0, x1) = (x0.clamp(-1.0, w), x1.clamp(-1.0, w));
            let (y0, y1) = (y0.clamp(-1.0, h), y1.clamp(-1.0, h));
            let rect = Rect::at(x0 as i32, y0 as i32)
                .of_size((x1 - x0) as u32 + 1, (y1 - y0) as u32 + 1);
            draw_hollow_rect_mut(canvas, rect, color);
        }
    }
}

impl Default for MarkerRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_WIDTH)
    }
}

/// Where a marker center sits relative to the canvas.
struct CanvasReach {
    center: (i32, i32),
    /// Distance to the nearest canvas pixel (0 when inside).
    near: f64,
    /// Distance to the farthest canvas pixel.
    far: f64,
}

impl CanvasReach {
    fn of(canvas: &RgbImage, point: &LandmarkPoint) -> Option<Self> {
        if canvas.width() == 0 || canvas.height() == 0 {
            return None;
        }
        if !(point.row.is_finite() && point.col.is_finite() && point.scale.is_finite()) {
            return None;
        }
        let w = canvas.width() as f64 - 1.0;
        let h = canvas.height() as f64 - 1.0;
        let (x, y) = (point.col, point.row);

        let near = (-x).max(x - w).max(0.0).hypot((-y).max(y - h).max(0.0));
        let far = x.abs().max((x - w).abs()).hypot(y.abs().max((y - h).abs()));
        if near > MAX_CENTER_OFFSET * (w + 1.0).hypot(h + 1.0) {
            return None;
        }
        Some(Self {
            center: (x.round() as i32, y.round() as i32),
            near,
            far,
        })
    }
}

fn filled_circle(canvas: &mut RgbImage, reach: &CanvasReach, radius: f64) {
    if radius < reach.near {
        return;
    }
    if radius >= reach.far {
        for px in canvas.pixels_mut() {
            *px = LANDMARK_COLOR;
        }
        return;
    }
    draw_filled_circle_mut(canvas, reach.center, radius.round() as i32, LANDMARK_COLOR);
}

impl RenderSink for MarkerRenderer {
    fn render(
        &self,
        canvas: &mut RgbImage,
        results: &[DetectionResult],
    ) -> Result<(), Box<dyn std::error::Error>> {
        for result in results.iter().filter(|r| r.accepted) {
            for point in result.points() {
                self.draw_point(canvas, &point);
            }
        }
        Ok(())
    }
}
