//! Overlap clustering for face detections.

use crate::detection::domain::face_detection::FaceDetection;

/// IoU between two bounding boxes represented as `[x1, y1, x2, y2]`.
pub fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }

    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}

/// Greedy clustering: each unassigned detection absorbs every later unassigned
/// detection whose IoU with it exceeds `threshold`.
///
/// A cluster is reported at the mean center and scale of its members with the
/// summed score. Output follows the order of each cluster's first member.
pub fn cluster_detections(detections: &[FaceDetection], threshold: f64) -> Vec<FaceDetection> {
    let mut assigned = vec![false; detections.len()];
    let mut clusters = Vec::new();

    for i in 0..detections.len() {
        if assigned[i] {
            continue;
        }
        let anchor = detections[i].bbox();
        let (mut row, mut col, mut scale, mut score) = (0.0, 0.0, 0.0, 0.0);
        let mut members = 0usize;

        for j in i..detections.len() {
            if assigned[j] {
                continue;
            }
            if j != i && bbox_iou(&anchor, &detections[j].bbox()) <= threshold {
                continue;
            }
            assigned[j] = true;
            let d = &detections[j];
            row += d.row;
            col += d.col;
            scale += d.scale;
            score += d.score;
            members += 1;
        }

        let n = members as f64;
        clusters.push(FaceDetection::new(row / n, col / n, scale / n, score));
    }

    clusters
}
