//! Image file adapters: decode to an RGB canvas plus a grayscale plane, and
//! save a canvas back to disk.

use std::path::Path;

use image::RgbImage;
use ndarray::{ArrayView3, Axis};

use crate::io::io_error::IoError;
use crate::shared::gray_image::GrayImage;

const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// A decoded image: the color canvas for drawing and the grayscale plane the
/// classifiers scan.
pub struct LoadedImage {
    pub canvas: RgbImage,
    pub gray: GrayImage,
}

pub fn load_image(path: &Path) -> Result<LoadedImage, IoError> {
    let canvas = image::open(path)
        .map_err(|source| IoError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let gray = to_grayscale(&canvas).map_err(|reason| IoError::InvalidImage {
        path: path.to_path_buf(),
        reason,
    })?;
    log::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        canvas.width(),
        canvas.height()
    );
    Ok(LoadedImage { canvas, gray })
}

/// Luma conversion with the weights the cascades were trained on.
pub fn to_grayscale(canvas: &RgbImage) -> Result<GrayImage, String> {
    let rows = canvas.height() as usize;
    let cols = canvas.width() as usize;
    let view = ArrayView3::from_shape((rows, cols, 3), canvas.as_raw().as_slice())
        .map_err(|e| e.to_string())?;

    let pixels: Vec<u8> = view
        .lanes(Axis(2))
        .into_iter()
        .map(|px| {
            let luma: f64 = px
                .iter()
                .zip(LUMA_WEIGHTS)
                .map(|(&c, w)| c as f64 * w)
                .sum();
            luma.round().clamp(0.0, 255.0) as u8
        })
        .collect();

    GrayImage::new(pixels, rows, cols).map_err(|e| e.to_string())
}

/// Saves a canvas, creating parent directories as needed. The format follows
/// the file extension.
pub fn save_image(path: &Path, canvas: &RgbImage) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| IoError::write(path, e))?;
    }
    canvas.save(path).map_err(|source| IoError::Encode {
        path: path.to_path_buf(),
        source,
    })
}
