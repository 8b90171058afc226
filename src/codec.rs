//! Image decode, resize and encode.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use thiserror::Error;

use crate::constants::FLATTEN_BACKGROUND;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode an image file into opaque RGBA pixels.
///
/// Translucent pixels are flattened onto [`FLATTEN_BACKGROUND`].
pub fn decode(path: &Path) -> Result<RgbaImage, CodecError> {
    let img = image::open(path).map_err(|source| CodecError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rgba = img.to_rgba8();
    flatten(&mut rgba, FLATTEN_BACKGROUND);
    log::debug!(
        "Decoded {:?}: {}x{}",
        path,
        rgba.width(),
        rgba.height()
    );
    Ok(rgba)
}

/// Composite straight-alpha pixels over an opaque `background`.
pub fn flatten(image: &mut RgbaImage, background: [u8; 3]) {
    for px in image.pixels_mut() {
        let a = u32::from(px[3]);
        if a == 255 {
            continue;
        }
        for (c, bg) in px.0.iter_mut().take(3).zip(background) {
            *c = ((u32::from(*c) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8;
        }
        px[3] = 255;
    }
}

/// Size of `(width, height)` scaled by `percent`, at least one pixel per axis.
pub fn scaled_size(width: u32, height: u32, percent: u32) -> (u32, u32) {
    let scale = |v: u32| ((u64::from(v) * u64::from(percent)) / 100).clamp(1, u64::from(u32::MAX)) as u32;
    (scale(width), scale(height))
}

/// Resize to `percent` of the source size.
pub fn resize(image: &RgbaImage, percent: u32) -> RgbaImage {
    let (w, h) = scaled_size(image.width(), image.height(), percent);
    if (w, h) == image.dimensions() {
        return image.clone();
    }
    imageops::resize(image, w, h, FilterType::Triangle)
}

/// Encode an image to `path`, format chosen by extension.
///
/// Pixels are written without alpha so lossy formats such as JPEG work.
/// Missing parent directories are created.
pub fn encode(image: &RgbaImage, path: &Path) -> Result<(), CodecError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    rgb.save(path).map_err(|source| CodecError::Encode {
        path: path.to_path_buf(),
        source,
    })
}
