//! Image decoding with content-based format detection and dimension limits.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::ScoreError;

/// Image decoder with configurable limits.
///
/// Decoding is synchronous: it runs on the worker thread that owns the job.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read and decode the file at `path`.
    pub fn decode(&self, path: &Path) -> Result<DecodedImage, ScoreError> {
        let bytes = std::fs::read(path).map_err(|e| ScoreError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        })?;
        self.decode_bytes(bytes, path)
    }

    /// Decode an in-memory buffer, using `path` for format fallback and errors.
    pub fn decode_bytes(&self, bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, ScoreError> {
        let mut reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ScoreError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => {
                let fallback =
                    ImageFormat::from_path(path).map_err(|_| ScoreError::UnsupportedFormat {
                        path: path.to_path_buf(),
                        format: path
                            .extension()
                            .and_then(|e| e.to_str())
                            .unwrap_or("unknown")
                            .to_string(),
                    })?;
                reader.set_format(fallback);
                fallback
            }
        };
        let image = reader.decode().map_err(|e| ScoreError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ScoreError::EmptyImage(path.to_path_buf()));
        }
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(ScoreError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim: self.limits.max_image_dimension,
            });
        }

        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }
}
