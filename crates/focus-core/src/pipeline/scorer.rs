//! The per-job scoring seam used by the worker pool.

use std::path::Path;

use crate::config::Config;
use crate::error::ScoreResult;

use super::decode::ImageDecoder;
use super::laplacian::laplacian_variance;
use super::validate::Validator;

/// Turns one image file into a sharpness score.
///
/// Implementations are shared by every worker, so they must be `Send + Sync`
/// and keep all per-image state on the stack.
pub trait ScoreFunction: Send + Sync {
    fn score(&self, path: &Path) -> ScoreResult<f64>;
}

impl<F> ScoreFunction for F
where
    F: Fn(&Path) -> ScoreResult<f64> + Send + Sync,
{
    fn score(&self, path: &Path) -> ScoreResult<f64> {
        self(path)
    }
}

/// Validate → decode → variance of the Laplacian.
pub struct LaplacianScorer {
    validator: Validator,
    decoder: ImageDecoder,
}

impl LaplacianScorer {
    pub fn new(config: &Config) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
        }
    }
}

impl ScoreFunction for LaplacianScorer {
    fn score(&self, path: &Path) -> ScoreResult<f64> {
        let start = std::time::Instant::now();

        self.validator.validate(path)?;
        let decoded = self.decoder.decode(path)?;
        let score = laplacian_variance(&decoded.image);

        tracing::trace!(
            "Scored {:?} ({:?}, {}x{}) = {} in {:?}",
            path,
            decoded.format,
            decoded.width,
            decoded.height,
            score,
            start.elapsed()
        );
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoreError;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};

    #[test]
    fn test_closure_is_a_score_function() {
        let fake = |path: &Path| -> ScoreResult<f64> {
            if path.ends_with("bad.jpg") {
                Err(ScoreError::Decode {
                    path: path.to_path_buf(),
                    message: "corrupt".into(),
                })
            } else {
                Ok(42.0)
            }
        };
        assert_eq!(fake.score(Path::new("good.jpg")).unwrap(), 42.0);
        assert!(fake.score(Path::new("bad.jpg")).is_err());
    }

    #[test]
    fn test_laplacian_scorer_on_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let sharp = dir.path().join("sharp.png");
        let flat = dir.path().join("flat.png");
        DynamicImage::ImageLuma8(GrayImage::from_fn(24, 24, |x, _| {
            Luma([if x % 4 < 2 { 0 } else { 255 }])
        }))
        .save_with_format(&sharp, ImageFormat::Png)
        .unwrap();
        DynamicImage::ImageLuma8(GrayImage::from_pixel(24, 24, Luma([90])))
            .save_with_format(&flat, ImageFormat::Png)
            .unwrap();

        let scorer = LaplacianScorer::new(&Config::default());
        let sharp_score = scorer.score(&sharp).unwrap();
        let flat_score = scorer.score(&flat).unwrap();
        assert_eq!(flat_score, 0.0);
        assert!(sharp_score > flat_score);
    }

    #[test]
    fn test_laplacian_scorer_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.jpg");
        std::fs::write(&path, "just some text").unwrap();

        let scorer = LaplacianScorer::new(&Config::default());
        assert!(scorer.score(&path).is_err());
    }

    #[test]
    fn test_scores_images_regardless_of_name() {
        let dir = tempfile::tempdir().unwrap();
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(20, 12, |x, _| {
            Luma([if x % 8 < 4 { 30 } else { 220 }])
        }))
        .to_rgb8();

        let files = [
            ("scan", ImageFormat::Png),
            ("a.pnm", ImageFormat::Pnm),
            ("b.tga", ImageFormat::Tga),
            ("c.png.bak", ImageFormat::Png),
        ];
        for (name, format) in files {
            img.save_with_format(dir.path().join(name), format).unwrap();
        }

        let scorer = LaplacianScorer::new(&Config::default());
        let scores: Vec<f64> = files
            .iter()
            .map(|(name, _)| scorer.score(&dir.path().join(name)).unwrap())
            .collect();

        assert!(scores[0] > 0.0);
        assert!(scores.iter().all(|&s| s == scores[0]), "{scores:?}");
    }
}
