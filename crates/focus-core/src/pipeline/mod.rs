//! Per-image pipeline components.
//!
//! Everything here runs inside a single job on a single worker:
//! - **discovery**: Enumerate the input directory into jobs
//! - **validate**: Pre-decode checks (size, magic bytes)
//! - **decode**: Load and decode images
//! - **laplacian**: The variance-of-Laplacian metric
//! - **scorer**: The `ScoreFunction` seam and its default implementation

pub mod decode;
pub mod discovery;
pub mod laplacian;
pub mod scorer;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::FileDiscovery;
pub use laplacian::laplacian_variance;
pub use scorer::{LaplacianScorer, ScoreFunction};
pub use validate::Validator;
