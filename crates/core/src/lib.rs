//! PhotoLabel Core Library
//!
//! This library provides the image-acquisition-to-annotation pipeline behind
//! the PhotoLabel tool: pick an image, encode it, send it to the Google
//! Cloud Vision `images:annotate` endpoint, and hand back the detected
//! labels in a shape a presentation layer can render directly.
//!
//! # Overview
//!
//! The pipeline is deliberately thin glue around an external provider; it
//! performs no local inference and no image transformation. The library
//! handles:
//!
//! - **Image Acquisition**: picker abstraction via the [`source`] module
//! - **Transport Encoding**: Base64 payloads via [`encoding`]
//! - **Annotation**: the Vision API client via [`annotate`]
//! - **Orchestration**: state machine and user notices via [`pipeline`]
//!
//! # Quick Start
//!
//! ```ignore
//! use photolabel_core::{init, Config, Pipeline};
//! use photolabel_core::source::PathSource;
//!
//! init();
//! let mut pipeline = Pipeline::from_config(Config::load()?);
//!
//! let mut source = PathSource::new("photo.jpg");
//! if let Some(notice) = pipeline.select_image(&mut source).await {
//!     eprintln!("{}", notice.message());
//! }
//! if let Some(notice) = pipeline.analyze().await {
//!     eprintln!("{}", notice.message());
//! }
//! for label in pipeline.labels() {
//!     println!("{}", label.description);
//! }
//! ```
//!
//! # Module Structure
//!
//! - [`annotate`]: Vision API client and wire types
//! - [`config`]: Configuration loading and management
//! - [`encoding`]: Image byte encoding for transport
//! - [`error`]: Error types and result aliases
//! - [`pipeline`]: Orchestration and state machine
//! - [`source`]: Image selection capability
//! - [`transport`]: HTTP transport capability

pub mod annotate;
pub mod config;
pub mod encoding;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod transport;

// Re-export primary types for convenience
pub use annotate::{AnnotationClient, FeatureKind, FeatureSpec, Label};
pub use config::Config;
pub use encoding::EncodedPayload;
pub use error::{AppError, Result};
pub use pipeline::{Notice, Pipeline, Stage};
pub use source::{ImageRef, ImageSource, PathSource, Selection};
pub use transport::{HttpTransport, ReqwestTransport};

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup before using any other functions.
/// This loads `.env` files if present and sets up the environment.
pub fn init() {
    let _ = dotenvy::dotenv();
}
