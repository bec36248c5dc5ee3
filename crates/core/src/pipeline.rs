//! Pipeline orchestration and state machine.
//!
//! Sequences ImageSource -> Encoder -> AnnotationClient and holds the latest
//! state for a presentation layer: the selected image, the detected labels,
//! and the last error. All failures funnel into a single [`Notice`] channel;
//! nothing here panics and the pipeline stays usable after any error.
//!
//! Stages:
//!
//! ```text
//! Idle -> ImageSelected -> Analyzing -> Labeled
//!                                    \-> Errored
//! ```
//!
//! A new selection from `Labeled` or `Errored` returns to `ImageSelected`
//! and clears prior labels and error, so stale results are never shown
//! against a new image. Concurrent analyze calls are not serialized or
//! cancelled; callers drive the pipeline from one logical thread.

use std::sync::Arc;

use crate::annotate::{AnnotationClient, FeatureSpec, Label};
use crate::config::Config;
use crate::encoding;
use crate::error::AppError;
use crate::source::{ImageSource, ImageRef, Selection};
use crate::transport::ReqwestTransport;

/// Where the pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ImageSelected,
    Analyzing,
    Labeled,
    Errored,
}

/// The single user-visible feedback channel.
///
/// Every outcome a presentation layer may need to surface arrives here;
/// no pipeline failure propagates as a panic or an unhandled error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Analyze was invoked with no image selected. A validation message,
    /// not a pipeline error.
    NoImageSelected,
    /// The analysis succeeded but the provider found no labels.
    NoLabelsFound,
    /// The image source failed to produce a selection.
    SelectionFailed(String),
    /// Encoding or annotation failed; the text is ready for display.
    Failure(String),
}

impl Notice {
    /// Display text for the notice.
    pub fn message(&self) -> String {
        match self {
            Self::NoImageSelected => "Please select an image first".to_string(),
            Self::NoLabelsFound => "No labels found".to_string(),
            Self::SelectionFailed(reason) => format!("Could not select image: {}", reason),
            Self::Failure(reason) => reason.clone(),
        }
    }
}

/// Orchestrator owning the pipeline state.
///
/// State is mutated only at the transitions below; after any completed
/// analyze attempt, labels and the last error are mutually exclusive.
pub struct Pipeline {
    client: AnnotationClient,
    spec: FeatureSpec,
    stage: Stage,
    current_image: Option<ImageRef>,
    labels: Vec<Label>,
    last_error: Option<AppError>,
}

impl Pipeline {
    pub fn new(client: AnnotationClient, spec: FeatureSpec) -> Self {
        Self {
            client,
            spec,
            stage: Stage::Idle,
            current_image: None,
            labels: Vec::new(),
            last_error: None,
        }
    }

    /// Wires a ready pipeline from a configuration, using the production
    /// HTTP transport and label detection with the configured result limit.
    pub fn from_config(config: Config) -> Self {
        let spec = FeatureSpec::labels(config.max_results);
        let client = AnnotationClient::new(config, Arc::new(ReqwestTransport::new()));
        Self::new(client, spec)
    }

    /// Runs one selection interaction against `source`.
    ///
    /// On a successful pick the previous image is replaced wholesale and
    /// prior labels and error are cleared. Cancellation leaves the state
    /// untouched and surfaces nothing. A source failure surfaces a
    /// [`Notice::SelectionFailed`] and also leaves the state untouched.
    pub async fn select_image(&mut self, source: &mut dyn ImageSource) -> Option<Notice> {
        match source.select_image().await {
            Ok(Selection::Picked(image)) => {
                log::info!("image selected: {}", image.display_name());
                self.current_image = Some(image);
                self.labels.clear();
                self.last_error = None;
                self.stage = Stage::ImageSelected;
                None
            }
            Ok(Selection::Cancelled) => {
                log::debug!("selection cancelled");
                None
            }
            Err(e) => {
                log::warn!("selection failed: {}", e);
                Some(Notice::SelectionFailed(e.to_string()))
            }
        }
    }

    /// Encodes the current image and requests annotation.
    ///
    /// With no image selected this is a validation miss: the annotation
    /// client is never invoked and the stage does not change. Otherwise the
    /// pipeline passes through `Analyzing` and lands in `Labeled` or
    /// `Errored`.
    pub async fn analyze(&mut self) -> Option<Notice> {
        let Some(image) = self.current_image.clone() else {
            return Some(Notice::NoImageSelected);
        };

        self.stage = Stage::Analyzing;

        let payload = match encoding::encode(&image).await {
            Ok(p) => p,
            Err(e) => return Some(self.fail(e)),
        };

        match self.client.annotate(&payload, &self.spec).await {
            Ok(labels) => {
                let empty = labels.is_empty();
                self.labels = labels;
                self.last_error = None;
                self.stage = Stage::Labeled;
                if empty {
                    Some(Notice::NoLabelsFound)
                } else {
                    None
                }
            }
            Err(e) => Some(self.fail(e)),
        }
    }

    fn fail(&mut self, error: AppError) -> Notice {
        log::warn!("analysis failed: {}", error);
        let notice = Notice::Failure(error.to_string());
        self.labels.clear();
        self.last_error = Some(error);
        self.stage = Stage::Errored;
        notice
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn current_image(&self) -> Option<&ImageRef> {
        self.current_image.as_ref()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }
}
