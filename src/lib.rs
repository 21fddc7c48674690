//! Preview Annotations - comment dialogs and annotation modes for document previews
//!
//! Provides the annotation dialog state machine (point and drawing placement),
//! the annotation mode controller abstraction, and the drawing mode controller
//! with its per-page spatial index of saved drawings. Hosts plug in their own
//! element surface, annotator and threads; [`memory`] supplies headless ones.

pub mod config;
pub mod constants;
pub mod controller;
pub mod dialog;
pub mod error;
pub mod memory;
pub mod model;
pub mod spatial;
pub mod surface;
pub mod util;

#[cfg(test)]
mod tests;

pub use config::AnnotatorConfig;
pub use controller::{
    AnnotationMode, AnnotationModeController, AnnotatorFacade, DrawingModeController,
};
pub use dialog::AnnotationDialog;
pub use error::ConfigError;
