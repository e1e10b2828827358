//! Core library for the Sort Visualiser application.
//!
//! The crate animates classic sorting algorithms over a randomly generated
//! sequence of bounded integers. Each module owns a distinct subsystem: the
//! sequence container and its generator, the stepwise algorithm engine, the
//! pacing/cancellation layer, the run controller that the presentation
//! shell drives, and a textual frame renderer. The engine emits an
//! observable step after every state-changing operation and suspends via
//! the pacer before continuing, which is what turns a plain sort into an
//! animation.

pub mod algorithms;
pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod pacing;
pub mod render;
pub mod sequence;

pub use algorithms::Algorithm;
pub use config::{AppConfig, PacingConfig, SequenceConfig, MAX_DELAY_MS, MIN_DELAY_MS};
pub use control::SortController;
pub use engine::{run, RunOutcome, RunSummary, Step, StepKind, StepRecord};
pub use error::{Result, SortVizError};
pub use pacing::{CancelToken, Cancelled, Pacer, SpeedControl};
pub use render::FrameRenderer;
pub use sequence::Sequence;
