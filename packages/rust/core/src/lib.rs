//! Stage strategies, deliverables aggregation, and pipeline orchestration
//! for LaunchKit.
//!
//! [`Pipeline::run`] ties the stages together:
//! intake → {research ∥ brand ∥ pricing} → gtm → website → deliverables.

pub mod deliverables;
pub mod pipeline;
pub mod stages;

pub use deliverables::{StandardDeliverables, Upstream};
pub use pipeline::{Pipeline, ProgressReporter, SilentProgress};
pub use stages::{FallbackPolicy, FanOut, IntakeRequest, StageSet};
