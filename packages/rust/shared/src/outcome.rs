//! Stage identifiers, confidence scores, and the tagged outcome every stage
//! returns.
//!
//! A stage either produces its payload ([`StageOutcome::Ready`]) or reports
//! a typed [`Fallback`]. Downstream stages match on the variant instead of
//! comparing payload values against a reserved string.

use serde::{Deserialize, Serialize};

use crate::error::StageError;

/// Confidence assigned to every fallback outcome.
pub const FALLBACK_CONFIDENCE: f64 = 0.4;

/// Default confidence below which a stage is flagged for review.
pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.6;

// ---------------------------------------------------------------------------
// StageId
// ---------------------------------------------------------------------------

/// Identifies one stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Intake,
    Research,
    Brand,
    Pricing,
    Gtm,
    Website,
    Deliverables,
}

impl StageId {
    /// Stages that report a confidence score, in pipeline order.
    pub const SCORED: [StageId; 5] = [
        StageId::Research,
        StageId::Brand,
        StageId::Pricing,
        StageId::Gtm,
        StageId::Website,
    ];

    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Research => "research",
            Self::Brand => "brand",
            Self::Pricing => "pricing",
            Self::Gtm => "gtm",
            Self::Website => "website",
            Self::Deliverables => "deliverables",
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// A confidence score in `[0, 1]`. Out-of-range and NaN inputs are clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// True when this score falls strictly below `threshold`.
    pub fn is_below(self, threshold: f64) -> bool {
        self.0 < threshold
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// Why a stage fell back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The brief carried no usable idea.
    NoUsableInput,
    /// A required upstream output was absent.
    MissingInput { stage: StageId },
    /// A required upstream stage itself fell back.
    UpstreamFallback { stage: StageId },
    /// Rendering failed.
    RenderFailed { message: String },
    /// The stage task panicked.
    StagePanicked,
}

impl From<&StageError> for FallbackReason {
    fn from(err: &StageError) -> Self {
        match err {
            StageError::NoUsableInput { .. } => Self::NoUsableInput,
            StageError::MissingInput { stage } => Self::MissingInput { stage: *stage },
            StageError::UpstreamFallback { stage } => Self::UpstreamFallback { stage: *stage },
            StageError::Render { message } => Self::RenderFailed {
                message: message.clone(),
            },
            StageError::Panicked { .. } => Self::StagePanicked,
        }
    }
}

/// The all-fallback representation of a stage output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fallback {
    pub reason: FallbackReason,
    pub confidence: Confidence,
    #[serde(default)]
    pub assumptions: Vec<String>,
}

impl Fallback {
    pub fn new(reason: FallbackReason) -> Self {
        Self {
            reason,
            confidence: Confidence::new(FALLBACK_CONFIDENCE),
            assumptions: vec!["no inputs".into()],
        }
    }
}

impl From<StageError> for Fallback {
    fn from(err: StageError) -> Self {
        Self::new(FallbackReason::from(&err))
    }
}

// ---------------------------------------------------------------------------
// StageOutcome
// ---------------------------------------------------------------------------

/// Implemented by every stage payload that carries a confidence score.
pub trait Scored {
    fn confidence(&self) -> Confidence;
    fn assumptions(&self) -> &[String];
}

/// What a stage hands downstream: its payload, or a typed fallback.
///
/// Serialized with an internal `status` tag (`"ready"` or `"fallback"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome<T> {
    Ready(T),
    Fallback(Fallback),
}

impl<T> StageOutcome<T> {
    /// Convert a stage-internal result at the stage boundary.
    pub fn from_result(result: std::result::Result<T, StageError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Fallback(err.into()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Fallback(_) => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Borrow the payload, or report that `stage` fell back.
    pub fn require(&self, stage: StageId) -> std::result::Result<&T, StageError> {
        self.ready().ok_or(StageError::UpstreamFallback { stage })
    }

    /// Lowercase status label, matching the serialized tag.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::Fallback(_) => "fallback",
        }
    }
}

impl<T: Scored> StageOutcome<T> {
    pub fn confidence(&self) -> Confidence {
        match self {
            Self::Ready(value) => value.confidence(),
            Self::Fallback(fallback) => fallback.confidence,
        }
    }

    pub fn assumptions(&self) -> &[String] {
        match self {
            Self::Ready(value) => value.assumptions(),
            Self::Fallback(fallback) => &fallback.assumptions,
        }
    }
}
