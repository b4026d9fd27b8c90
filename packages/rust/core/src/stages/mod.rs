//! Stage interfaces and the per-variant template implementations.
//!
//! Each role has one trait. [`StageSet`] bundles one implementation per role
//! and is what the orchestrator runs. [`StageSet::for_variant`] builds the
//! template-backed set for a [`Variant`]; individual roles can be swapped
//! with the `with_*` methods.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use launchkit_shared::{
    BrandKit, Brief, ExportBundle, LaunchPlan, MarketAssessment, PricingPlan, Scored, SiteBundle,
    StageError, StageId, StageOutcome, Variant,
};

pub mod brand;
pub mod gtm;
pub mod intake;
pub mod pricing;
pub mod research;
pub mod website;

pub use brand::TemplateBrand;
pub use gtm::TemplateGtm;
pub use intake::{HeuristicIntake, IntakeRequest};
pub use pricing::TemplatePricing;
pub use research::TemplateResearch;
pub use website::TemplateWebsite;

use crate::deliverables::{StandardDeliverables, Upstream};

/// Rendered in place of the idea when a lenient variant has none.
pub(crate) const IDEA_PLACEHOLDER: &str = "your idea";

// ---------------------------------------------------------------------------
// Stage traits
// ---------------------------------------------------------------------------

/// Turns raw idea text into a [`Brief`]. Never fails.
pub trait IntakeStage: Send + Sync {
    fn normalize(&self, request: &IntakeRequest) -> Brief;
}

pub trait ResearchStage: Send + Sync {
    fn research(&self, brief: &Brief) -> StageOutcome<MarketAssessment>;
}

pub trait BrandStage: Send + Sync {
    fn brand(
        &self,
        brief: &Brief,
        research: Option<&StageOutcome<MarketAssessment>>,
    ) -> StageOutcome<BrandKit>;
}

pub trait PricingStage: Send + Sync {
    fn price(
        &self,
        brief: &Brief,
        research: Option<&StageOutcome<MarketAssessment>>,
        brand: Option<&StageOutcome<BrandKit>>,
    ) -> StageOutcome<PricingPlan>;
}

pub trait GtmStage: Send + Sync {
    fn plan(
        &self,
        brief: &Brief,
        research: &StageOutcome<MarketAssessment>,
        brand: &StageOutcome<BrandKit>,
        pricing: Option<&StageOutcome<PricingPlan>>,
    ) -> StageOutcome<LaunchPlan>;
}

pub trait WebsiteStage: Send + Sync {
    fn render(
        &self,
        brief: &Brief,
        brand: &StageOutcome<BrandKit>,
        pricing: &StageOutcome<PricingPlan>,
        launch: Option<&StageOutcome<LaunchPlan>>,
    ) -> StageOutcome<SiteBundle>;
}

/// Aggregates every upstream output. Always produces a bundle.
pub trait DeliverablesStage: Send + Sync {
    fn assemble(&self, upstream: &Upstream<'_>) -> ExportBundle;
}

// ---------------------------------------------------------------------------
// Fallback policy
// ---------------------------------------------------------------------------

/// How a variant treats a brief without a usable idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Render with a placeholder and stay ready.
    Lenient,
    /// Fall back, so "no usable input" travels downstream as data.
    Propagate,
}

impl From<Variant> for FallbackPolicy {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Legacy | Variant::Fusion => Self::Lenient,
            Variant::Required => Self::Propagate,
        }
    }
}

impl FallbackPolicy {
    /// The idea text a stage should render with.
    pub(crate) fn idea<'a>(
        self,
        brief: &'a Brief,
        stage: StageId,
    ) -> Result<&'a str, StageError> {
        match (self, brief.idea.as_deref()) {
            (_, Some(idea)) => Ok(idea),
            (Self::Lenient, None) => Ok(IDEA_PLACEHOLDER),
            (Self::Propagate, None) => Err(StageError::NoUsableInput { stage }),
        }
    }
}

/// Convert a stage-internal result into its outcome and log it.
pub(crate) fn settle<T: Scored>(
    stage: StageId,
    result: Result<T, StageError>,
) -> StageOutcome<T> {
    if let Err(err) = &result {
        warn!(%stage, error = %err, "stage fell back");
    }
    let outcome = StageOutcome::from_result(result);
    debug!(
        %stage,
        status = outcome.status(),
        confidence = outcome.confidence().value(),
        "stage settled"
    );
    outcome
}

// ---------------------------------------------------------------------------
// StageSet
// ---------------------------------------------------------------------------

/// Outputs of the three stages that only depend on intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanOut {
    pub research: StageOutcome<MarketAssessment>,
    pub brand: StageOutcome<BrandKit>,
    pub pricing: StageOutcome<PricingPlan>,
}

/// One implementation per stage role.
#[derive(Clone)]
pub struct StageSet {
    pub intake: Arc<dyn IntakeStage>,
    pub research: Arc<dyn ResearchStage>,
    pub brand: Arc<dyn BrandStage>,
    pub pricing: Arc<dyn PricingStage>,
    pub gtm: Arc<dyn GtmStage>,
    pub website: Arc<dyn WebsiteStage>,
    pub deliverables: Arc<dyn DeliverablesStage>,
}

impl StageSet {
    /// Template-backed stages for `variant`, flagging stages scoring below
    /// `review_threshold`.
    pub fn for_variant(variant: Variant, review_threshold: f64) -> Self {
        Self {
            intake: Arc::new(HeuristicIntake::new(variant)),
            research: Arc::new(TemplateResearch::new(variant)),
            brand: Arc::new(TemplateBrand::new(variant)),
            pricing: Arc::new(TemplatePricing::new(variant)),
            gtm: Arc::new(TemplateGtm::new(variant)),
            website: Arc::new(TemplateWebsite::new(variant)),
            deliverables: Arc::new(StandardDeliverables::new(variant, review_threshold)),
        }
    }

    pub fn with_research(mut self, stage: impl ResearchStage + 'static) -> Self {
        self.research = Arc::new(stage);
        self
    }

    pub fn with_brand(mut self, stage: impl BrandStage + 'static) -> Self {
        self.brand = Arc::new(stage);
        self
    }

    pub fn with_pricing(mut self, stage: impl PricingStage + 'static) -> Self {
        self.pricing = Arc::new(stage);
        self
    }

    pub fn with_gtm(mut self, stage: impl GtmStage + 'static) -> Self {
        self.gtm = Arc::new(stage);
        self
    }

    pub fn with_website(mut self, stage: impl WebsiteStage + 'static) -> Self {
        self.website = Arc::new(stage);
        self
    }

    pub fn with_deliverables(mut self, stage: impl DeliverablesStage + 'static) -> Self {
        self.deliverables = Arc::new(stage);
        self
    }

    /// Run research, brand, and pricing one after another on this thread.
    pub fn fan_out_sequential(&self, brief: &Brief) -> FanOut {
        FanOut {
            research: self.research.research(brief),
            brand: self.brand.brand(brief, None),
            pricing: self.pricing.price(brief, None, None),
        }
    }
}

impl std::fmt::Debug for StageSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageSet").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use launchkit_shared::{Brief, Variant};

    use super::{HeuristicIntake, IntakeRequest, IntakeStage};

    pub const MILK_IDEA: &str = "A subscription milk delivery app for college students";

    pub fn brief_for(variant: Variant, idea: &str) -> Brief {
        HeuristicIntake::new(variant).normalize(&IntakeRequest::new(idea))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{MILK_IDEA, brief_for};

    #[test]
    fn policy_follows_variant() {
        assert_eq!(FallbackPolicy::from(Variant::Legacy), FallbackPolicy::Lenient);
        assert_eq!(FallbackPolicy::from(Variant::Fusion), FallbackPolicy::Lenient);
        assert_eq!(FallbackPolicy::from(Variant::Required), FallbackPolicy::Propagate);
    }

    #[test]
    fn lenient_policy_uses_placeholder() {
        let brief = brief_for(Variant::Fusion, "   ");
        assert_eq!(
            FallbackPolicy::Lenient.idea(&brief, StageId::Research),
            Ok(IDEA_PLACEHOLDER)
        );
        assert_eq!(
            FallbackPolicy::Propagate.idea(&brief, StageId::Research),
            Err(StageError::NoUsableInput {
                stage: StageId::Research
            })
        );
    }

    #[test]
    fn sequential_fan_out_is_deterministic() {
        for variant in [Variant::Legacy, Variant::Fusion, Variant::Required] {
            let stages = StageSet::for_variant(variant, 0.6);
            let brief = brief_for(variant, MILK_IDEA);
            assert_eq!(
                stages.fan_out_sequential(&brief),
                stages.fan_out_sequential(&brief)
            );
        }
    }
}
