//! Aggregation of every stage output into the export bundle.
//!
//! This stage never fails. Each file is built independently; a file whose
//! source stage fell back is replaced by a short notice naming that stage,
//! so the files map always carries the full key set.

use std::collections::BTreeMap;

use tracing::{info, instrument, warn};

use launchkit_artifacts::{
    LAYOUT_MANIFEST, OnepagerInput, render_assets_prompts, render_logo_prompts, render_next_steps,
    render_onepager, render_pitch_bullets, render_social_csv, unavailable_notice,
};
use launchkit_shared::{
    BrandKit, Brief, Confidence, ExportBundle, LaunchPlan, MarketAssessment, PricingPlan,
    ReviewFlag, SiteBundle, StageError, StageId, StageOutcome, Variant,
};

use crate::stages::{DeliverablesStage, IDEA_PLACEHOLDER};

/// Reason attached to every review flag.
pub const REVIEW_REASON: &str = "confidence below threshold";

/// Reason attached to flags when aggregation itself did not complete.
pub const DEGRADED_REASON: &str = "deliverables did not complete";

/// Every key of the files map, in map order.
pub const FILE_NAMES: [&str; 13] = [
    "README_deploy.txt",
    "about.html",
    "assets_prompts.txt",
    "contact.html",
    "index.html",
    "logo_prompts.txt",
    "next_steps.md",
    "onepager.md",
    "pitch_bullets.md",
    "pricing.html",
    "social_posts.csv",
    "styles.css",
    "zip_structure.txt",
];

/// Borrowed view of everything upstream of deliverables.
#[derive(Debug, Clone, Copy)]
pub struct Upstream<'a> {
    pub brief: &'a Brief,
    pub research: &'a StageOutcome<MarketAssessment>,
    pub brand: &'a StageOutcome<BrandKit>,
    pub pricing: &'a StageOutcome<PricingPlan>,
    pub gtm: &'a StageOutcome<LaunchPlan>,
    pub website: &'a StageOutcome<SiteBundle>,
}

impl Upstream<'_> {
    /// Confidence and readiness of a scored stage, or `None` for intake and
    /// deliverables.
    fn score(&self, stage: StageId) -> Option<(Confidence, bool)> {
        match stage {
            StageId::Research => Some((self.research.confidence(), !self.research.is_fallback())),
            StageId::Brand => Some((self.brand.confidence(), !self.brand.is_fallback())),
            StageId::Pricing => Some((self.pricing.confidence(), !self.pricing.is_fallback())),
            StageId::Gtm => Some((self.gtm.confidence(), !self.gtm.is_fallback())),
            StageId::Website => Some((self.website.confidence(), !self.website.is_fallback())),
            StageId::Intake | StageId::Deliverables => None,
        }
    }

    fn assumptions(&self, stage: StageId) -> Vec<String> {
        match stage {
            StageId::Intake => self.brief.assumptions.clone(),
            StageId::Research => self.research.assumptions().to_vec(),
            StageId::Brand => self.brand.assumptions().to_vec(),
            StageId::Pricing => self.pricing.assumptions().to_vec(),
            StageId::Gtm => self.gtm.assumptions().to_vec(),
            StageId::Website => self.website.assumptions().to_vec(),
            StageId::Deliverables => Vec::new(),
        }
    }

    fn confidence_map(&self) -> BTreeMap<StageId, Confidence> {
        StageId::SCORED
            .into_iter()
            .filter_map(|stage| self.score(stage).map(|(score, _)| (stage, score)))
            .collect()
    }

    fn assumption_map(&self) -> BTreeMap<StageId, Vec<String>> {
        std::iter::once(StageId::Intake)
            .chain(StageId::SCORED)
            .map(|stage| (stage, self.assumptions(stage)))
            .collect()
    }
}

/// Clarifying question offered to the user when `stage` scored low.
pub fn recovery_question(stage: StageId) -> &'static str {
    match stage {
        StageId::Research => "Which region should we focus on (city/campus)?",
        StageId::Brand => "Do you prefer playful or professional tone for names?",
        StageId::Pricing => "What is the target price range for the MVP tier?",
        StageId::Gtm => "Which primary channels should we prioritize (e.g., Instagram/TikTok/Email)?",
        _ => "Which audience or goal should we optimize for?",
    }
}

/// Regeneration instruction embedding the serialized brief.
pub fn retry_hint(brief_json: &str) -> String {
    format!(
        "Regenerate: be more specific and use concrete local assumptions; reference intake: {brief_json}."
    )
}

/// Bundle used when aggregation itself failed with `err`.
///
/// Every file carries an unavailable notice and every scored stage is
/// flagged, so the result still has the full key set and asks for review.
pub fn degraded_bundle(upstream: &Upstream<'_>, err: &StageError) -> ExportBundle {
    let reason = err.to_string();
    let files = FILE_NAMES
        .iter()
        .map(|file| (file.to_string(), unavailable_notice(file, &reason)))
        .collect();
    let confidence = upstream.confidence_map();
    let needs_review = confidence
        .iter()
        .map(|(&stage, &score)| ReviewFlag {
            stage,
            reason: DEGRADED_REASON.to_string(),
            confidence: score,
            auto_retry_hint: None,
            user_question: None,
        })
        .collect();

    ExportBundle {
        files,
        assumptions: upstream.assumption_map(),
        confidence,
        needs_review,
        export_ready: true,
    }
}

/// The deliverables implementation shared by every variant.
#[derive(Debug, Clone, Copy)]
pub struct StandardDeliverables {
    threshold: f64,
    /// Attach retry hints and questions to flags on stages that produced
    /// real content.
    recovery: bool,
}

impl StandardDeliverables {
    pub fn new(variant: Variant, threshold: f64) -> Self {
        Self {
            threshold,
            recovery: variant == Variant::Required,
        }
    }

    /// Flags for every scored stage strictly below the threshold.
    pub fn review(&self, upstream: &Upstream<'_>) -> Vec<ReviewFlag> {
        let brief_json = if self.recovery {
            match serde_json::to_string(upstream.brief) {
                Ok(json) => Some(json),
                Err(e) => {
                    warn!(error = %e, "could not serialize brief; skipping retry hints");
                    None
                }
            }
        } else {
            None
        };

        StageId::SCORED
            .iter()
            .filter_map(|&stage| {
                let (confidence, ready) = upstream.score(stage)?;
                if !confidence.is_below(self.threshold) {
                    return None;
                }
                let enrich = ready && self.recovery;
                Some(ReviewFlag {
                    stage,
                    reason: REVIEW_REASON.to_string(),
                    confidence,
                    auto_retry_hint: brief_json.as_deref().filter(|_| enrich).map(retry_hint),
                    user_question: enrich.then(|| recovery_question(stage).to_string()),
                })
            })
            .collect()
    }

    fn files(&self, upstream: &Upstream<'_>, flagged: &[ReviewFlag]) -> BTreeMap<String, String> {
        let site = upstream.website.require(StageId::Website);
        let page = |select: fn(&SiteBundle) -> Option<&String>,
                    missing: StageError|
         -> Result<String, StageError> {
            let bundle = site.clone()?;
            select(bundle).cloned().ok_or(missing)
        };
        let pricing_missing = upstream
            .pricing
            .require(StageId::Pricing)
            .err()
            .unwrap_or(StageError::MissingInput {
                stage: StageId::Website,
            });
        let page_missing = StageError::MissingInput {
            stage: StageId::Website,
        };

        let mut entries: Vec<(&str, Result<String, StageError>)> = Vec::with_capacity(13);

        entries.push(("index.html", site.clone().map(|s| s.index_html.clone())));
        entries.push((
            "about.html",
            page(|s| s.about_html.as_ref(), page_missing.clone()),
        ));
        entries.push((
            "pricing.html",
            page(|s| s.pricing_html.as_ref(), pricing_missing),
        ));
        entries.push((
            "contact.html",
            page(|s| s.contact_html.as_ref(), page_missing),
        ));
        entries.push(("styles.css", site.clone().map(|s| s.styles_css.clone())));
        entries.push((
            "README_deploy.txt",
            site.clone().map(|s| s.deploy_instructions.clone()),
        ));
        entries.push((
            "assets_prompts.txt",
            site.clone().map(|s| render_assets_prompts(&s.assets)),
        ));
        entries.push((
            "social_posts.csv",
            upstream
                .gtm
                .require(StageId::Gtm)
                .map(|plan| render_social_csv(&plan.posts)),
        ));
        entries.push((
            "logo_prompts.txt",
            upstream
                .brand
                .require(StageId::Brand)
                .map(|kit| render_logo_prompts(&kit.logo_prompts)),
        ));
        entries.push(("onepager.md", Ok(self.onepager(upstream, flagged))));
        entries.push(("pitch_bullets.md", Ok(render_pitch_bullets())));
        entries.push(("next_steps.md", Ok(render_next_steps())));
        entries.push(("zip_structure.txt", Ok(LAYOUT_MANIFEST.to_string())));

        entries
            .into_iter()
            .map(|(file, content)| {
                let body = content.unwrap_or_else(|err| {
                    warn!(file, error = %err, "file unavailable");
                    unavailable_notice(file, &err.to_string())
                });
                (file.to_string(), body)
            })
            .collect()
    }

    fn onepager(&self, upstream: &Upstream<'_>, flagged: &[ReviewFlag]) -> String {
        let kit = upstream.brand.ready();
        let snapshot = upstream
            .research
            .require(StageId::Research)
            .map(|r| r.snapshot.clone())
            .unwrap_or_else(|e| format!("Market research unavailable: {e}."));
        let tiers: Vec<String> = upstream
            .pricing
            .ready()
            .map(|plan| plan.tiers.iter().map(|t| t.name.to_string()).collect())
            .unwrap_or_default();

        render_onepager(&OnepagerInput {
            title: kit.and_then(BrandKit::display_name).unwrap_or("Startup"),
            tagline: kit.and_then(BrandKit::primary_tagline).unwrap_or(""),
            idea: upstream.brief.idea.as_deref().unwrap_or(IDEA_PLACEHOLDER),
            audience: &upstream.brief.audience,
            market_snapshot: &snapshot,
            tiers,
            flagged: flagged.iter().map(|f| f.stage.to_string()).collect(),
        })
    }
}

impl DeliverablesStage for StandardDeliverables {
    #[instrument(skip_all, fields(threshold = self.threshold, recovery = self.recovery))]
    fn assemble(&self, upstream: &Upstream<'_>) -> ExportBundle {
        let needs_review = self.review(upstream);

        let confidence = upstream.confidence_map();
        let assumptions = upstream.assumption_map();
        let files = self.files(upstream, &needs_review);

        info!(
            files = files.len(),
            flagged = needs_review.len(),
            "deliverables assembled"
        );

        ExportBundle {
            files,
            assumptions,
            confidence,
            needs_review,
            export_ready: true,
        }
    }
}
