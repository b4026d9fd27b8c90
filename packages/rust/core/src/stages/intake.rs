//! Intake: raw idea text → canonical [`Brief`].

use tracing::{debug, instrument};

use launchkit_heuristics::{classify_audience, classify_product_type, normalize_language};
use launchkit_shared::{Brief, Variant};

use super::IntakeStage;

/// What the caller hands to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeRequest {
    pub idea: String,
    pub language: String,
    /// Overrides the variant's default tone when set and non-blank.
    pub tone: Option<String>,
}

impl IntakeRequest {
    /// A request with the default language (`en`) and no tone override.
    pub fn new(idea: impl Into<String>) -> Self {
        Self {
            idea: idea.into(),
            language: "en".into(),
            tone: None,
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }
}

/// Keyword-classifier intake, parameterized by variant defaults.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicIntake {
    variant: Variant,
}

impl HeuristicIntake {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    fn default_tone(&self) -> &'static str {
        match self.variant {
            Variant::Legacy => "friendly and credible",
            Variant::Fusion | Variant::Required => "friendly",
        }
    }

    fn goal(&self) -> &'static str {
        match self.variant {
            Variant::Legacy => "validate demand and initial traction",
            Variant::Fusion => "launch and validate sales",
            Variant::Required => "launch and validate traction",
        }
    }

    fn follow_up(&self) -> &'static str {
        match self.variant {
            Variant::Legacy => "Who is the primary audience?",
            Variant::Fusion | Variant::Required => "Who is the target audience or primary goal?",
        }
    }

    fn assumptions(&self) -> Vec<String> {
        let items: &[&str] = match self.variant {
            Variant::Legacy => &[
                "audience inferred from idea",
                "product type inferred from keywords",
                "goal set to early traction",
                "tone set to approachable",
                "pricing sensitivity moderate",
            ],
            Variant::Fusion => &[
                "audience inferred from idea",
                "goal set to launch/validation",
                "tone default friendly",
            ],
            Variant::Required => &[
                "audience inferred from idea if present",
                "goal defaulted to launch validation",
                "tone default friendly",
            ],
        };
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn language(&self, requested: &str) -> String {
        match self.variant {
            Variant::Required => normalize_language(requested).to_string(),
            Variant::Legacy | Variant::Fusion => {
                let trimmed = requested.trim();
                if trimmed.is_empty() {
                    "en".to_string()
                } else {
                    trimmed.to_string()
                }
            }
        }
    }
}

impl IntakeStage for HeuristicIntake {
    #[instrument(skip_all, fields(variant = %self.variant))]
    fn normalize(&self, request: &IntakeRequest) -> Brief {
        let trimmed = request.idea.trim();
        let idea = (!trimmed.is_empty()).then(|| trimmed.to_string());

        let audience = classify_audience(trimmed);
        let product_type = classify_product_type(trimmed);

        let tone = request
            .tone
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.default_tone())
            .to_string();

        let follow_up_question =
            (idea.is_none() || audience.is_default()).then(|| self.follow_up().to_string());

        debug!(
            audience = audience.label,
            product_type = product_type.label,
            has_idea = idea.is_some(),
            needs_follow_up = follow_up_question.is_some(),
            "brief normalized"
        );

        Brief {
            idea,
            audience: audience.label.to_string(),
            product_type: product_type.label.to_string(),
            goal: self.goal().to_string(),
            tone,
            language: self.language(&request.language),
            assumptions: self.assumptions(),
            follow_up_question,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::MILK_IDEA;

    const VARIANTS: [Variant; 3] = [Variant::Legacy, Variant::Fusion, Variant::Required];

    #[test]
    fn milk_idea_classifies() {
        for variant in VARIANTS {
            let brief = HeuristicIntake::new(variant).normalize(&IntakeRequest::new(MILK_IDEA));
            assert_eq!(brief.idea.as_deref(), Some(MILK_IDEA));
            assert_eq!(brief.audience, "students");
            assert_eq!(brief.product_type, "app");
            assert!(brief.follow_up_question.is_none());
        }
    }

    #[test]
    fn idea_is_trimmed() {
        let brief = HeuristicIntake::new(Variant::Fusion)
            .normalize(&IntakeRequest::new("  tutoring marketplace for parents \n"));
        assert_eq!(brief.idea.as_deref(), Some("tutoring marketplace for parents"));
        assert_eq!(brief.audience, "families");
        assert_eq!(brief.product_type, "platform");
    }

    #[test]
    fn non_empty_ideas_always_resolve_categories() {
        for idea in ["x", "Fresh bread", "A bot", "consulting for enterprise teams"] {
            for variant in VARIANTS {
                let brief = HeuristicIntake::new(variant).normalize(&IntakeRequest::new(idea));
                assert!(brief.idea.as_deref().is_some_and(|i| !i.is_empty()));
                assert!(!brief.audience.is_empty());
                assert!(!brief.product_type.is_empty());
                if brief.audience == "consumers" {
                    assert!(brief.follow_up_question.is_some(), "{idea}");
                }
            }
        }
    }

    #[test]
    fn empty_idea_asks_follow_up() {
        for variant in VARIANTS {
            let brief = HeuristicIntake::new(variant).normalize(&IntakeRequest::new("   "));
            assert!(brief.idea.is_none());
            assert_eq!(brief.audience, "consumers");
            assert_eq!(brief.product_type, "web app");
            assert!(brief.follow_up_question.as_deref().is_some_and(|q| !q.is_empty()));
        }
    }

    #[test]
    fn tone_defaults_and_overrides() {
        let fusion = HeuristicIntake::new(Variant::Fusion);
        assert_eq!(fusion.normalize(&IntakeRequest::new(MILK_IDEA)).tone, "friendly");
        assert_eq!(
            fusion
                .normalize(&IntakeRequest::new(MILK_IDEA).tone("playful"))
                .tone,
            "playful"
        );
        assert_eq!(
            fusion.normalize(&IntakeRequest::new(MILK_IDEA).tone("  ")).tone,
            "friendly"
        );
        assert_eq!(
            HeuristicIntake::new(Variant::Legacy)
                .normalize(&IntakeRequest::new(MILK_IDEA))
                .tone,
            "friendly and credible"
        );
    }

    #[test]
    fn required_variant_normalizes_language() {
        let required = HeuristicIntake::new(Variant::Required);
        let brief = required.normalize(&IntakeRequest::new(MILK_IDEA).language("Hindi"));
        assert_eq!(brief.language, "hi");
        let brief = required.normalize(&IntakeRequest::new(MILK_IDEA).language("French"));
        assert_eq!(brief.language, "en");

        let fusion = HeuristicIntake::new(Variant::Fusion);
        let brief = fusion.normalize(&IntakeRequest::new(MILK_IDEA).language("French"));
        assert_eq!(brief.language, "French");
    }

    #[test]
    fn assumptions_are_ordered() {
        let brief =
            HeuristicIntake::new(Variant::Legacy).normalize(&IntakeRequest::new(MILK_IDEA));
        assert_eq!(brief.assumptions.len(), 5);
        assert_eq!(brief.assumptions[0], "audience inferred from idea");
    }
}
