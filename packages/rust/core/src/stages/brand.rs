//! Naming, taglines, palette, and logo prompts.
//!
//! Candidate scores are display hints only. Two scoring rules exist:
//! a digest rule (stable, derived from the name's SHA-256) and a positional
//! rule (derived from the candidate's index). Neither influences which name
//! is chosen; the chosen name is always the first candidate.

use sha2::{Digest, Sha256};
use tracing::instrument;

use launchkit_shared::{
    BrandKit, Brief, Confidence, MarketAssessment, NameCandidate, Palette, StageError, StageId,
    StageOutcome, Variant,
};

use super::{BrandStage, FallbackPolicy, settle};

const CONFIDENCE: f64 = 0.78;

const FONT_STACK: &str = "system-ui, -apple-system, Segoe UI, Roboto, Arial";

const LEGACY_NAMES: [&str; 20] = [
    "LaunchLy",
    "SparkNest",
    "PrimeLeap",
    "NovaLane",
    "FlowForge",
    "IdeaPilot",
    "VentureBeam",
    "QuickFoundry",
    "OrbitBase",
    "CraftSprint",
    "MintPath",
    "BrightLoom",
    "PeakTide",
    "ArrowCart",
    "BoltBay",
    "TrailMint",
    "RiseGrid",
    "Startloom",
    "Flecto",
    "Shiftr",
];

const FUSION_NAMES: [&str; 15] = [
    "MilkMate",
    "FreshFlow",
    "DairyDash",
    "PurePour",
    "CampusMilk",
    "SwiftDairy",
    "MorningPour",
    "CreamLine",
    "Milkloop",
    "Udderly",
    "WhiteWave",
    "DailyDairy",
    "FarmFresh",
    "Milkly",
    "PourJoy",
];

const REQUIRED_NAMES: [&str; 10] = [
    "BrightCart",
    "FlowMilk",
    "PurePath",
    "FreshStep",
    "MorningMaze",
    "SwiftPour",
    "CampusFresh",
    "DailyDash",
    "CreamLine",
    "WhiteWave",
];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `0.60 + (digest mod 40) / 100`, where the digest is the first eight bytes
/// of SHA-256(name) read big-endian.
pub fn digest_score(name: &str) -> f64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let bucket = u64::from_be_bytes(head) % 40;
    round2(0.60 + bucket as f64 / 100.0)
}

/// `0.60 + (index mod 35) / 100`.
pub fn positional_score(index: usize) -> f64 {
    round2(0.60 + (index % 35) as f64 / 100.0)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Brand kit from a fixed per-variant name pool.
#[derive(Debug, Clone, Copy)]
pub struct TemplateBrand {
    variant: Variant,
    policy: FallbackPolicy,
}

impl TemplateBrand {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            policy: variant.into(),
        }
    }

    fn candidates(&self, idea: &str) -> Vec<NameCandidate> {
        match self.variant {
            Variant::Legacy => LEGACY_NAMES
                .iter()
                .map(|name| NameCandidate {
                    name: name.to_string(),
                    rationale: format!("Relates to {idea} with simple, brandable sound"),
                    score: digest_score(name),
                })
                .collect(),
            Variant::Fusion | Variant::Required => {
                let pool: &[&str] = if self.variant == Variant::Fusion {
                    &FUSION_NAMES
                } else {
                    &REQUIRED_NAMES
                };
                pool.iter()
                    .enumerate()
                    .map(|(i, name)| NameCandidate {
                        name: name.to_string(),
                        rationale: format!("Relates to {idea}"),
                        score: positional_score(i),
                    })
                    .collect()
            }
        }
    }

    fn build(&self, brief: &Brief) -> Result<BrandKit, StageError> {
        let idea = self.policy.idea(brief, StageId::Brand)?;
        let names = self.candidates(idea);
        let first = names
            .first()
            .map(|n| n.name.clone())
            .ok_or_else(|| StageError::render("empty name pool"))?;

        let brand_palette = Palette {
            primary: "#2563EB".into(),
            secondary: "#111827".into(),
            accent: "#F59E0B".into(),
        };

        let kit = match self.variant {
            Variant::Legacy => BrandKit {
                names,
                taglines: to_strings(&[
                    "Start smarter, launch faster",
                    "From idea to traction in days",
                    "Build momentum with clarity",
                    "Your shortcut to product-market fit",
                    "Plan, build, and go",
                ]),
                chosen_name: None,
                palette: None,
                font_stack: FONT_STACK.into(),
                logo_prompts: vec![
                    format!(
                        "Minimal geometric mark, modern sans-serif logotype, evokes speed and clarity for {first}"
                    ),
                    format!(
                        "Friendly rounded mark, subtle gradient, approachable innovation vibe for {first}"
                    ),
                ],
                personas: to_strings(&[
                    "Pragmatic builder: clear, direct, outcome-first",
                    "Optimistic mentor: encouraging, concise, credible",
                    "Data-driven operator: precise, helpful, trustworthy",
                ]),
                assumptions: to_strings(&[
                    "names are placeholders pending trademark checks",
                    "persona tone inferred",
                ]),
                confidence: Confidence::new(CONFIDENCE),
            },
            Variant::Fusion => BrandKit {
                names,
                taglines: to_strings(&[
                    "Fresh to your door",
                    "Simple, pure, daily",
                    "Subscription freshness",
                    "Better mornings, better milk",
                    "Campus-ready dairy",
                ]),
                chosen_name: None,
                palette: Some(brand_palette),
                font_stack: FONT_STACK.into(),
                logo_prompts: vec![
                    format!("Minimal droplet mark with modern sans-serif for {first}"),
                    format!("Rounded carton icon, friendly tone for {first}"),
                ],
                personas: Vec::new(),
                assumptions: to_strings(&[
                    "colors chosen for contrast",
                    "web-safe font stack",
                    "name candidates brandable",
                ]),
                confidence: Confidence::new(CONFIDENCE),
            },
            Variant::Required => BrandKit {
                names,
                taglines: to_strings(&[
                    "Fresh made simple",
                    "Ready for every day",
                    "Quality you can count",
                    "Subscription freshness",
                    "Better mornings",
                ]),
                logo_prompts: vec![format!(
                    "Minimal droplet, modern sans-serif logotype for {first}"
                )],
                chosen_name: Some(first),
                palette: Some(brand_palette),
                font_stack: FONT_STACK.into(),
                personas: Vec::new(),
                assumptions: to_strings(&["palette chosen for contrast", "web-safe font stack"]),
                confidence: Confidence::new(CONFIDENCE),
            },
        };
        Ok(kit)
    }
}

impl BrandStage for TemplateBrand {
    #[instrument(skip_all, fields(variant = %self.variant))]
    fn brand(
        &self,
        brief: &Brief,
        _research: Option<&StageOutcome<MarketAssessment>>,
    ) -> StageOutcome<BrandKit> {
        settle(StageId::Brand, self.build(brief))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{MILK_IDEA, brief_for};

    fn kit(variant: Variant, idea: &str) -> StageOutcome<BrandKit> {
        TemplateBrand::new(variant).brand(&brief_for(variant, idea), None)
    }

    #[test]
    fn pool_sizes_per_variant() {
        for (variant, count) in [(Variant::Legacy, 20), (Variant::Fusion, 15), (Variant::Required, 10)] {
            let outcome = kit(variant, MILK_IDEA);
            let brand = outcome.ready().expect("ready");
            assert_eq!(brand.names.len(), count);
            assert!(brand.names.iter().all(|n| (0.60..=1.0).contains(&n.score)));
            assert_eq!(brand.confidence.value(), 0.78);
        }
    }

    #[test]
    fn digest_score_is_stable_and_bounded() {
        for name in LEGACY_NAMES {
            let score = digest_score(name);
            assert_eq!(score, digest_score(name));
            assert!((0.60..=0.99).contains(&score), "{name}: {score}");
        }
    }

    #[test]
    fn positional_score_wraps() {
        assert_eq!(positional_score(0), 0.60);
        assert_eq!(positional_score(5), 0.65);
        assert_eq!(positional_score(34), 0.94);
        assert_eq!(positional_score(35), 0.60);
    }

    #[test]
    fn chosen_name_is_first_candidate() {
        let outcome = kit(Variant::Required, MILK_IDEA);
        let brand = outcome.ready().expect("ready");
        assert_eq!(brand.chosen_name.as_deref(), Some("BrightCart"));
        assert_eq!(brand.display_name(), Some("BrightCart"));

        let outcome = kit(Variant::Fusion, MILK_IDEA);
        let brand = outcome.ready().expect("ready");
        assert!(brand.chosen_name.is_none());
        assert_eq!(brand.display_name(), Some("MilkMate"));
        assert!(brand.logo_prompts.iter().all(|p| p.ends_with("MilkMate")));
    }

    #[test]
    fn palette_and_personas() {
        let legacy = kit(Variant::Legacy, MILK_IDEA);
        let legacy = legacy.ready().expect("ready");
        assert!(legacy.palette.is_none());
        assert_eq!(legacy.personas.len(), 3);

        let fusion = kit(Variant::Fusion, MILK_IDEA);
        let fusion = fusion.ready().expect("ready");
        assert_eq!(
            fusion.palette.as_ref().map(|p| p.primary.as_str()),
            Some("#2563EB")
        );
        assert!(fusion.personas.is_empty());
    }

    #[test]
    fn rationale_mentions_idea() {
        let outcome = kit(Variant::Fusion, MILK_IDEA);
        let brand = outcome.ready().expect("ready");
        assert_eq!(brand.names[0].rationale, format!("Relates to {MILK_IDEA}"));
    }

    #[test]
    fn required_falls_back_without_idea() {
        assert!(kit(Variant::Required, "").is_fallback());
        assert!(!kit(Variant::Fusion, "").is_fallback());
    }
}
