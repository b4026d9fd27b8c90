//! Three-tier subscription pricing and MVP steps.

use tracing::instrument;

use launchkit_shared::{
    BrandKit, Brief, Confidence, MarketAssessment, PricingPlan, PricingTier, StageId,
    StageOutcome, TierName, Variant,
};

use super::{PricingStage, settle};

const CONFIDENCE: f64 = 0.76;

/// Monthly USD price per tier, ascending.
const PRICES: [u32; 3] = [19, 49, 129];

const COST_NOTES: [[&str; 3]; 3] = [
    ["hosting $0.10/user/mo", "support 1h/50 users", "no paid ads"],
    ["hosting $0.25/user/mo", "support 1h/20 users", "light paid ads"],
    ["hosting $0.50/user/mo", "support 1h/10 users", "partner commissions"],
];

const RATIONALE: [&str; 3] = [
    "entry tier for validation",
    "features for flexibility",
    "team/campus scaling",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Three fixed tiers. Does not depend on the idea, so it never falls back.
#[derive(Debug, Clone, Copy)]
pub struct TemplatePricing {
    variant: Variant,
}

impl TemplatePricing {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    fn features(&self) -> [[&'static str; 3]; 3] {
        match self.variant {
            Variant::Legacy => [
                ["core workflow", "basic templates", "email support"],
                ["advanced automation", "integrations", "priority support"],
                ["team seats", "analytics", "concierge onboarding"],
            ],
            Variant::Fusion => [
                ["daily/alternate-day delivery", "basic account", "email support"],
                ["custom schedule", "mobile updates", "priority support"],
                ["bulk campus plans", "analytics", "concierge"],
            ],
            Variant::Required => [
                ["basic subscription", "weekly delivery", "email support"],
                ["custom schedule", "mobile updates", "priority support"],
                ["bulk plans", "analytics", "concierge"],
            ],
        }
    }

    fn plan(&self) -> PricingPlan {
        let features = self.features();
        let required = self.variant == Variant::Required;

        let tiers = TierName::ALL
            .iter()
            .enumerate()
            .map(|(i, &name)| PricingTier {
                name,
                features: strings(&features[i]),
                monthly_price_usd: PRICES[i],
                cost_assumptions: strings(&COST_NOTES[i]),
                rationale: required.then(|| RATIONALE[i].to_string()),
            })
            .collect();

        let (mvp_steps, assumptions): (&[&str], &[&str]) = match self.variant {
            Variant::Legacy => (
                &["define niche persona", "ship core workflow", "collect 10 testimonials"],
                &["pricing sensitivities estimated", "persona tone inferred"],
            ),
            Variant::Fusion => (
                &[
                    "define niche (e.g., dorms)",
                    "set ordering workflow",
                    "collect first 20 subscribers",
                ],
                &[
                    "costs scale with delivery volume",
                    "support hours per user low",
                    "ads light initially",
                ],
            ),
            Variant::Required => (
                &["validate demand with MVP tier", "measure conversion", "upsell to Plus"],
                &[
                    "infra scales with seats",
                    "support hours vary by tier",
                    "ads budget small at start",
                ],
            ),
        };

        PricingPlan {
            tiers,
            mvp_steps: strings(mvp_steps),
            cost_assumptions: strings(&[
                "infra scales with seats",
                "support hours vary by tier",
                "ads budget small at start",
            ]),
            recommendation: required.then(|| {
                "Start with MVP at $19/mo, test conversion, then upsell to Plus.".to_string()
            }),
            assumptions: strings(assumptions),
            confidence: Confidence::new(CONFIDENCE),
        }
    }
}

impl PricingStage for TemplatePricing {
    #[instrument(skip_all, fields(variant = %self.variant))]
    fn price(
        &self,
        _brief: &Brief,
        _research: Option<&StageOutcome<MarketAssessment>>,
        _brand: Option<&StageOutcome<BrandKit>>,
    ) -> StageOutcome<PricingPlan> {
        settle(StageId::Pricing, Ok(self.plan()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{MILK_IDEA, brief_for};

    const VARIANTS: [Variant; 3] = [Variant::Legacy, Variant::Fusion, Variant::Required];

    #[test]
    fn three_ascending_tiers() {
        for variant in VARIANTS {
            let outcome =
                TemplatePricing::new(variant).price(&brief_for(variant, MILK_IDEA), None, None);
            let plan = outcome.ready().expect("ready");
            let names: Vec<_> = plan.tiers.iter().map(|t| t.name).collect();
            assert_eq!(names, TierName::ALL);
            let prices: Vec<_> = plan.tiers.iter().map(|t| t.monthly_price_usd).collect();
            assert_eq!(prices, vec![19, 49, 129]);
            assert!(prices.windows(2).all(|w| w[0] < w[1]));
            assert!(plan.tiers.iter().all(|t| t.features.len() == 3));
            assert_eq!(plan.confidence.value(), 0.76);
        }
    }

    #[test]
    fn every_tier_carries_cost_notes() {
        for variant in VARIANTS {
            let outcome =
                TemplatePricing::new(variant).price(&brief_for(variant, MILK_IDEA), None, None);
            let plan = outcome.ready().expect("ready");
            for (tier, notes) in plan.tiers.iter().zip(COST_NOTES) {
                assert_eq!(tier.cost_assumptions, notes, "{variant} {}", tier.name);
            }
        }
    }

    #[test]
    fn never_falls_back_without_idea() {
        for variant in VARIANTS {
            let outcome = TemplatePricing::new(variant).price(&brief_for(variant, ""), None, None);
            assert!(!outcome.is_fallback());
        }
    }

    #[test]
    fn required_variant_adds_rationale_and_recommendation() {
        let outcome = TemplatePricing::new(Variant::Required).price(
            &brief_for(Variant::Required, MILK_IDEA),
            None,
            None,
        );
        let plan = outcome.ready().expect("ready");
        assert_eq!(
            plan.tiers[0].rationale.as_deref(),
            Some("entry tier for validation")
        );
        assert!(
            plan.recommendation
                .as_deref()
                .is_some_and(|r| r.contains("$19/mo"))
        );
    }

    #[test]
    fn summary_line_lists_every_tier() {
        let outcome = TemplatePricing::new(Variant::Fusion).price(
            &brief_for(Variant::Fusion, MILK_IDEA),
            None,
            None,
        );
        assert_eq!(
            outcome.ready().expect("ready").summary_line(),
            "MVP: $19/mo, Plus: $49/mo, Premium: $129/mo"
        );
    }
}
