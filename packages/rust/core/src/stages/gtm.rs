//! 30-day launch calendar, social posts, press pitch, and channels.

use tracing::instrument;

use launchkit_shared::{
    BrandKit, Brief, CalendarEntry, Channel, Confidence, LaunchPlan, MarketAssessment,
    PricingPlan, SocialPost, StageError, StageId, StageOutcome, Variant,
};

use super::{FallbackPolicy, GtmStage, settle};

const CONFIDENCE: f64 = 0.7;

/// Days that carry a milestone action.
pub const MILESTONE_DAYS: [u8; 5] = [1, 7, 14, 21, 30];

const CALENDAR_DAYS: u8 = 30;
const POST_COUNT: usize = 10;
const ROUTINE_ACTION: &str = "daily social and outreach";

/// 30-day launch calendar, social posts, and a press pitch.
#[derive(Debug, Clone, Copy)]
pub struct TemplateGtm {
    variant: Variant,
    policy: FallbackPolicy,
}

impl TemplateGtm {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            policy: variant.into(),
        }
    }

    fn milestones(&self) -> [&'static str; 5] {
        match self.variant {
            Variant::Legacy => [
                "publish positioning and value proposition",
                "release MVP to early adopters",
                "share case study and collect quotes",
                "launch small paid test and iterate",
                "announce open beta and referral offer",
            ],
            Variant::Fusion => [
                "announce offer and value",
                "pilot deliveries to early adopters",
                "share testimonials and adjust",
                "run small paid test",
                "open broader signups",
            ],
            Variant::Required => [
                "announce offer and value",
                "pilot to early adopters",
                "share testimonials",
                "run small paid test",
                "open broader signups",
            ],
        }
    }

    fn calendar(&self) -> Vec<CalendarEntry> {
        let milestones = self.milestones();
        (1..=CALENDAR_DAYS)
            .map(|day| match MILESTONE_DAYS.iter().position(|&d| d == day) {
                Some(i) => CalendarEntry {
                    day,
                    action: milestones[i].to_string(),
                    milestone: true,
                },
                None => CalendarEntry {
                    day,
                    action: ROUTINE_ACTION.to_string(),
                    milestone: false,
                },
            })
            .collect()
    }

    fn posts(&self, brief: &Brief, idea: &str) -> Vec<SocialPost> {
        let audience = &brief.audience;
        let (hashtags, image_prompt) = match self.variant {
            Variant::Legacy => (
                "#startup #mvp #product #growth",
                "Clean minimal graphic showing progress and speed",
            ),
            Variant::Fusion => (
                "#fresh #local #subscription #students",
                "Clean minimal graphic (milk/campus)",
            ),
            Variant::Required => ("#launch #local #subscription", "Clean minimal graphic"),
        };

        (1..=POST_COUNT)
            .map(|day| {
                let caption = match self.variant {
                    Variant::Legacy => {
                        format!("Day {day}: building for {audience} with a clear outcome")
                    }
                    Variant::Fusion => format!("Day {day}: serving {audience} - {idea}"),
                    Variant::Required => format!("Day {day}: building for {audience}"),
                };
                SocialPost {
                    platform: "Twitter".into(),
                    caption,
                    asset_type: "image".into(),
                    cta: "Join early access".into(),
                    hashtags: hashtags.into(),
                    image_prompt: image_prompt.into(),
                }
            })
            .collect()
    }

    fn press_pitch(&self, brand_name: Option<&str>) -> String {
        match self.variant {
            Variant::Legacy => "New tool helps a focused audience accelerate from idea to outcome \
                 using automation and templates. Early adopters report faster validation and \
                 clearer positioning. Seeking coverage on practical innovation and creator tools."
                .to_string(),
            Variant::Fusion => "Local, fresh subscription tailored to students, delivering \
                 consistent quality and convenience. Early subscribers report reliable mornings. \
                 Seeking coverage on practical campus services and micro-subscription innovation."
                .to_string(),
            Variant::Required => format!(
                "{} is a local, fresh subscription tailored to a clear audience. Early adopters \
                 report convenience and trust. Seeking coverage on practical micro-subscriptions \
                 and campus services.",
                brand_name.unwrap_or("Our startup")
            ),
        }
    }

    fn channels(&self) -> Vec<Channel> {
        if self.variant != Variant::Required {
            return Vec::new();
        }
        [
            ("Instagram", "visual appeal", 0.7),
            ("TikTok", "campus reach", 0.75),
            ("Campus flyers", "local trust", 0.6),
        ]
        .into_iter()
        .map(|(channel, reason, score)| Channel {
            channel: channel.into(),
            reason: reason.into(),
            score,
        })
        .collect()
    }

    fn assumptions(&self) -> Vec<String> {
        let items: &[&str] = match self.variant {
            Variant::Legacy => &["organic content viable", "early adopters reachable via social"],
            Variant::Fusion => &[
                "organic reach via campus content",
                "DMs and flyers viable",
                "referrals effective",
            ],
            Variant::Required => &["channels chosen for audience", "organic content viable"],
        };
        items.iter().map(|s| s.to_string()).collect()
    }

    fn build(
        &self,
        brief: &Brief,
        research: &StageOutcome<MarketAssessment>,
        brand: &StageOutcome<BrandKit>,
    ) -> Result<LaunchPlan, StageError> {
        let idea = self.policy.idea(brief, StageId::Gtm)?;

        let brand_name = match self.policy {
            FallbackPolicy::Propagate => {
                research.require(StageId::Research)?;
                brand.require(StageId::Brand)?.display_name()
            }
            FallbackPolicy::Lenient => brand.ready().and_then(BrandKit::display_name),
        };

        Ok(LaunchPlan {
            calendar: self.calendar(),
            posts: self.posts(brief, idea),
            press_pitch: self.press_pitch(brand_name),
            priority_channels: self.channels(),
            assumptions: self.assumptions(),
            confidence: Confidence::new(CONFIDENCE),
        })
    }
}

impl GtmStage for TemplateGtm {
    #[instrument(skip_all, fields(variant = %self.variant))]
    fn plan(
        &self,
        brief: &Brief,
        research: &StageOutcome<MarketAssessment>,
        brand: &StageOutcome<BrandKit>,
        _pricing: Option<&StageOutcome<PricingPlan>>,
    ) -> StageOutcome<LaunchPlan> {
        settle(StageId::Gtm, self.build(brief, research, brand))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::stages::StageSet;
    use crate::stages::test_support::{MILK_IDEA, brief_for};
    use launchkit_shared::FallbackReason;

    fn plan_for(variant: Variant, idea: &str) -> StageOutcome<LaunchPlan> {
        let brief = brief_for(variant, idea);
        let fan = StageSet::for_variant(variant, 0.6).fan_out_sequential(&brief);
        TemplateGtm::new(variant).plan(&brief, &fan.research, &fan.brand, Some(&fan.pricing))
    }

    #[test]
    fn calendar_has_thirty_days_and_five_milestones() {
        for variant in [Variant::Legacy, Variant::Fusion, Variant::Required] {
            let outcome = plan_for(variant, MILK_IDEA);
            let plan = outcome.ready().expect("ready");
            let days: Vec<u8> = plan.calendar.iter().map(|e| e.day).collect();
            assert_eq!(days, (1..=30).collect::<Vec<u8>>());

            let milestones: Vec<_> = plan.calendar.iter().filter(|e| e.milestone).collect();
            assert_eq!(
                milestones.iter().map(|e| e.day).collect::<Vec<_>>(),
                MILESTONE_DAYS
            );
            let distinct: HashSet<_> = milestones.iter().map(|e| e.action.as_str()).collect();
            assert_eq!(distinct.len(), 5);
            assert!(!distinct.contains(ROUTINE_ACTION));

            assert_eq!(plan.posts.len(), 10);
            assert_eq!(plan.press_pitch.matches(". ").count() + 1, 3);
        }
    }

    #[test]
    fn required_variant_names_brand_and_channels() {
        let outcome = plan_for(Variant::Required, MILK_IDEA);
        let plan = outcome.ready().expect("ready");
        assert!(plan.press_pitch.starts_with("BrightCart"));
        assert_eq!(plan.priority_channels.len(), 3);
        assert_eq!(plan.priority_channels[1].channel, "TikTok");
    }

    #[test]
    fn required_variant_falls_back_without_idea() {
        let StageOutcome::Fallback(fallback) = plan_for(Variant::Required, "") else {
            panic!("expected fallback");
        };
        assert_eq!(fallback.reason, FallbackReason::NoUsableInput);
    }

    #[test]
    fn required_variant_propagates_upstream_fallback() {
        let variant = Variant::Required;
        let brief = brief_for(variant, MILK_IDEA);
        let fan = StageSet::for_variant(variant, 0.6).fan_out_sequential(&brief);
        let failed: StageOutcome<BrandKit> =
            StageOutcome::from_result(Err(StageError::NoUsableInput {
                stage: StageId::Brand,
            }));
        let StageOutcome::Fallback(fallback) =
            TemplateGtm::new(variant).plan(&brief, &fan.research, &failed, None)
        else {
            panic!("expected fallback");
        };
        assert_eq!(
            fallback.reason,
            FallbackReason::UpstreamFallback {
                stage: StageId::Brand
            }
        );
    }

    #[test]
    fn fusion_captions_carry_idea() {
        let outcome = plan_for(Variant::Fusion, MILK_IDEA);
        let plan = outcome.ready().expect("ready");
        assert_eq!(
            plan.posts[0].caption,
            format!("Day 1: serving students - {MILK_IDEA}")
        );
        assert!(plan.priority_channels.is_empty());
    }
}
