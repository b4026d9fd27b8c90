use tracing::{debug, instrument};

use launchkit_artifacts::{
    DEPLOY_README, FeatureCard, IndexPage, PriceRow, SiteIdentity, render_about, render_contact,
    render_index, render_pricing, render_styles,
};
use launchkit_shared::{
    AssetDescriptor, BrandKit, Brief, Confidence, LaunchPlan, Palette, PricingPlan, SiteBundle,
    StageId, StageOutcome, Variant,
};

use super::{IDEA_PLACEHOLDER, WebsiteStage, settle};

const CONFIDENCE: f64 = 0.8;
/// Used when the brand kit fell back; below the default review threshold.
const DEGRADED_CONFIDENCE: f64 = 0.5;

const DEFAULT_TITLE: &str = "Startup";
const DEFAULT_TAGLINE: &str = "Launch faster";
const DEFAULT_FONT_STACK: &str = "system-ui, -apple-system, Segoe UI, Roboto, Arial";
const CONTACT_EMAIL: &str = "hello@example.com";

/// Four static pages and a stylesheet rendered from brand and pricing.
#[derive(Debug, Clone, Copy)]
pub struct TemplateWebsite {
    variant: Variant,
}

impl TemplateWebsite {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    fn identity(&self, brief: &Brief, brand: Option<&BrandKit>) -> SiteIdentity {
        match brand {
            Some(kit) => SiteIdentity {
                title: kit.display_name().unwrap_or(DEFAULT_TITLE).to_string(),
                tagline: kit.primary_tagline().unwrap_or(DEFAULT_TAGLINE).to_string(),
                palette: kit.palette.clone().unwrap_or_default(),
                font_stack: kit.font_stack.clone(),
            },
            None => SiteIdentity {
                title: brief.idea.as_deref().unwrap_or(DEFAULT_TITLE).to_string(),
                tagline: DEFAULT_TAGLINE.to_string(),
                palette: Palette::default(),
                font_stack: DEFAULT_FONT_STACK.to_string(),
            },
        }
    }

    fn features(&self, pricing: Option<&PricingPlan>) -> Vec<FeatureCard> {
        let headings: Vec<String> = match (self.variant, pricing) {
            (_, None) => ["Fast setup", "Clear outcomes", "Helpful support"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            (Variant::Legacy, Some(plan)) => plan
                .tiers
                .first()
                .map(|tier| tier.features.iter().take(3).cloned().collect())
                .unwrap_or_default(),
            (Variant::Fusion | Variant::Required, Some(plan)) => plan
                .tiers
                .iter()
                .filter_map(|tier| tier.features.first().cloned())
                .collect(),
        };

        let blurbs = match self.variant {
            Variant::Legacy => [
                "Simple and effective.",
                "Templates to start fast.",
                "Support when you need it.",
            ],
            Variant::Fusion | Variant::Required => [
                "Simple and effective.",
                "Flexible and clear.",
                "Scale when ready.",
            ],
        };

        headings
            .into_iter()
            .zip(blurbs)
            .enumerate()
            .map(|(i, (heading, blurb))| FeatureCard {
                heading,
                blurb: blurb.to_string(),
                image: format!("assets/feature-{}.png", i + 1),
            })
            .collect()
    }

    fn about_copy(&self, brief: &Brief) -> (String, &'static str) {
        let audience = &brief.audience;
        match self.variant {
            Variant::Legacy => (
                format!("Our mission is to help {audience} achieve outcomes faster."),
                "Built to simplify and accelerate.",
            ),
            Variant::Fusion => (
                format!("Serve {audience} with fresh convenience."),
                "Born from the need for reliable, student-friendly subscriptions.",
            ),
            Variant::Required => (
                "We help founders move from idea to traction.".to_string(),
                "Built from real pains.",
            ),
        }
    }

    fn assets(&self, title: &str) -> Vec<AssetDescriptor> {
        let asset = |file: &str, alt: &str, prompt: &str, size: Option<&str>| AssetDescriptor {
            file: file.to_string(),
            alt: alt.to_string(),
            prompt: prompt.to_string(),
            size: size.map(str::to_string),
        };
        let hero_alt = format!("Hero visual for {title}");

        match self.variant {
            Variant::Legacy => vec![
                asset(
                    "assets/hero.jpg",
                    &hero_alt,
                    "Abstract geometric speed/clarity motif, soft gradient",
                    None,
                ),
                asset("assets/feature-1.png", "Feature icon", "Minimal line icon of automation", None),
                asset("assets/feature-2.png", "Feature icon", "Minimal line icon of templates", None),
                asset("assets/feature-3.png", "Feature icon", "Minimal line icon of support", None),
                asset(
                    "assets/social-proof.jpg",
                    "Testimonials collage",
                    "Clean quotes layout, subtle background",
                    None,
                ),
            ],
            Variant::Fusion | Variant::Required => {
                let mut assets = vec![asset(
                    "assets/hero.jpg",
                    &hero_alt,
                    "Droplet/cream motif",
                    Some("1200x800"),
                )];
                assets.extend((1..=3).map(|i| {
                    asset(
                        &format!("assets/feature-{i}.png"),
                        "Feature icon",
                        "Minimal line icon",
                        Some("256x256"),
                    )
                }));
                assets
            }
        }
    }

    fn assumptions(&self, brand_ready: bool) -> Vec<String> {
        let mut items: Vec<String> = ["pages tailored to idea", "JSON-LD present", "pure static site"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        if !brand_ready {
            items.push("brand unavailable; default identity used".to_string());
        }
        items
    }

    fn build(
        &self,
        brief: &Brief,
        brand: &StageOutcome<BrandKit>,
        pricing: &StageOutcome<PricingPlan>,
    ) -> SiteBundle {
        let kit = brand.ready();
        let plan = pricing.ready();
        let identity = self.identity(brief, kit);

        let rows: Option<Vec<PriceRow>> = plan.map(|plan| {
            plan.tiers
                .iter()
                .map(|tier| PriceRow {
                    name: tier.name.to_string(),
                    price: tier.price_label(),
                })
                .collect()
        });

        let description = match self.variant {
            Variant::Legacy => "Plan, build, and launch faster".to_string(),
            Variant::Fusion | Variant::Required => format!(
                "{} for {}",
                brief.idea.as_deref().unwrap_or(IDEA_PLACEHOLDER),
                brief.audience
            ),
        };

        let index_html = render_index(&IndexPage {
            identity: &identity,
            description,
            features: self.features(plan),
            pricing: rows.clone(),
            testimonial: (self.variant == Variant::Legacy)
                .then(|| "Helped me launch faster.".to_string()),
        });

        let (mission, story) = self.about_copy(brief);
        let confidence = if kit.is_some() {
            CONFIDENCE
        } else {
            DEGRADED_CONFIDENCE
        };

        debug!(
            title = %identity.title,
            with_pricing = rows.is_some(),
            confidence,
            "site rendered"
        );

        SiteBundle {
            index_html,
            about_html: Some(render_about(&identity, &mission, story)),
            pricing_html: rows.as_deref().map(|rows| render_pricing(&identity, rows)),
            contact_html: Some(render_contact(&identity, CONTACT_EMAIL)),
            styles_css: render_styles(&identity.palette, &identity.font_stack),
            assets: self.assets(&identity.title),
            deploy_instructions: DEPLOY_README.to_string(),
            assumptions: self.assumptions(kit.is_some()),
            confidence: Confidence::new(confidence),
        }
    }
}

impl WebsiteStage for TemplateWebsite {
    #[instrument(skip_all, fields(variant = %self.variant))]
    fn render(
        &self,
        brief: &Brief,
        brand: &StageOutcome<BrandKit>,
        pricing: &StageOutcome<PricingPlan>,
        _launch: Option<&StageOutcome<LaunchPlan>>,
    ) -> StageOutcome<SiteBundle> {
        settle(StageId::Website, Ok(self.build(brief, brand, pricing)))
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;
    use crate::stages::StageSet;
    use crate::stages::test_support::{MILK_IDEA, brief_for};
    use launchkit_shared::StageError;

    fn h1_count(html: &str) -> usize {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("h1").unwrap();
        doc.select(&sel).count()
    }

    fn site(variant: Variant, idea: &str) -> StageOutcome<SiteBundle> {
        let brief = brief_for(variant, idea);
        let fan = StageSet::for_variant(variant, 0.6).fan_out_sequential(&brief);
        TemplateWebsite::new(variant).render(&brief, &fan.brand, &fan.pricing, None)
    }

    #[test]
    fn every_page_uses_brand_identity() {
        for (variant, name) in [
            (Variant::Legacy, "LaunchLy"),
            (Variant::Fusion, "MilkMate"),
            (Variant::Required, "BrightCart"),
        ] {
            let outcome = site(variant, MILK_IDEA);
            let bundle = outcome.ready().expect("ready");
            assert_eq!(h1_count(&bundle.index_html), 1);
            assert!(bundle.index_html.contains(&format!("<h1>{name}</h1>")));
            for page in [&bundle.about_html, &bundle.pricing_html, &bundle.contact_html] {
                assert!(page.as_deref().is_some_and(|html| html.contains(name)));
            }
            assert_eq!(bundle.confidence.value(), 0.8);
        }
    }

    #[test]
    fn feature_cards_follow_variant() {
        let outcome = site(Variant::Fusion, MILK_IDEA);
        let bundle = outcome.ready().expect("ready");
        assert!(bundle.index_html.contains("<h3>daily/alternate-day delivery</h3>"));
        assert!(bundle.index_html.contains("<h3>bulk campus plans</h3>"));

        let outcome = site(Variant::Legacy, MILK_IDEA);
        let bundle = outcome.ready().expect("ready");
        assert!(bundle.index_html.contains("<h3>basic templates</h3>"));
        assert_eq!(bundle.assets.len(), 5);
    }

    #[test]
    fn brand_fallback_degrades_confidence() {
        let outcome = site(Variant::Required, "");
        let bundle = outcome.ready().expect("ready");
        assert!(bundle.index_html.contains("<h1>Startup</h1>"));
        assert!(bundle.index_html.contains("Launch faster"));
        assert_eq!(bundle.confidence.value(), DEGRADED_CONFIDENCE);
    }

    #[test]
    fn pricing_fallback_omits_pricing_page() {
        let variant = Variant::Fusion;
        let brief = brief_for(variant, MILK_IDEA);
        let fan = StageSet::for_variant(variant, 0.6).fan_out_sequential(&brief);
        let pricing: StageOutcome<PricingPlan> =
            StageOutcome::from_result(Err(StageError::render("tier table unavailable")));

        let outcome = TemplateWebsite::new(variant).render(&brief, &fan.brand, &pricing, None);
        let bundle = outcome.ready().expect("ready");
        assert!(bundle.pricing_html.is_none());
        assert!(bundle.about_html.is_some());
        assert!(!bundle.index_html.contains("id='pricing'"));
        assert!(bundle.index_html.contains("<h3>Fast setup</h3>"));
    }
}
