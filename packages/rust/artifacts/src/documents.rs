//! Markdown, CSV, and plain-text documents for the export bundle.

use launchkit_shared::{AssetDescriptor, SocialPost};

/// Directory layout of a full export's `site/` folder, one entry per line.
pub const LAYOUT_MANIFEST: &str = "site/index.html
site/about.html
site/pricing.html
site/contact.html
site/styles.css
site/assets/
site/README_deploy.txt";

const CSV_HEADER: &str = "platform,caption,asset_type,cta,hashtags,image_prompt";

const PITCH_BULLETS: [&str; 6] = [
    "Focuses on a clear niche audience",
    "Delivers instant value via automation",
    "Low-friction onboarding with templates",
    "Subscription model with scalable margins",
    "Early adopter momentum and content-led growth",
    "Partner-ready with integrations",
];

const NEXT_STEPS: [&str; 7] = [
    "Day 1: finalize positioning and hero messaging",
    "Day 2: build landing and waitlist",
    "Day 3: seed 20 prospects",
    "Day 4: ship MVP core flow",
    "Day 5: collect feedback and iterate",
    "Day 6: publish case study",
    "Day 7: start referral program",
];

/// Inputs for the one-page summary.
#[derive(Debug, Clone)]
pub struct OnepagerInput<'a> {
    pub title: &'a str,
    pub tagline: &'a str,
    pub idea: &'a str,
    pub audience: &'a str,
    pub market_snapshot: &'a str,
    pub tiers: Vec<String>,
    /// Stage ids flagged for review; prepended as a warning when non-empty.
    pub flagged: Vec<String>,
}

/// Render `onepager.md`.
pub fn render_onepager(input: &OnepagerInput<'_>) -> String {
    let mut out = String::new();
    if !input.flagged.is_empty() {
        out.push_str(&format!(
            "**Confidence warning: {}**\n\n",
            input.flagged.join(", ")
        ));
    }

    out.push_str(&format!(
        "# {}\n\n{}\n\n**Idea**\n\n{}\n\n**Audience**\n\n{}\n\n**Market**\n\n{}\n\n\
         **Business Model**\n\nSubscription tiers: {}.\n\n**Team Ask**\n\n\
         Looking for builders and early partners.\n",
        input.title,
        input.tagline,
        input.idea,
        input.audience,
        input.market_snapshot,
        input.tiers.join(", "),
    ));
    out
}

/// Render `pitch_bullets.md`.
pub fn render_pitch_bullets() -> String {
    bullet_list("Pitch", &PITCH_BULLETS)
}

/// Render `next_steps.md`.
pub fn render_next_steps() -> String {
    bullet_list("Next Steps", &NEXT_STEPS)
}

fn bullet_list(heading: &str, items: &[&str]) -> String {
    let mut out = format!("# {heading}\n\n");
    for item in items {
        out.push_str("- ");
        out.push_str(item);
        out.push('\n');
    }
    out
}

/// Render `logo_prompts.txt`, one prompt per line.
pub fn render_logo_prompts(prompts: &[String]) -> String {
    prompts.join("\n")
}

/// Render `assets_prompts.txt` (also used for `assets/PLACEHOLDERS.txt`).
pub fn render_assets_prompts(assets: &[AssetDescriptor]) -> String {
    assets
        .iter()
        .map(|a| {
            let mut line = format!("{} | alt={} | prompt={}", a.file, a.alt, a.prompt);
            if let Some(size) = &a.size {
                line.push_str(&format!(" | size={size}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quote a CSV cell when it contains a comma, quote, or line break.
pub fn csv_escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Render `social_posts.csv` with a header row.
pub fn render_social_csv(posts: &[SocialPost]) -> String {
    let mut rows = Vec::with_capacity(posts.len() + 1);
    rows.push(CSV_HEADER.to_string());
    for p in posts {
        rows.push(
            [
                &p.platform,
                &p.caption,
                &p.asset_type,
                &p.cta,
                &p.hashtags,
                &p.image_prompt,
            ]
            .iter()
            .map(|cell| csv_escape(cell))
            .collect::<Vec<_>>()
            .join(","),
        );
    }
    rows.join("\n")
}

/// Placeholder body for a file whose source stage produced no output.
pub fn unavailable_notice(file: &str, reason: &str) -> String {
    if file.ends_with(".html") {
        format!(
            "<!doctype html><html lang='en'><head><meta charset='utf-8'><title>Unavailable</title></head>\
             <body><main><p>{} unavailable: {}</p></main></body></html>",
            crate::site::escape_html(file),
            crate::site::escape_html(reason),
        )
    } else if file.ends_with(".css") {
        format!("/* {file} unavailable: {reason} */\n")
    } else {
        format!("{file} unavailable: {reason}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(caption: &str) -> SocialPost {
        SocialPost {
            platform: "Twitter".into(),
            caption: caption.into(),
            asset_type: "image".into(),
            cta: "Join early access".into(),
            hashtags: "#startup #mvp".into(),
            image_prompt: "Clean minimal graphic".into(),
        }
    }

    #[test]
    fn csv_escape_quotes_when_needed() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a, b"), "\"a, b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn social_csv_has_header_and_rows() {
        let csv = render_social_csv(&[post("Day 1: hello"), post("Day 2: milk, fresh")]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[2].contains("\"Day 2: milk, fresh\""));
    }

    #[test]
    fn onepager_warns_about_flagged_stages() {
        let mut input = OnepagerInput {
            title: "MilkMate",
            tagline: "Fresh to your door",
            idea: "Milk delivery",
            audience: "students",
            market_snapshot: "Demand is high.",
            tiers: vec!["MVP".into(), "Plus".into(), "Premium".into()],
            flagged: vec![],
        };
        let clean = render_onepager(&input);
        assert!(clean.starts_with("# MilkMate"));
        assert!(clean.contains("Subscription tiers: MVP, Plus, Premium."));

        input.flagged = vec!["research".into(), "gtm".into()];
        let warned = render_onepager(&input);
        assert!(warned.starts_with("**Confidence warning: research, gtm**"));
    }

    #[test]
    fn assets_prompts_include_optional_size() {
        let text = render_assets_prompts(&[
            AssetDescriptor {
                file: "assets/hero.jpg".into(),
                alt: "Hero".into(),
                prompt: "Gradient".into(),
                size: Some("1200x800".into()),
            },
            AssetDescriptor {
                file: "assets/feature-1.png".into(),
                alt: "Feature icon".into(),
                prompt: "Line icon".into(),
                size: None,
            },
        ]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "assets/hero.jpg | alt=Hero | prompt=Gradient | size=1200x800");
        assert_eq!(lines[1], "assets/feature-1.png | alt=Feature icon | prompt=Line icon");
    }

    #[test]
    fn unavailable_notice_matches_file_kind() {
        assert!(unavailable_notice("pricing.html", "pricing fell back").starts_with("<!doctype html>"));
        assert!(unavailable_notice("styles.css", "x").starts_with("/*"));
        assert_eq!(
            unavailable_notice("social_posts.csv", "upstream gtm produced no output"),
            "social_posts.csv unavailable: upstream gtm produced no output\n"
        );
    }

    #[test]
    fn static_lists() {
        assert_eq!(render_next_steps().lines().filter(|l| l.starts_with("- ")).count(), 7);
        assert_eq!(render_pitch_bullets().lines().filter(|l| l.starts_with("- ")).count(), 6);
        assert_eq!(LAYOUT_MANIFEST.lines().count(), 7);
    }
}
