//! Static site templates: four pages and one stylesheet.
//!
//! Every page is rendered from the same [`SiteIdentity`] so the brand name,
//! tagline, and palette stay consistent across the site.

use launchkit_shared::Palette;

/// Step-by-step hosting instructions shipped next to the site.
pub const DEPLOY_README: &str = "GitHub Pages:\n\
1. Create a new GitHub repo, upload index.html, styles.css and other files to root.\n\
2. In repo Settings → Pages → Select main branch → Save → Visit https://<username>.github.io/<repo>.\n\
\n\
Netlify:\n\
1. Create a new site on Netlify.\n\
2. Drag-and-drop the 'site' folder into Netlify; publish.";

/// The brand facts shared by every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdentity {
    pub title: String,
    pub tagline: String,
    pub palette: Palette,
    pub font_stack: String,
}

/// One card in the index page's feature grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCard {
    pub heading: String,
    pub blurb: String,
    pub image: String,
}

/// A tier name with its display price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRow {
    pub name: String,
    pub price: String,
}

/// Content for the landing page.
#[derive(Debug, Clone)]
pub struct IndexPage<'a> {
    pub identity: &'a SiteIdentity,
    /// `<meta name="description">` text.
    pub description: String,
    pub features: Vec<FeatureCard>,
    /// Omitted from the page when `None`.
    pub pricing: Option<Vec<PriceRow>>,
    /// Optional testimonial line for a social-proof section.
    pub testimonial: Option<String>,
}

/// Escape text for safe inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page_head(title: &str, description: &str) -> String {
    format!(
        "<meta charset='utf-8'><meta name='viewport' content='width=device-width, initial-scale=1'>\
         <title>{}</title><meta name='description' content='{}'>\
         <link rel='stylesheet' href='styles.css'>",
        escape_html(title),
        escape_html(description),
    )
}

fn price_list(rows: &[PriceRow]) -> String {
    rows.iter()
        .map(|r| format!("<li>{} – {}</li>", escape_html(&r.name), escape_html(&r.price)))
        .collect()
}

/// Render `index.html`. Contains exactly one `<h1>` (the brand name).
pub fn render_index(page: &IndexPage<'_>) -> String {
    let identity = page.identity;
    let title = escape_html(&identity.title);
    let tagline = escape_html(&identity.tagline);

    // serde_json escapes the name for the JSON-LD block.
    let json_ld = serde_json::json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": identity.title,
    })
    .to_string()
    .replace("</", "<\\/");

    let head = format!(
        "{}<script type='application/ld+json'>{json_ld}</script>",
        page_head(
            &format!("{} – {}", identity.title, identity.tagline),
            &page.description
        ),
    );

    let cards: String = page
        .features
        .iter()
        .map(|card| {
            format!(
                "<article><img src='{}' alt='Feature icon'><h3>{}</h3><p>{}</p></article>",
                escape_html(&card.image),
                escape_html(&card.heading),
                escape_html(&card.blurb),
            )
        })
        .collect();

    let pricing = page
        .pricing
        .as_deref()
        .map(|rows| {
            format!(
                "<section id='pricing' class='pricing' aria-label='Pricing'><h2>Pricing</h2><ul>{}</ul></section>",
                price_list(rows)
            )
        })
        .unwrap_or_default();

    let cta_href = if page.pricing.is_some() {
        "#pricing"
    } else {
        "#join"
    };

    let social_proof = page
        .testimonial
        .as_deref()
        .map(|quote| {
            format!(
                "<section class='social-proof' aria-label='Social Proof'><h2>What early users say</h2>\
                 <ul><li><blockquote>{}</blockquote><cite>Early Adopter</cite></li></ul></section>",
                escape_html(quote)
            )
        })
        .unwrap_or_default();

    format!(
        "<!doctype html><html lang='en'><head>{head}</head><body>\
         <header class='hero'><h1>{title}</h1><p class='tagline'>{tagline}</p>\
         <a class='cta' href='{cta_href}'>Get Early Access</a></header>\
         <main><section class='features' aria-label='Features'><h2>Features</h2><div class='grid'>{cards}</div></section>\
         {pricing}{social_proof}\
         <section id='join' class='cta-section' aria-label='Join'><form class='email-capture' action='#' method='post'>\
         <input type='email' placeholder='Enter your email' aria-label='Email'>\
         <button type='submit' class='cta'>Join the waitlist</button></form></section></main>\
         <footer><small>&copy; {title}</small></footer></body></html>"
    )
}

/// Render `about.html`.
pub fn render_about(identity: &SiteIdentity, mission: &str, story: &str) -> String {
    format!(
        "<!doctype html><html lang='en'><head>{}</head><body><main><h1>About</h1>\
         <p class='brand'>{} – {}</p>\
         <section><h2>Mission</h2><p>{}</p></section>\
         <section><h2>Story</h2><p>{}</p></section></main></body></html>",
        page_head(
            &format!("About – {}", identity.title),
            &format!("About {}", identity.title)
        ),
        escape_html(&identity.title),
        escape_html(&identity.tagline),
        escape_html(mission),
        escape_html(story),
    )
}

/// Render `pricing.html`.
pub fn render_pricing(identity: &SiteIdentity, rows: &[PriceRow]) -> String {
    format!(
        "<!doctype html><html lang='en'><head>{}</head><body><main><h1>Pricing</h1>\
         <p class='brand'>{} – {}</p><ul>{}</ul></main></body></html>",
        page_head(&format!("Pricing – {}", identity.title), "Pricing"),
        escape_html(&identity.title),
        escape_html(&identity.tagline),
        price_list(rows),
    )
}

/// Render `contact.html`.
pub fn render_contact(identity: &SiteIdentity, email: &str) -> String {
    let email = escape_html(email);
    format!(
        "<!doctype html><html lang='en'><head>{}</head><body><main><h1>Contact</h1>\
         <p class='brand'>{} – {}</p><p>Email us at {email}</p>\
         <form action='mailto:{email}' method='post'><input type='text' placeholder='Your name'>\
         <input type='email' placeholder='Your email'><textarea placeholder='Message'></textarea>\
         <button type='submit'>Send</button></form></main></body></html>",
        page_head(&format!("Contact – {}", identity.title), "Contact"),
        escape_html(&identity.title),
        escape_html(&identity.tagline),
    )
}

/// Render `styles.css` from the palette and font stack.
pub fn render_styles(palette: &Palette, font_stack: &str) -> String {
    let primary = &palette.primary;
    let secondary = &palette.secondary;
    let accent = &palette.accent;
    format!(
        ":root {{ --bg:{secondary}; --fg:#e8eaed; --muted:#9aa0a6; --brand:{primary}; --accent:{accent}; }}
* {{ box-sizing: border-box; }}
body {{ margin:0; font-family: {font_stack}; color: var(--fg); background: var(--bg); }}
.hero {{ padding: 4rem 1rem; text-align:center; background: linear-gradient(135deg, {secondary} 0%, #14213d 100%); }}
.hero h1 {{ margin:0 0 .5rem; font-size: clamp(2rem, 5vw, 3rem); }}
.tagline {{ color: var(--muted); margin-bottom:1rem; }}
.cta {{ display:inline-block; padding:.75rem 1rem; background: var(--brand); color:#fff; text-decoration:none; border-radius:.5rem; }}
main {{ max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }}
.features .grid {{ display: grid; gap: 1rem; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); }}
.features article {{ padding:1rem; border: 1px solid #1f2937; border-radius:.75rem; background:#111827; }}
.features img {{ width:48px; height:48px; display:block; margin-bottom:.5rem; opacity:.8; }}
.features h3 {{ margin:.25rem 0 .5rem; font-size:1.1rem; }}
.pricing, .social-proof, .cta-section {{ margin-top:2rem; }}
.social-proof cite {{ color: var(--accent); }}
.email-capture {{ display:flex; gap:.5rem; justify-content:center; }}
.email-capture input {{ padding:.5rem; border-radius:.5rem; border:1px solid #1f2937; background:#0f172a; color:var(--fg); width:min(100%,280px); }}
.email-capture button {{ padding:.5rem 1rem; }}
footer {{ text-align:center; padding:2rem 1rem; color: var(--muted); }}
@media (prefers-color-scheme: light) {{ :root {{ --bg:#ffffff; --fg:#111827; --muted:#6b7280; --brand:{primary}; }} .features article {{ background:#f9fafb; border-color:#e5e7eb; }} }}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn identity() -> SiteIdentity {
        SiteIdentity {
            title: "MilkMate".into(),
            tagline: "Fresh to your door".into(),
            palette: Palette::default(),
            font_stack: "system-ui".into(),
        }
    }

    fn rows() -> Vec<PriceRow> {
        vec![
            PriceRow {
                name: "MVP".into(),
                price: "$19/mo".into(),
            },
            PriceRow {
                name: "Plus".into(),
                price: "$49/mo".into(),
            },
        ]
    }

    fn count(html: &str, selector: &str) -> usize {
        let doc = Html::parse_document(html);
        let sel = Selector::parse(selector).unwrap();
        doc.select(&sel).count()
    }

    #[test]
    fn index_has_single_h1_with_brand() {
        let id = identity();
        let html = render_index(&IndexPage {
            identity: &id,
            description: "Milk for students".into(),
            features: vec![FeatureCard {
                heading: "weekly delivery".into(),
                blurb: "Simple and effective.".into(),
                image: "assets/feature-1.png".into(),
            }],
            pricing: Some(rows()),
            testimonial: Some("Helped me launch faster.".into()),
        });

        assert_eq!(count(&html, "h1"), 1);
        assert_eq!(count(&html, "section#pricing li"), 2);
        assert_eq!(count(&html, "section.social-proof"), 1);
        assert!(html.contains("<h1>MilkMate</h1>"));
        assert!(html.contains("\"name\":\"MilkMate\""));
    }

    #[test]
    fn index_without_pricing_omits_section() {
        let id = identity();
        let html = render_index(&IndexPage {
            identity: &id,
            description: String::new(),
            features: vec![],
            pricing: None,
            testimonial: None,
        });
        assert_eq!(count(&html, "section#pricing"), 0);
        assert!(html.contains("href='#join'"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut id = identity();
        id.title = "<script>alert(1)</script>".into();
        let html = render_about(&id, "mission", "story");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn every_page_names_the_brand() {
        let id = identity();
        for html in [
            render_about(&id, "m", "s"),
            render_pricing(&id, &rows()),
            render_contact(&id, "hello@example.com"),
        ] {
            assert!(html.contains("MilkMate – Fresh to your door"));
            assert_eq!(count(&html, "h1"), 1);
        }
    }

    #[test]
    fn styles_use_palette() {
        let palette = Palette {
            primary: "#2563EB".into(),
            secondary: "#111827".into(),
            accent: "#F59E0B".into(),
        };
        let css = render_styles(&palette, "Inter, sans-serif");
        assert!(css.contains("--brand:#2563EB"));
        assert!(css.contains("--bg:#111827"));
        assert!(css.contains("font-family: Inter, sans-serif"));
    }
}
