//! Text renderers for LaunchKit artifacts.
//!
//! Everything here is pure string formatting: HTML pages and the stylesheet
//! for the static site, plus the Markdown, CSV, and plain-text documents that
//! go into an export bundle. Nothing touches the filesystem.

pub mod documents;
pub mod site;

pub use documents::{
    LAYOUT_MANIFEST, OnepagerInput, csv_escape, render_assets_prompts, render_logo_prompts,
    render_next_steps, render_onepager, render_pitch_bullets, render_social_csv,
    unavailable_notice,
};
pub use site::{
    DEPLOY_README, FeatureCard, IndexPage, PriceRow, SiteIdentity, escape_html, render_about,
    render_contact, render_index, render_pricing, render_styles,
};
