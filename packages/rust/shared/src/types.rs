//! Core domain types: the canonical schema every pipeline variant fills in.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::outcome::{Confidence, Scored, StageId, StageOutcome};

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// Which content strategy the stages use.
///
/// All variants share one schema; they differ in template content and in
/// how a missing idea is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Legacy,
    #[default]
    Fusion,
    Required,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Fusion => "fusion",
            Self::Required => "required",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "fusion" => Ok(Self::Fusion),
            "required" => Ok(Self::Required),
            other => Err(format!(
                "unknown variant '{other}': expected 'legacy', 'fusion', or 'required'"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Brief
// ---------------------------------------------------------------------------

/// The canonical problem statement produced by intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    /// Trimmed idea text. `None` means no usable input was given.
    pub idea: Option<String>,
    /// Inferred audience category; never empty.
    pub audience: String,
    /// Inferred product type; never empty.
    pub product_type: String,
    pub goal: String,
    pub tone: String,
    pub language: String,
    /// Ordered list of assumptions made while normalizing.
    pub assumptions: Vec<String>,
    /// Set when the caller should supply more input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_question: Option<String>,
}

impl Brief {
    pub fn has_idea(&self) -> bool {
        self.idea.is_some()
    }

    /// The idea text, or `placeholder` when there is none.
    pub fn idea_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.idea.as_deref().unwrap_or(placeholder)
    }
}

// ---------------------------------------------------------------------------
// Research
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub note: String,
}

/// Research stage output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAssessment {
    pub snapshot: String,
    pub competitors: Vec<Competitor>,
    pub opportunities: Vec<String>,
    pub assumptions: Vec<String>,
    pub confidence: Confidence,
}

// ---------------------------------------------------------------------------
// Brand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameCandidate {
    pub name: String,
    pub rationale: String,
    pub score: f64,
}

/// Brand colours as CSS hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#4f8cff".into(),
            secondary: "#0b0d12".into(),
            accent: "#F59E0B".into(),
        }
    }
}

/// Naming and branding output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandKit {
    /// Candidates in construction order; never empty.
    pub names: Vec<NameCandidate>,
    pub taglines: Vec<String>,
    /// Always `names[0]` when exposed. Selection is positional, not by score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Palette>,
    pub font_stack: String,
    pub logo_prompts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub personas: Vec<String>,
    pub assumptions: Vec<String>,
    pub confidence: Confidence,
}

impl BrandKit {
    /// The name used on every page: `chosen_name`, else the first candidate.
    pub fn display_name(&self) -> Option<&str> {
        self.chosen_name
            .as_deref()
            .or_else(|| self.names.first().map(|n| n.name.as_str()))
    }

    pub fn primary_tagline(&self) -> Option<&str> {
        self.taglines.first().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// The three fixed tiers, in ascending price order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TierName {
    #[serde(rename = "MVP")]
    Mvp,
    Plus,
    Premium,
}

impl TierName {
    pub const ALL: [TierName; 3] = [TierName::Mvp, TierName::Plus, TierName::Premium];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mvp => "MVP",
            Self::Plus => "Plus",
            Self::Premium => "Premium",
        }
    }
}

impl std::fmt::Display for TierName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    pub name: TierName,
    pub features: Vec<String>,
    /// Monthly price in whole US dollars.
    pub monthly_price_usd: u32,
    pub cost_assumptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl PricingTier {
    /// Display price, e.g. `$19/mo`.
    pub fn price_label(&self) -> String {
        format!("${}/mo", self.monthly_price_usd)
    }
}

/// Packaging and pricing output. Always exactly three tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub tiers: Vec<PricingTier>,
    pub mvp_steps: Vec<String>,
    pub cost_assumptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub assumptions: Vec<String>,
    pub confidence: Confidence,
}

impl PricingPlan {
    /// `MVP: $19/mo, Plus: $49/mo, ...`
    pub fn summary_line(&self) -> String {
        self.tiers
            .iter()
            .map(|t| format!("{}: {}", t.name, t.price_label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// Go-to-market
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// 1-based day index.
    pub day: u8,
    pub action: String,
    pub milestone: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub platform: String,
    pub caption: String,
    pub asset_type: String,
    pub cta: String,
    pub hashtags: String,
    pub image_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub channel: String,
    pub reason: String,
    pub score: f64,
}

/// Go-to-market output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchPlan {
    /// One entry per day, 1 through 30.
    pub calendar: Vec<CalendarEntry>,
    /// Always ten posts.
    pub posts: Vec<SocialPost>,
    pub press_pitch: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub priority_channels: Vec<Channel>,
    pub assumptions: Vec<String>,
    pub confidence: Confidence,
}

// ---------------------------------------------------------------------------
// Website
// ---------------------------------------------------------------------------

/// An asset the site references but does not create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub file: String,
    pub alt: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// The rendered static site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteBundle {
    pub index_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_html: Option<String>,
    pub styles_css: String,
    pub assets: Vec<AssetDescriptor>,
    pub deploy_instructions: String,
    pub assumptions: Vec<String>,
    pub confidence: Confidence,
}

// ---------------------------------------------------------------------------
// Deliverables
// ---------------------------------------------------------------------------

/// A stage whose confidence fell below the review threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewFlag {
    pub stage: StageId,
    pub reason: String,
    pub confidence: Confidence,
    /// Regeneration instruction; only for stages that produced real content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_retry_hint: Option<String>,
    /// Clarifying question for the user; paired with `auto_retry_hint`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_question: Option<String>,
}

/// The final aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    /// File name to text content.
    pub files: BTreeMap<String, String>,
    pub assumptions: BTreeMap<StageId, Vec<String>>,
    pub confidence: BTreeMap<StageId, Confidence>,
    pub needs_review: Vec<ReviewFlag>,
    /// All expected keys are present. Says nothing about stage success.
    pub export_ready: bool,
}

// ---------------------------------------------------------------------------
// PipelineResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: Uuid,
    pub variant: Variant,
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
}

/// Top-level result document. Every field is present even under fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub intake: Brief,
    pub research: StageOutcome<MarketAssessment>,
    pub brand: StageOutcome<BrandKit>,
    pub product: StageOutcome<PricingPlan>,
    pub gtm: StageOutcome<LaunchPlan>,
    pub website: StageOutcome<SiteBundle>,
    pub deliverables: ExportBundle,
    pub metadata: RunMetadata,
}

// ---------------------------------------------------------------------------
// Scored impls
// ---------------------------------------------------------------------------

macro_rules! impl_scored {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Scored for $ty {
                fn confidence(&self) -> Confidence {
                    self.confidence
                }

                fn assumptions(&self) -> &[String] {
                    &self.assumptions
                }
            }
        )+
    };
}

impl_scored!(MarketAssessment, BrandKit, PricingPlan, LaunchPlan, SiteBundle);
