//! Shared types, error model, and configuration for LaunchKit.
//!
//! This crate is the foundation depended on by all other LaunchKit crates.
//! It provides:
//! - [`LaunchKitError`] and [`StageError`]: the error types
//! - [`StageOutcome`]: the ready-or-fallback result every stage returns
//! - Domain types ([`Brief`], [`MarketAssessment`], [`BrandKit`], ...)
//! - Configuration ([`AppConfig`], [`PipelineConfig`], config loading)

pub mod config;
pub mod error;
pub mod outcome;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, PipelineConfig, PipelineSection, ReviewConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_config,
};
pub use error::{LaunchKitError, Result, StageError};
pub use outcome::{
    Confidence, DEFAULT_REVIEW_THRESHOLD, FALLBACK_CONFIDENCE, Fallback, FallbackReason, Scored,
    StageId, StageOutcome,
};
pub use types::{
    AssetDescriptor, BrandKit, Brief, CalendarEntry, Channel, Competitor, ExportBundle,
    LaunchPlan, MarketAssessment, NameCandidate, Palette, PipelineResult, PricingPlan,
    PricingTier, ReviewFlag, RunMetadata, SiteBundle, SocialPost, TierName, Variant,
};
