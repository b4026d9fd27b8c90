//! Keyword classifiers for free-text startup ideas.
//!
//! Each classifier walks a fixed, ordered category table and returns the
//! first category whose keyword pattern matches anywhere in the text
//! (case-insensitive substring match). When nothing matches, the table's
//! default label is returned and [`Classification::is_default`] is true.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{trace, warn};

/// Audience label used when no keyword matches.
pub const DEFAULT_AUDIENCE: &str = "consumers";

/// Product type label used when no keyword matches.
pub const DEFAULT_PRODUCT_TYPE: &str = "web app";

/// Result of running a classifier over some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The resolved category label; never empty.
    pub label: &'static str,
    /// The keyword that selected `label`, if any.
    pub matched: Option<String>,
}

impl Classification {
    /// True when no keyword matched and the default label was used.
    pub fn is_default(&self) -> bool {
        self.matched.is_none()
    }
}

struct Category {
    label: &'static str,
    pattern: Regex,
}

fn table(rows: &[(&'static str, &[&str])]) -> Vec<Category> {
    rows.iter()
        .filter_map(|&(label, keywords)| {
            let alternation = keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            match Regex::new(&format!("(?i){alternation}")) {
                Ok(pattern) => Some(Category { label, pattern }),
                Err(e) => {
                    warn!(label, error = %e, "dropping category with invalid pattern");
                    None
                }
            }
        })
        .collect()
}

static AUDIENCES: LazyLock<Vec<Category>> = LazyLock::new(|| {
    table(&[
        ("families", &["parents", "kids", "families"]),
        ("developers", &["developers", "engineers", "coders"]),
        ("students", &["students", "schools", "education"]),
        ("creators", &["freelancers", "creators", "influencers"]),
        ("SMBs", &["smb", "small business", "local business"]),
        ("business teams", &["enterprise", "b2b", "teams", "companies"]),
        ("busy professionals", &["professionals", "busy"]),
    ])
});

static PRODUCT_TYPES: LazyLock<Vec<Category>> = LazyLock::new(|| {
    table(&[
        ("app", &["app", "mobile", "ios", "android"]),
        ("platform", &["platform", "marketplace"]),
        ("plugin", &["plugin", "extension"]),
        ("tool", &["tool", "assistant", "bot", "ai"]),
        ("service", &["service", "consulting"]),
    ])
});

fn classify(categories: &[Category], default: &'static str, text: &str) -> Classification {
    for category in categories {
        if let Some(m) = category.pattern.find(text) {
            trace!(label = category.label, keyword = m.as_str(), "classified");
            return Classification {
                label: category.label,
                matched: Some(m.as_str().to_lowercase()),
            };
        }
    }

    Classification {
        label: default,
        matched: None,
    }
}

/// Infer the primary audience: families, developers, students, creators,
/// SMBs, business teams, busy professionals, else consumers.
pub fn classify_audience(text: &str) -> Classification {
    classify(&AUDIENCES, DEFAULT_AUDIENCE, text)
}

/// Infer the product type: app, platform, plugin, tool, service, else web app.
pub fn classify_product_type(text: &str) -> Classification {
    classify(&PRODUCT_TYPES, DEFAULT_PRODUCT_TYPE, text)
}

/// Collapse a free-form language name or code to a supported code.
///
/// English and Hindi are recognised; anything else maps to `en`.
pub fn normalize_language(language: &str) -> &'static str {
    match language.trim().to_ascii_lowercase().as_str() {
        "hi" | "hindi" => "hi",
        _ => "en",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audience_first_match_wins() {
        // "kids" (families) appears alongside "students"; families is earlier.
        let c = classify_audience("Homework help for kids and students");
        assert_eq!(c.label, "families");
        assert_eq!(c.matched.as_deref(), Some("kids"));
    }

    #[test]
    fn audience_students() {
        let c = classify_audience("A subscription milk delivery app for college students");
        assert_eq!(c.label, "students");
        assert!(!c.is_default());
    }

    #[test]
    fn audience_is_case_insensitive() {
        assert_eq!(classify_audience("Tools for SMB owners").label, "SMBs");
        assert_eq!(classify_audience("B2B invoicing").label, "business teams");
    }

    #[test]
    fn audience_defaults_to_consumers() {
        let c = classify_audience("A better way to water plants");
        assert_eq!(c.label, DEFAULT_AUDIENCE);
        assert!(c.is_default());

        let c = classify_audience("");
        assert_eq!(c.label, DEFAULT_AUDIENCE);
        assert!(c.is_default());
    }

    #[test]
    fn product_type_order() {
        assert_eq!(classify_product_type("mobile marketplace").label, "app");
        assert_eq!(classify_product_type("a marketplace for tutors").label, "platform");
        assert_eq!(classify_product_type("browser extension").label, "plugin");
        assert_eq!(classify_product_type("consulting service").label, "service");
    }

    #[test]
    fn product_type_uses_substring_matching() {
        // "ai" inside "daily" selects "tool", matching the keyword table's
        // substring semantics.
        assert_eq!(classify_product_type("daily journaling").label, "tool");
        assert_eq!(classify_product_type("fresh bread").label, DEFAULT_PRODUCT_TYPE);
    }

    #[test]
    fn language_normalization() {
        assert_eq!(normalize_language("EN"), "en");
        assert_eq!(normalize_language("English"), "en");
        assert_eq!(normalize_language("Hindi"), "hi");
        assert_eq!(normalize_language("hi"), "hi");
        assert_eq!(normalize_language("fr"), "en");
    }
}
