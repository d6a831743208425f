use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry thresholds for the coverage signal.
///
/// The defaults (25% of either viewport axis, or a 70%-wide banner at least
/// 200px tall) are starting points, not load-bearing invariants; they are
/// plain configuration so deployments can recalibrate them empirically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageThresholds {
    /// Width fraction of the viewport at which an element counts as covering.
    pub min_width_frac: f64,
    /// Height fraction of the viewport at which an element counts as covering.
    pub min_height_frac: f64,
    /// Width fraction for the "wide banner" shape.
    pub banner_width_frac: f64,
    /// Minimum banner height in device-independent pixels.
    pub banner_min_height_px: f64,
}

impl Default for CoverageThresholds {
    fn default() -> Self {
        Self {
            min_width_frac: 0.25,
            min_height_frac: 0.25,
            banner_width_frac: 0.7,
            banner_min_height_px: 200.0,
        }
    }
}

/// Configuration for the whole filter: pattern sources and thresholds.
///
/// All fields have built-in defaults, so a partial TOML override like
/// `min_z_index = 50` is valid on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubConfig {
    /// Matched against an element's class list + id (case-insensitive).
    pub attribute_patterns: Vec<String>,
    /// Matched against an element's aria-label + visible text.
    pub text_patterns: Vec<String>,
    /// Matched against individual class names on the root scroll elements.
    pub scroll_lock_patterns: Vec<String>,
    /// Substrings of class/id that make an element a sweep candidate.
    pub candidate_markers: Vec<String>,
    /// Geometry thresholds for the coverage signal.
    pub coverage: CoverageThresholds,
    /// z-index at or above which an element counts as prominent.
    pub min_z_index: i32,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            attribute_patterns: vec_of(&[
                "modal",
                "overlay",
                "paywall",
                "subscribe",
                "subscription",
                "signup",
                r"sign[-_\s]?up",
                "dialog",
                "popup",
                "backdrop",
                "blocker",
            ]),
            text_patterns: vec_of(&[
                "subscribe",
                r"sign\s*up",
                "paywall",
                "membership",
                "premium",
                "start trial",
                "log in to continue",
            ]),
            scroll_lock_patterns: vec_of(&[
                r"no[-_]?scroll",
                r"overflow[-_]?hidden",
                r"lock[-_]?scroll",
                r"modal[-_]?open",
                r"disable[-_]?scroll",
                r"page[-_]?locked",
            ]),
            candidate_markers: vec_of(&[
                "modal",
                "overlay",
                "paywall",
                "subscribe",
                "subscription",
                "popup",
                "dialog",
                "backdrop",
            ]),
            coverage: CoverageThresholds::default(),
            min_z_index: 100,
        }
    }
}

impl ScrubConfig {
    /// Parse a configuration from a TOML string. Missing fields fall back to
    /// the built-in defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("invalid nagless configuration")
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&source)
    }
}

fn vec_of(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
