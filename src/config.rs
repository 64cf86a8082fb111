//! Engine tuning parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{BEZIER_STEPS, HANDLE_RATIO, HIT_SLOP_PX, MIN_SEGMENT_PX};

pub const DEFAULT_NAME_PREFIX: &str = "Mask";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Image-space jitter threshold for draft points.
    pub min_segment_px: f64,
    /// Handle distance, as a fraction of the vector to each neighbour, for new smooth points.
    pub handle_ratio: f64,
    /// Samples per curved segment when flattening outlines.
    pub bezier_steps: usize,
    /// Screen-space hit slop in client pixels.
    pub hit_slop_px: f64,
    /// Default mask names are `"{name_prefix} {order}"`.
    pub name_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_segment_px: MIN_SEGMENT_PX,
            handle_ratio: HANDLE_RATIO,
            bezier_steps: BEZIER_STEPS,
            hit_slop_px: HIT_SLOP_PX,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `MASKBOARD_MIN_SEGMENT_PX`: default 1.5
    /// - `MASKBOARD_HANDLE_RATIO`: default 0.2
    /// - `MASKBOARD_BEZIER_STEPS`: default 10
    /// - `MASKBOARD_HIT_SLOP_PX`: default 8.0
    /// - `MASKBOARD_NAME_PREFIX`: default `Mask`
    ///
    /// Unparseable or non-positive numbers use the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(v) => Some(v),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup. Used by [`Self::from_env`] and tests.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let name_prefix = lookup("MASKBOARD_NAME_PREFIX")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME_PREFIX.to_string());

        let config = Self {
            min_segment_px: positive_f64(&lookup, "MASKBOARD_MIN_SEGMENT_PX", MIN_SEGMENT_PX),
            handle_ratio: positive_f64(&lookup, "MASKBOARD_HANDLE_RATIO", HANDLE_RATIO),
            bezier_steps: positive(&lookup, "MASKBOARD_BEZIER_STEPS", BEZIER_STEPS),
            hit_slop_px: positive_f64(&lookup, "MASKBOARD_HIT_SLOP_PX", HIT_SLOP_PX),
            name_prefix,
        };
        tracing::debug!(?config, "engine config loaded");
        config
    }
}

fn positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match lookup(key).map(|v| v.trim().parse::<T>()) {
        Some(Ok(v)) if v > T::default() => v,
        Some(_) => {
            tracing::warn!(key, "invalid engine config value; using default");
            default
        }
        None => default,
    }
}

/// Like [`positive`], but also rejects `inf` and `NaN`.
fn positive_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    let value = positive(lookup, key, default);
    if value.is_finite() {
        value
    } else {
        tracing::warn!(key, "non-finite engine config value; using default");
        default
    }
}
