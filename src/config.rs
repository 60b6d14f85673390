//! Policy constants for quote block decoration.
//!
//! The defaults reproduce the stock block behavior. Sites that want a
//! different breakpoint or reveal timing override individual fields; a
//! TOML file with any subset of the fields is accepted under the `cli`
//! feature:
//!
//! ```toml
//! mobile_breakpoint = 600.0
//! reveal_threshold = 0.5
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width below which a block switches to its stacked layout.
pub const DEFAULT_MOBILE_BREAKPOINT: f64 = 480.0;
/// Fraction of the block that must be on screen before it animates in.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.2;
/// Distance the viewport's bottom edge is pulled in for reveal purposes.
pub const DEFAULT_REVEAL_BOTTOM_MARGIN: f64 = 50.0;
/// Elements decorated by [`crate::block::decorate_page`].
pub const DEFAULT_BLOCK_SELECTOR: &str = ".quote";

pub const MOBILE_LAYOUT_CLASS: &str = "mobile-layout";
pub const ANIMATE_IN_CLASS: &str = "animate-in";
pub const AUTHOR_TITLE_CLASS: &str = "author-title";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct QuoteConfig {
    /// Widths strictly below this get the mobile layout class.
    pub mobile_breakpoint: f64,
    /// Intersection ratio in `0.0..=1.0` that counts as visible.
    pub reveal_threshold: f64,
    /// Bottom root margin contraction, in layout units.
    pub reveal_bottom_margin: f64,
    /// CSS selector identifying quote blocks in a page.
    pub block_selector: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            reveal_bottom_margin: DEFAULT_REVEAL_BOTTOM_MARGIN,
            block_selector: DEFAULT_BLOCK_SELECTOR.to_string(),
        }
    }
}

impl QuoteConfig {
    /// Reject values no host could honor.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.mobile_breakpoint.is_finite() || self.mobile_breakpoint < 0.0 {
            return Err(crate::Error::Config(format!(
                "mobile_breakpoint must be a non-negative number, got {}",
                self.mobile_breakpoint
            )));
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(crate::Error::Config(format!(
                "reveal_threshold must be within 0.0..=1.0, got {}",
                self.reveal_threshold
            )));
        }
        if !self.reveal_bottom_margin.is_finite() {
            return Err(crate::Error::Config(
                "reveal_bottom_margin must be finite".to_string(),
            ));
        }
        crate::dom::parse_selector_list(&self.block_selector)?;
        Ok(())
    }

    /// Parse and validate a TOML document.
    #[cfg(feature = "cli")]
    pub fn from_toml(text: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    #[cfg(feature = "cli")]
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuoteConfig::default();
        assert_eq!(config.mobile_breakpoint, 480.0);
        assert_eq!(config.reveal_threshold, 0.2);
        assert_eq!(config.reveal_bottom_margin, 50.0);
        assert_eq!(config.block_selector, ".quote");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = QuoteConfig {
            reveal_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));

        let config = QuoteConfig {
            mobile_breakpoint: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = QuoteConfig {
            block_selector: "..quote".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(crate::Error::Selector { .. })));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = QuoteConfig::from_toml("mobile_breakpoint = 600.0\n").unwrap();
        assert_eq!(config.mobile_breakpoint, 600.0);
        assert_eq!(config.reveal_threshold, DEFAULT_REVEAL_THRESHOLD);
        assert_eq!(config.block_selector, DEFAULT_BLOCK_SELECTOR);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_toml_rejects_unknown_fields() {
        assert!(QuoteConfig::from_toml("breakpoint = 1.0\n").is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_toml_roundtrips_defaults() {
        let text = toml::to_string(&QuoteConfig::default()).unwrap();
        assert_eq!(QuoteConfig::from_toml(&text).unwrap(), QuoteConfig::default());
    }
}
