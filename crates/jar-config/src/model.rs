use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use jar_domain::{ChartGeometry, DisplayOrder, JarCategory, RoundingPolicy, DEFAULT_TOTAL_BALANCE};

use crate::ConfigError;

/// Stores user-configurable preferences for the jar tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub rounding: RoundingPolicy,
    /// Balance assumed until a real balance has been synced.
    #[serde(default = "Config::default_total_balance_value")]
    pub default_total_balance: u64,
    /// Preferred jar display order; missing jars follow in canonical order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_order: Vec<JarCategory>,
    #[serde(default)]
    pub chart: ChartSettings,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for exported charts and allocations.
    pub default_export_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "vi-VN".into(),
            currency: "VND".into(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            rounding: RoundingPolicy::default(),
            default_total_balance: Self::default_total_balance_value(),
            display_order: Vec::new(),
            chart: ChartSettings::default(),
            default_export_root: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_total_balance_value() -> u64 {
        DEFAULT_TOTAL_BALANCE
    }

    pub fn display_order(&self) -> DisplayOrder {
        DisplayOrder::new(self.display_order.iter().copied())
    }

    /// Export directory: the configured root, or `exports/` under `base`.
    pub fn resolve_default_export_root(&self, base: &Path) -> PathBuf {
        self.default_export_root
            .clone()
            .unwrap_or_else(|| base.join("exports"))
    }

    /// Rejects settings that would make the chart or formatting meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "currency",
                reason: "must not be empty".into(),
            });
        }
        self.chart.validate()
    }
}

/// Ring chart preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSettings {
    #[serde(default = "ChartSettings::default_size")]
    pub size: f64,
    #[serde(default = "ChartSettings::default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub gap_degree: f64,
    /// Jar colours in display order; an empty list uses the built-in palette.
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default = "ChartSettings::default_background_color")]
    pub background_color: String,
}

impl ChartSettings {
    pub fn default_size() -> f64 {
        120.0
    }

    pub fn default_stroke_width() -> f64 {
        24.0
    }

    pub fn default_background_color() -> String {
        "#eee".into()
    }

    pub fn geometry(&self) -> ChartGeometry {
        ChartGeometry::new(self.size, self.stroke_width, self.gap_degree)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "chart.size",
                reason: format!("expected a positive size, got {}", self.size),
            });
        }
        if !(self.stroke_width.is_finite()
            && self.stroke_width > 0.0
            && self.stroke_width <= self.size / 2.0)
        {
            return Err(ConfigError::Invalid {
                field: "chart.stroke_width",
                reason: format!(
                    "expected a width in (0, {}], got {}",
                    self.size / 2.0,
                    self.stroke_width
                ),
            });
        }
        if !(self.gap_degree.is_finite() && (0.0..60.0).contains(&self.gap_degree)) {
            return Err(ConfigError::Invalid {
                field: "chart.gap_degree",
                reason: format!("expected 0 <= gap < 60, got {}", self.gap_degree),
            });
        }
        Ok(())
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            size: Self::default_size(),
            stroke_width: Self::default_stroke_width(),
            gap_degree: 0.0,
            colors: Vec::new(),
            background_color: Self::default_background_color(),
        }
    }
}
