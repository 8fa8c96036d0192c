//! Jar records and the aggregate allocation state.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::category::{CategoryValues, DisplayOrder, JarCategory};

/// Percentages of the default allocation, in canonical order.
pub const DEFAULT_PERCENTAGES: [u8; 6] = [55, 10, 10, 5, 5, 15];

/// Placeholder balance used until a real balance is synced.
pub const DEFAULT_TOTAL_BALANCE: u64 = 1_000_000;

/// One budget category with its percentage share and derived amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jar {
    pub category: JarCategory,
    pub label: String,
    pub percent: u8,
    pub amount: u64,
}

impl Jar {
    pub fn new(category: JarCategory, percent: u8) -> Self {
        Self {
            category,
            label: category.label().to_string(),
            percent,
            amount: 0,
        }
    }

    pub fn id(&self) -> u8 {
        self.category.id()
    }
}

impl fmt::Display for Jar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.label, self.percent)
    }
}

/// How per-jar amounts are rounded when derived from percentages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingPolicy {
    /// Each jar is rounded independently; the amounts may drift from the
    /// total by up to `jars - 1` units.
    #[default]
    PerJar,
    /// Remainders are handed out so a 100% allocation reconciles exactly.
    LargestRemainder,
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoundingPolicy::PerJar => "per-jar",
            RoundingPolicy::LargestRemainder => "largest-remainder",
        };
        f.write_str(label)
    }
}

impl FromStr for RoundingPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "per-jar" => Ok(RoundingPolicy::PerJar),
            "largest-remainder" => Ok(RoundingPolicy::LargestRemainder),
            other => Err(format!(
                "unknown rounding policy `{other}` (expected per-jar or largest-remainder)"
            )),
        }
    }
}

/// Ordered jar collection plus the balance the amounts derive from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JarState {
    pub jars: Vec<Jar>,
    pub total_balance: u64,
}

impl JarState {
    pub fn new(order: &DisplayOrder, percentages: CategoryValues<u8>, total_balance: u64) -> Self {
        let jars = order
            .categories()
            .iter()
            .map(|category| Jar::new(*category, percentages.get(*category)))
            .collect();
        Self {
            jars,
            total_balance,
        }
    }

    pub fn jar(&self, category: JarCategory) -> Option<&Jar> {
        self.jars.iter().find(|jar| jar.category == category)
    }

    pub fn total_percent(&self) -> u32 {
        self.jars.iter().map(|jar| u32::from(jar.percent)).sum()
    }

    /// Sum of the jar amounts; may differ from `total_balance` by rounding drift.
    pub fn allocated_amount(&self) -> u64 {
        self.jars.iter().map(|jar| jar.amount).sum()
    }

    pub fn percentages(&self) -> CategoryValues<u8> {
        CategoryValues::from_fn(|category| self.jar(category).map_or(0, |jar| jar.percent))
    }
}

impl Default for JarState {
    fn default() -> Self {
        Self::new(
            &DisplayOrder::default(),
            default_percentages(),
            DEFAULT_TOTAL_BALANCE,
        )
    }
}

/// The hardcoded starting allocation (55/10/10/5/5/15).
pub fn default_percentages() -> CategoryValues<u8> {
    CategoryValues::from_fn(|category| DEFAULT_PERCENTAGES[category.position()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_sums_to_one_hundred() {
        let state = JarState::default();
        assert_eq!(state.jars.len(), 6);
        assert_eq!(state.total_percent(), 100);
        assert_eq!(state.total_balance, DEFAULT_TOTAL_BALANCE);
        assert_eq!(state.jars[0].label, "Necessities");
        assert_eq!(state.jars[0].id(), 1);
    }

    #[test]
    fn state_respects_display_order() {
        let order = DisplayOrder::new([JarCategory::Giving]);
        let state = JarState::new(&order, default_percentages(), 0);
        assert_eq!(state.jars[0].category, JarCategory::Giving);
        assert_eq!(state.jars[0].percent, 5);
        assert_eq!(state.percentages(), default_percentages());
    }

    #[test]
    fn rounding_policy_uses_kebab_case() {
        let json = serde_json::to_string(&RoundingPolicy::LargestRemainder).unwrap();
        assert_eq!(json, "\"largest-remainder\"");
        assert_eq!(
            "Largest_Remainder".parse::<RoundingPolicy>(),
            Ok(RoundingPolicy::LargestRemainder)
        );
        assert!("nearest".parse::<RoundingPolicy>().is_err());
    }
}
