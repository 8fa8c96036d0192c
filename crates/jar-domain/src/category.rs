//! Budget categories ("jars") and the enum-keyed value map used to move
//! per-category figures around without relying on array positions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Number of jars in the canonical allocation model.
pub const JAR_COUNT: usize = 6;

/// The six budgeting categories. Variant order is the canonical order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JarCategory {
    Necessities,
    Education,
    Savings,
    Entertainment,
    Giving,
    Investment,
}

impl JarCategory {
    pub const ALL: [JarCategory; JAR_COUNT] = [
        JarCategory::Necessities,
        JarCategory::Education,
        JarCategory::Savings,
        JarCategory::Entertainment,
        JarCategory::Giving,
        JarCategory::Investment,
    ];

    /// Stable 1-based identifier.
    pub fn id(self) -> u8 {
        self.position() as u8 + 1
    }

    /// Zero-based slot in the canonical order.
    pub fn position(self) -> usize {
        match self {
            JarCategory::Necessities => 0,
            JarCategory::Education => 1,
            JarCategory::Savings => 2,
            JarCategory::Entertainment => 3,
            JarCategory::Giving => 4,
            JarCategory::Investment => 5,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=6 => Some(Self::ALL[usize::from(id) - 1]),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JarCategory::Necessities => "Necessities",
            JarCategory::Education => "Education",
            JarCategory::Savings => "Savings",
            JarCategory::Entertainment => "Entertainment",
            JarCategory::Giving => "Giving",
            JarCategory::Investment => "Investment",
        }
    }

    /// Wire name used by the transaction endpoints (`suggestedJarType`).
    pub fn wire_name(self) -> &'static str {
        match self {
            JarCategory::Necessities => "NECESSITIES",
            JarCategory::Education => "EDUCATION",
            JarCategory::Savings => "SAVINGS",
            JarCategory::Entertainment => "ENTERTAINMENT",
            JarCategory::Giving => "GIVING",
            JarCategory::Investment => "INVESTMENT",
        }
    }
}

impl fmt::Display for JarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when text cannot be mapped onto a [`JarCategory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError {
    pub input: String,
}

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown jar `{}`", self.input)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for JarCategory {
    type Err = ParseCategoryError;

    /// Accepts a label (any case), the wire name, or the 1-based id.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Ok(id) = trimmed.parse::<u8>() {
            return Self::from_id(id).ok_or_else(|| ParseCategoryError {
                input: trimmed.to_string(),
            });
        }
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseCategoryError {
                input: trimmed.to_string(),
            })
    }
}

/// One value per [`JarCategory`], addressed by category rather than index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CategoryValues<T>([T; JAR_COUNT]);

impl<T: Copy> CategoryValues<T> {
    pub fn from_fn(mut f: impl FnMut(JarCategory) -> T) -> Self {
        Self(JarCategory::ALL.map(&mut f))
    }

    pub fn uniform(value: T) -> Self {
        Self([value; JAR_COUNT])
    }

    pub fn get(&self, category: JarCategory) -> T {
        self.0[category.position()]
    }

    pub fn set(&mut self, category: JarCategory, value: T) {
        self.0[category.position()] = value;
    }

    /// Iterates in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (JarCategory, T)> + '_ {
        JarCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn map<U: Copy>(&self, mut f: impl FnMut(JarCategory, T) -> U) -> CategoryValues<U> {
        CategoryValues::from_fn(|category| f(category, self.get(category)))
    }
}

/// Explicit display ordering over the categories, independent of the
/// order in which remote payloads list their fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOrder(Vec<JarCategory>);

impl DisplayOrder {
    /// Builds an order from `preferred`, dropping duplicates and appending any
    /// category the caller left out in canonical order.
    pub fn new(preferred: impl IntoIterator<Item = JarCategory>) -> Self {
        let mut order: Vec<JarCategory> = Vec::with_capacity(JAR_COUNT);
        for category in preferred {
            if !order.contains(&category) {
                order.push(category);
            }
        }
        for category in JarCategory::ALL {
            if !order.contains(&category) {
                order.push(category);
            }
        }
        Self(order)
    }

    pub fn categories(&self) -> &[JarCategory] {
        &self.0
    }
}

impl Default for DisplayOrder {
    fn default() -> Self {
        Self(JarCategory::ALL.to_vec())
    }
}
