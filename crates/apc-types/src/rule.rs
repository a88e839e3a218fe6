//! Diagnosis code classification rules.
//!
//! A [`RuleSet`] is an ordered list of [`CategoryRule`]s. Classification walks
//! the list in declaration order and the first matching rule decides the
//! category, so overlapping rules never conflict.
//!
//! # Examples
//!
//! ```
//! use apc_types::{CategoryRule, Classification, RuleSet};
//!
//! let rules = RuleSet::new(vec![
//!     CategoryRule::range("C33", "C34", "Lung Cancer").unwrap(),
//!     CategoryRule::prefix("C50", "Breast Cancer").unwrap(),
//! ])
//! .unwrap();
//!
//! assert_eq!(rules.classify("C341"), Classification::Category("Lung Cancer"));
//! assert_eq!(rules.classify("C50"), Classification::Category("Breast Cancer"));
//! assert!(rules.classify("J45").is_unclassified());
//! ```

use std::fmt;
use std::str::FromStr;

/// Error type for rule construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A rule set must contain at least one rule.
    EmptyRuleSet,
    /// Prefix matchers need a non-empty literal.
    EmptyPrefix,
    /// Category labels must not be empty.
    EmptyLabel,
    /// Range bounds must have equal width and be ordered `low <= high`.
    InvalidRange {
        /// Lower bound as given.
        low: String,
        /// Upper bound as given.
        high: String,
    },
    /// Range bounds may only contain ASCII letters and digits.
    InvalidRangeBound(String),
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRuleSet => write!(f, "rule set must contain at least one rule"),
            Self::EmptyPrefix => write!(f, "prefix matcher must not be empty"),
            Self::EmptyLabel => write!(f, "category label must not be empty"),
            Self::InvalidRange { low, high } => write!(
                f,
                "invalid code range '{}-{}' (bounds must share a width and be ordered)",
                low, high
            ),
            Self::InvalidRangeBound(s) => {
                write!(f, "invalid range bound '{}' (expected ASCII alphanumerics)", s)
            }
        }
    }
}

impl std::error::Error for RuleError {}

/// Test applied to a raw code.
///
/// Range matching compares the code's leading `width` characters to the
/// bounds as plain strings. It is only numerically meaningful when the coding
/// system uses fixed-width prefixes, as ICD-10 three-character categories
/// (`C18`..`C21`) do. Constructors enforce equal-width bounds.
///
/// The textual notation is `C50` for a prefix and `C18-C21` for a range.
///
/// # Examples
///
/// ```
/// use apc_types::CodeMatcher;
///
/// let colorectal: CodeMatcher = "C18-C21".parse().unwrap();
/// assert!(colorectal.matches("C20"));
/// assert!(colorectal.matches("C189"));
/// assert!(!colorectal.matches("C22"));
///
/// let breast: CodeMatcher = "C50".parse().unwrap();
/// assert!(breast.matches("C509"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum CodeMatcher {
    /// Matches codes starting with the literal.
    Prefix(String),
    /// Matches codes whose leading `low.len()` characters fall in `[low, high]`.
    Range {
        /// Inclusive lower bound.
        low: String,
        /// Inclusive upper bound.
        high: String,
    },
}

impl CodeMatcher {
    /// Creates a prefix matcher.
    pub fn prefix(prefix: impl Into<String>) -> Result<Self, RuleError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(RuleError::EmptyPrefix);
        }
        Ok(Self::Prefix(prefix))
    }

    /// Creates an inclusive range matcher.
    ///
    /// Both bounds must be non-empty ASCII alphanumerics of the same width
    /// with `low <= high`.
    pub fn range(low: impl Into<String>, high: impl Into<String>) -> Result<Self, RuleError> {
        let low = low.into();
        let high = high.into();

        for bound in [&low, &high] {
            if bound.is_empty() || !bound.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(RuleError::InvalidRangeBound(bound.clone()));
            }
        }
        if low.len() != high.len() || low > high {
            return Err(RuleError::InvalidRange { low, high });
        }

        Ok(Self::Range { low, high })
    }

    /// Number of leading code characters this matcher inspects.
    pub fn width(&self) -> usize {
        match self {
            Self::Prefix(prefix) => prefix.len(),
            Self::Range { low, .. } => low.len(),
        }
    }

    /// Returns true if the code satisfies this matcher.
    pub fn matches(&self, code: &str) -> bool {
        match self {
            Self::Prefix(prefix) => code.starts_with(prefix.as_str()),
            Self::Range { low, high } => match code.get(..low.len()) {
                Some(head) => low.as_str() <= head && head <= high.as_str(),
                None => false,
            },
        }
    }
}

impl fmt::Display for CodeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(prefix) => write!(f, "{}", prefix),
            Self::Range { low, high } => write!(f, "{}-{}", low, high),
        }
    }
}

impl FromStr for CodeMatcher {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('-') {
            Some((low, high)) => Self::range(low.trim(), high.trim()),
            None => Self::prefix(s),
        }
    }
}

impl TryFrom<String> for CodeMatcher {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CodeMatcher> for String {
    fn from(matcher: CodeMatcher) -> Self {
        matcher.to_string()
    }
}

/// A matcher paired with the category label it assigns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryRule {
    /// The code test.
    pub matcher: CodeMatcher,
    /// Category assigned on match.
    pub label: String,
}

impl CategoryRule {
    /// Creates a rule from an existing matcher.
    pub fn new(matcher: CodeMatcher, label: impl Into<String>) -> Result<Self, RuleError> {
        let label = label.into();
        if label.is_empty() {
            return Err(RuleError::EmptyLabel);
        }
        Ok(Self { matcher, label })
    }

    /// Creates a prefix rule.
    pub fn prefix(prefix: impl Into<String>, label: impl Into<String>) -> Result<Self, RuleError> {
        Self::new(CodeMatcher::prefix(prefix)?, label)
    }

    /// Creates an inclusive range rule.
    pub fn range(
        low: impl Into<String>,
        high: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self, RuleError> {
        Self::new(CodeMatcher::range(low, high)?, label)
    }

    /// Returns true if this rule applies to the code.
    pub fn matches(&self, code: &str) -> bool {
        self.matcher.matches(code)
    }
}

/// Outcome of classifying a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification<'a> {
    /// The label of the first matching rule.
    Category(&'a str),
    /// No rule matched. Callers drop such records.
    Unclassified,
}

impl<'a> Classification<'a> {
    /// Returns the category label, if any.
    pub fn label(self) -> Option<&'a str> {
        match self {
            Self::Category(label) => Some(label),
            Self::Unclassified => None,
        }
    }

    /// Returns true if no rule matched.
    pub fn is_unclassified(self) -> bool {
        matches!(self, Self::Unclassified)
    }
}

/// Classifies a code against rules in declaration order.
///
/// The first matching rule wins. Codes matching nothing, including the empty
/// code, are [`Classification::Unclassified`].
pub fn classify<'a>(code: &str, rules: &'a [CategoryRule]) -> Classification<'a> {
    rules
        .iter()
        .find(|rule| rule.matches(code))
        .map_or(Classification::Unclassified, |rule| {
            Classification::Category(rule.label.as_str())
        })
}

/// A non-empty, ordered list of category rules.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<CategoryRule>", into = "Vec<CategoryRule>")
)]
pub struct RuleSet {
    pub(crate) rules: Vec<CategoryRule>,
}

impl RuleSet {
    /// Creates a rule set, keeping the given priority order.
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, RuleError> {
        if rules.is_empty() {
            return Err(RuleError::EmptyRuleSet);
        }
        Ok(Self { rules })
    }

    /// Classifies a code. See [`classify`].
    pub fn classify(&self, code: &str) -> Classification<'_> {
        classify(code, &self.rules)
    }

    /// Returns the rules in priority order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Distinct labels in the order they first appear.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !labels.contains(&rule.label.as_str()) {
                labels.push(rule.label.as_str());
            }
        }
        labels
    }
}

impl TryFrom<Vec<CategoryRule>> for RuleSet {
    type Error = RuleError;

    fn try_from(rules: Vec<CategoryRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<RuleSet> for Vec<CategoryRule> {
    fn from(set: RuleSet) -> Self {
        set.rules
    }
}
