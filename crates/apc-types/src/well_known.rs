//! Well-known measures, cancer categories and colours.
//!
//! The column names match the NHS England Hospital Admitted Patient Care
//! Activity diagnosis tables. The cancer categories group ICD-10 codes.
//!
//! # Examples
//!
//! ```
//! use apc_types::well_known;
//!
//! let rules = well_known::cancer_rules();
//! assert_eq!(rules.classify("C189").label(), Some(well_known::COLORECTAL_CANCER));
//! assert_eq!(well_known::pastel_palette().len(), 9);
//! ```

use crate::{CategoryRule, CodeMatcher, Color, RuleSet};

// =============================================================================
// Measure Columns
// =============================================================================

/// Finished admission episodes for male patients.
pub const MALE: &str = "Male";

/// Finished admission episodes for female patients.
pub const FEMALE: &str = "Female";

/// Emergency admissions.
pub const EMERGENCY: &str = "Emergency";

/// Elective admissions from the waiting list.
pub const WAITING_LIST: &str = "Waiting List";

/// Planned (booked) elective admissions.
pub const PLANNED: &str = "Planned";

/// Admissions by any other method.
pub const OTHER: &str = "Other";

/// Gender measures in chart order.
pub const GENDER_MEASURES: &[&str] = &[MALE, FEMALE];

/// Admission method measures in chart order.
pub const ADMISSION_MEASURES: &[&str] = &[EMERGENCY, WAITING_LIST, PLANNED, OTHER];

// =============================================================================
// Key Columns
// =============================================================================

/// Diagnosis code column of the diagnosis table.
pub const CODE_COLUMN: &str = "Code";

/// Reporting year column of the diagnosis table.
pub const YEAR_COLUMN: &str = "Year";

/// Category column of an aggregated export.
pub const CATEGORY_COLUMN: &str = "category";

// =============================================================================
// Cancer Categories
// =============================================================================

/// ICD-10 C33-C34.
pub const LUNG_CANCER: &str = "Lung Cancer";
/// ICD-10 C18-C21.
pub const COLORECTAL_CANCER: &str = "Colorectal Cancer";
/// ICD-10 C50.
pub const BREAST_CANCER: &str = "Breast Cancer";
/// ICD-10 C61.
pub const PROSTATE_CANCER: &str = "Prostate Cancer";
/// ICD-10 C53.
pub const CERVICAL_CANCER: &str = "Cervical Cancer";
/// ICD-10 C43.
pub const MELANOMA: &str = "Melanoma";
/// ICD-10 C16.
pub const STOMACH_CANCER: &str = "Stomach Cancer";
/// ICD-10 C25.
pub const PANCREATIC_CANCER: &str = "Pancreatic Cancer";
/// ICD-10 C56.
pub const OVARIAN_CANCER: &str = "Ovarian Cancer";

/// Common cancer codes in priority order, as `(matcher notation, label)`.
pub const CANCER_CODES: &[(&str, &str)] = &[
    ("C33-C34", LUNG_CANCER),
    ("C18-C21", COLORECTAL_CANCER),
    ("C50", BREAST_CANCER),
    ("C61", PROSTATE_CANCER),
    ("C53", CERVICAL_CANCER),
    ("C43", MELANOMA),
    ("C16", STOMACH_CANCER),
    ("C25", PANCREATIC_CANCER),
    ("C56", OVARIAN_CANCER),
];

/// The common cancer rule set built from [`CANCER_CODES`].
pub fn cancer_rules() -> RuleSet {
    let rules = CANCER_CODES
        .iter()
        .map(|&(notation, label)| {
            let matcher = match notation.split_once('-') {
                Some((low, high)) => CodeMatcher::Range {
                    low: low.to_string(),
                    high: high.to_string(),
                },
                None => CodeMatcher::Prefix(notation.to_string()),
            };
            CategoryRule {
                matcher,
                label: label.to_string(),
            }
        })
        .collect();
    RuleSet { rules }
}

// =============================================================================
// Colours
// =============================================================================

/// Semi-transparent pastel colours used for categories and nodes.
pub const PASTEL_COLORS: &[&str] = &[
    "rgba(255,179,186,0.7)",
    "rgba(255,223,186,0.7)",
    "rgba(255,255,186,0.7)",
    "rgba(186,255,201,0.7)",
    "rgba(186,225,255,0.7)",
    "rgba(218,186,255,0.7)",
    "rgba(255,200,255,0.7)",
    "rgba(200,255,255,0.7)",
    "rgba(255,220,200,0.7)",
];

/// [`PASTEL_COLORS`] as a palette.
pub fn pastel_palette() -> Vec<Color> {
    PASTEL_COLORS.iter().map(|&c| Color::new(c)).collect()
}
