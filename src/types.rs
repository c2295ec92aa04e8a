//! Advisor record and view-state types

use crate::error::{AdvisorError, AdvisorResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default PDF title band text
pub const DEFAULT_HEADER_TEXT: &str = "ACCEPTED AS @ ANBP DN ZONE 2025";

/// Default page-height fudge factor
pub const DEFAULT_HEIGHT_MULTIPLIER: f64 = 1.18;

/// Accepted range for the page-height fudge factor
pub const MIN_HEIGHT_MULTIPLIER: f64 = 1.05;
pub const MAX_HEIGHT_MULTIPLIER: f64 = 2.0;

/// One active advisor row taken from an uploaded workbook.
///
/// Records are replaced wholesale on edit; `advisor_code` is the identity used
/// for in-place name edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorRecord {
    pub advisor_code: String,
    pub advisor_name: String,
    pub advisor_status: String,
    pub no_of_policies: u64,
    pub annualized_premium: f64,
}

impl AdvisorRecord {
    pub fn new(
        advisor_code: impl Into<String>,
        advisor_name: impl Into<String>,
        advisor_status: impl Into<String>,
        no_of_policies: u64,
        annualized_premium: f64,
    ) -> Self {
        Self {
            advisor_code: advisor_code.into(),
            advisor_name: advisor_name.into(),
            advisor_status: advisor_status.into(),
            no_of_policies,
            annualized_premium,
        }
    }

    /// Copy of this record with a new display name
    pub fn with_name(&self, advisor_name: impl Into<String>) -> Self {
        Self {
            advisor_name: advisor_name.into(),
            ..self.clone()
        }
    }
}

/// Numeric fields the table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    AnnualizedPremium,
    NoOfPolicies,
}

impl SortField {
    /// Identifier used in export file names
    pub fn key(&self) -> &'static str {
        match self {
            SortField::AnnualizedPremium => "annualized_premium",
            SortField::NoOfPolicies => "no_of_policies",
        }
    }

    /// Column label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            SortField::AnnualizedPremium => "Annualized Premium (RS)",
            SortField::NoOfPolicies => "No of Policies",
        }
    }

    /// Parse the short names accepted on the command line
    pub fn parse(s: &str) -> AdvisorResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "premium" | "annualized_premium" | "annualizedpremium" => {
                Ok(SortField::AnnualizedPremium)
            }
            "policies" | "no_of_policies" | "noofpolicies" => Ok(SortField::NoOfPolicies),
            other => Err(AdvisorError::Validation(format!(
                "Unknown sort field '{}' (expected 'premium' or 'policies')",
                other
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ascending",
            SortOrder::Desc => "descending",
        }
    }
}

/// Current sort selection. No field means input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub field: Option<SortField>,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self {
            field: Some(field),
            order,
        }
    }

    /// Header click: the active field flips order, a new field starts ascending.
    pub fn click(self, field: SortField) -> Self {
        if self.field == Some(field) {
            Self {
                field: self.field,
                order: self.order.flipped(),
            }
        } else {
            Self::new(field, SortOrder::Asc)
        }
    }

    /// "Sorted by: ..." line, or None when unsorted
    pub fn describe(&self) -> Option<String> {
        self.field
            .map(|field| format!("Sorted by: {} ({})", field.key(), self.order.describe()))
    }

    /// File name suffix for exports, empty when unsorted
    pub fn file_suffix(&self) -> String {
        match self.field {
            Some(field) => format!("_sorted_by_{}_{}", field.key(), self.order.key()),
            None => String::new(),
        }
    }
}

/// User-adjustable PDF parameters. They never touch data content.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLayoutParams {
    header_text: String,
    height_multiplier: f64,
}

impl ExportLayoutParams {
    pub fn new(header_text: impl Into<String>, height_multiplier: f64) -> AdvisorResult<Self> {
        if !height_multiplier.is_finite()
            || !(MIN_HEIGHT_MULTIPLIER..=MAX_HEIGHT_MULTIPLIER).contains(&height_multiplier)
        {
            return Err(AdvisorError::Validation(format!(
                "Height multiplier {} is outside [{}, {}]",
                height_multiplier, MIN_HEIGHT_MULTIPLIER, MAX_HEIGHT_MULTIPLIER
            )));
        }
        Ok(Self {
            header_text: header_text.into(),
            height_multiplier,
        })
    }

    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    pub fn height_multiplier(&self) -> f64 {
        self.height_multiplier
    }
}

impl Default for ExportLayoutParams {
    fn default() -> Self {
        Self {
            header_text: DEFAULT_HEADER_TEXT.to_string(),
            height_multiplier: DEFAULT_HEIGHT_MULTIPLIER,
        }
    }
}

/// 24-bit colour shared by both export targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    /// Header row fill and title colour
    pub const BRAND: Rgb = Rgb(102, 45, 145);
    /// Title band background
    pub const BRAND_PALE: Rgb = Rgb(246, 242, 255);

    /// Packed 0xRRGGBB value
    pub fn hex(&self) -> u32 {
        (u32::from(self.0) << 16) | (u32::from(self.1) << 8) | u32::from(self.2)
    }

    /// Components scaled to 0.0..=1.0
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

/// Cosmetic styling bucket chosen by rank position only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandTier {
    /// Ranks 1-3
    Top,
    /// Ranks 4-10
    Upper,
    /// Rank 11 onwards
    Rest,
}

impl BandTier {
    /// Tier for a 1-based rank
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            0..=3 => BandTier::Top,
            4..=10 => BandTier::Upper,
            _ => BandTier::Rest,
        }
    }

    pub fn fill(&self) -> Rgb {
        match self {
            BandTier::Top => Rgb(255, 0, 0),
            BandTier::Upper => Rgb(173, 216, 230),
            BandTier::Rest => Rgb(144, 238, 144),
        }
    }

    pub fn text(&self) -> Rgb {
        match self {
            BandTier::Top => Rgb::WHITE,
            BandTier::Upper | BandTier::Rest => Rgb::BLACK,
        }
    }
}
