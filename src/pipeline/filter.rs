//! Filter criteria and the filter engine.
//!
//! Criteria are plain values built from the current control selections and
//! passed into every call; nothing here reads shared state.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{HousingError, Result};
use crate::models::{SaleRecord, SubGeography};

const UNIQUE_SIZE_MESSAGE: &str = "Please select unique slider values for home size.";

// ---------------------------------------------------------------------------
// SizeBound / SizeRange
// ---------------------------------------------------------------------------

/// One end of the home-size selector.
///
/// The two sentinels are distinct states and never compare equal to a
/// finite bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizeBound {
    NoLowerBound,
    Finite(f64),
    NoUpperBound,
}

impl fmt::Display for SizeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeBound::NoLowerBound => write!(f, "<{}", config::SIZE_STOPS[0]),
            SizeBound::Finite(v) => write!(f, "{}", v),
            SizeBound::NoUpperBound => {
                write!(f, ">{}", config::SIZE_STOPS[config::SIZE_STOPS.len() - 1])
            }
        }
    }
}

impl FromStr for SizeBound {
    type Err = HousingError;

    /// Accepts the selector labels `<1000`, `>5000` or a plain number.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with('<') {
            return Ok(SizeBound::NoLowerBound);
        }
        if s.starts_with('>') {
            return Ok(SizeBound::NoUpperBound);
        }
        s.replace(',', "")
            .parse::<f64>()
            .map(SizeBound::Finite)
            .map_err(|_| HousingError::InvalidArgument(format!("Invalid home size bound: {}", s)))
    }
}

/// Lower/upper home-size selection in square feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub lower: SizeBound,
    pub upper: SizeBound,
}

/// Resolved size predicate after validation.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SizePredicate {
    Any,
    AtMost(f64),
    AtLeast(f64),
    Between(f64, f64),
}

impl SizePredicate {
    fn matches(self, square_feet: f64) -> bool {
        match self {
            SizePredicate::Any => true,
            SizePredicate::AtMost(upper) => square_feet <= upper,
            SizePredicate::AtLeast(lower) => square_feet >= lower,
            SizePredicate::Between(lower, upper) => lower <= square_feet && square_feet <= upper,
        }
    }
}

impl SizeRange {
    pub fn new(lower: SizeBound, upper: SizeBound) -> Self {
        Self { lower, upper }
    }

    /// Both sentinels: no size filtering.
    pub fn unbounded() -> Self {
        Self::new(SizeBound::NoLowerBound, SizeBound::NoUpperBound)
    }

    fn predicate(&self) -> Result<SizePredicate> {
        use SizeBound::*;

        for bound in [self.lower, self.upper] {
            if let Finite(v) = bound {
                if !v.is_finite() {
                    return Err(HousingError::Validation(format!(
                        "Home size bound must be a number, got {}",
                        v
                    )));
                }
            }
        }

        match (self.lower, self.upper) {
            (NoLowerBound, NoUpperBound) => Ok(SizePredicate::Any),
            (NoLowerBound, Finite(upper)) => Ok(SizePredicate::AtMost(upper)),
            (Finite(lower), NoUpperBound) => Ok(SizePredicate::AtLeast(lower)),
            (Finite(lower), Finite(upper)) if lower == upper => {
                Err(HousingError::Validation(UNIQUE_SIZE_MESSAGE.to_string()))
            }
            (Finite(lower), Finite(upper)) if lower > upper => Err(HousingError::Validation(
                "Home size lower bound must not exceed the upper bound.".to_string(),
            )),
            (Finite(lower), Finite(upper)) => Ok(SizePredicate::Between(lower, upper)),
            (NoLowerBound, NoLowerBound) | (NoUpperBound, NoUpperBound) => {
                Err(HousingError::Validation(UNIQUE_SIZE_MESSAGE.to_string()))
            }
            _ => Err(HousingError::Validation(
                "Home size range is reversed.".to_string(),
            )),
        }
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

// ---------------------------------------------------------------------------
// YearRange
// ---------------------------------------------------------------------------

/// Inclusive range of sale years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn single(year: i32) -> Self {
        Self::new(year, year)
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        if self.is_single() {
            year == self.start
        } else {
            self.start <= year && year <= self.end
        }
    }

    /// Heading suffix: `2021 - 2023` or `2021 only`.
    pub fn title_label(&self) -> String {
        if self.is_single() {
            format!("{} only", self.start)
        } else {
            format!("{} - {}", self.start, self.end)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(HousingError::Validation(format!(
                "Year range start {} is after end {}.",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(config::DEFAULT_YEARS.0, config::DEFAULT_YEARS.1)
    }
}

// ---------------------------------------------------------------------------
// GeographyScope
// ---------------------------------------------------------------------------

/// Entire county, or a chosen set of sub-geographies.
///
/// An empty set under `SubGeographies` matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeographyScope {
    #[default]
    EntireRegion,
    SubGeographies(BTreeSet<SubGeography>),
}

impl GeographyScope {
    pub fn sub_geographies<I: IntoIterator<Item = SubGeography>>(selected: I) -> Self {
        GeographyScope::SubGeographies(selected.into_iter().collect())
    }

    pub fn matches(&self, sub_geography: SubGeography) -> bool {
        match self {
            GeographyScope::EntireRegion => true,
            GeographyScope::SubGeographies(set) => set.contains(&sub_geography),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// Current control selections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub size: SizeRange,
    pub years: YearRange,
    pub geography: GeographyScope,
}

impl FilterCriteria {
    pub fn new(size: SizeRange, years: YearRange, geography: GeographyScope) -> Self {
        Self {
            size,
            years,
            geography,
        }
    }

    /// Check the selection without touching any records.
    pub fn validate(&self) -> Result<()> {
        self.size.predicate()?;
        self.years.validate()
    }
}

// ---------------------------------------------------------------------------
// FilteredSet / apply
// ---------------------------------------------------------------------------

/// Records surviving a filter pass, borrowed from the store.
#[derive(Debug, Clone, Default)]
pub struct FilteredSet<'a> {
    /// Size and geography filters only; feeds the trend chart.
    pub all_years: Vec<&'a SaleRecord>,
    /// Additionally restricted to the year range; feeds the map and KPIs.
    pub in_period: Vec<&'a SaleRecord>,
}

/// Apply `criteria` to `records`.
///
/// Fails with [`HousingError::Validation`] before looking at any record
/// when the selection is invalid.
pub fn apply<'a>(records: &'a [SaleRecord], criteria: &FilterCriteria) -> Result<FilteredSet<'a>> {
    let size = criteria.size.predicate()?;
    criteria.years.validate()?;

    let all_years: Vec<&SaleRecord> = records
        .iter()
        .filter(|r| size.matches(r.square_feet))
        .filter(|r| criteria.geography.matches(r.sub_geography))
        .collect();

    let in_period = all_years
        .iter()
        .copied()
        .filter(|r| criteria.years.contains(r.sale_year))
        .collect();

    Ok(FilteredSet {
        all_years,
        in_period,
    })
}
