//! # Facet Filter Engine
//!
//! ## Purpose
//! The canonical filter-selection type and the pure derivation that maps a
//! raw result list plus a selection to the filtered subset. Every
//! presentation variant consumes this module; none carries its own facet
//! logic.
//!
//! ## Input/Output Specification
//! - **Input**: Raw result list (read-only), current `FilterSelection`
//! - **Output**: Ordered subsequence of results passing all four predicates
//! - **Invariant**: Filtering preserves the original relative order and
//!   never mutates the raw list or the selection
//!
//! Year selection is multi-valued with a distinguished "all" sentinel;
//! court, topic and district are single-select with an idempotent toggle
//! rule enforced by the methods here rather than by caller discipline.

use crate::CaseResult;
use serde::{Deserialize, Serialize};

/// Reserved year value meaning "no year restriction"
pub const ALL_YEARS: &str = "all";

/// Current facet state.
///
/// The selection is a plain value: predicates only read it, and every
/// mutation goes through a toggle method that upholds the sentinel and
/// single-select rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Selected years, or the `ALL_YEARS` sentinel alone
    pub years: Vec<String>,
    /// Selected court, at most one
    pub court: Option<String>,
    /// Selected document type / topic, at most one
    pub topic: Option<String>,
    /// Selected district, at most one
    pub district: Option<String>,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterSelection {
    /// A selection with no restriction on any facet
    pub fn new() -> Self {
        Self {
            years: vec![ALL_YEARS.to_string()],
            court: None,
            topic: None,
            district: None,
        }
    }

    /// Toggle a year.
    ///
    /// Selecting the sentinel clears all concrete years; selecting a
    /// concrete year clears the sentinel; removing the last concrete year
    /// restores the sentinel.
    pub fn toggle_year(&mut self, year: &str) {
        if year == ALL_YEARS {
            self.years = vec![ALL_YEARS.to_string()];
            return;
        }
        self.years.retain(|y| y != ALL_YEARS);
        if let Some(pos) = self.years.iter().position(|y| y == year) {
            self.years.remove(pos);
            if self.years.is_empty() {
                self.years.push(ALL_YEARS.to_string());
            }
        } else {
            self.years.push(year.to_string());
        }
    }

    /// Toggle the court facet: re-selecting clears, selecting replaces.
    pub fn toggle_court(&mut self, court: &str) {
        Self::toggle_single(&mut self.court, court);
    }

    /// Toggle the topic facet: re-selecting clears, selecting replaces.
    pub fn toggle_topic(&mut self, topic: &str) {
        Self::toggle_single(&mut self.topic, topic);
    }

    /// Toggle the district facet: re-selecting clears, selecting replaces.
    pub fn toggle_district(&mut self, district: &str) {
        Self::toggle_single(&mut self.district, district);
    }

    /// Reset every facet to its unrestricted state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Whether any facet currently restricts the result set.
    pub fn is_unrestricted(&self) -> bool {
        self.year_unrestricted()
            && self.court.is_none()
            && self.topic.is_none()
            && self.district.is_none()
    }

    /// Whether the given case passes all four predicates.
    pub fn matches(&self, case: &CaseResult) -> bool {
        self.year_passes(case)
            && Self::single_passes(&self.court, case.court.as_deref())
            && Self::single_passes(&self.topic, Some(case.judgement_type.as_str()))
            && Self::single_passes(&self.district, case.district.as_deref())
    }

    fn toggle_single(slot: &mut Option<String>, value: &str) {
        if slot.as_deref() == Some(value) {
            *slot = None;
        } else {
            *slot = Some(value.to_string());
        }
    }

    fn year_unrestricted(&self) -> bool {
        self.years.is_empty() || self.years.iter().any(|y| y == ALL_YEARS)
    }

    fn year_passes(&self, case: &CaseResult) -> bool {
        if self.year_unrestricted() {
            return true;
        }
        match case.decision_date.as_deref().and_then(extract_year) {
            Some(year) => self.years.iter().any(|y| y == year),
            None => false,
        }
    }

    fn single_passes(selected: &Option<String>, field: Option<&str>) -> bool {
        match selected.as_deref() {
            None => true,
            Some(want) => field == Some(want),
        }
    }
}

/// Extract the year from a free-form decision-date string.
///
/// The year is the trailing run of ASCII digits when that run is exactly
/// four long; anything else yields `None`.
pub fn extract_year(date: &str) -> Option<&str> {
    let trimmed = date.trim_end();
    let digits = trimmed
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits == 4 {
        Some(&trimmed[trimmed.len() - 4..])
    } else {
        None
    }
}

/// Derive the ordered subsequence of `results` passing `selection`.
pub fn filter_results<'a>(
    results: &'a [CaseResult],
    selection: &FilterSelection,
) -> Vec<&'a CaseResult> {
    results.iter().filter(|c| selection.matches(c)).collect()
}
