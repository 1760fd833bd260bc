//! Investment-thesis scoring: totals, ranking and threshold counts.

use crate::config::ThesisThresholds;
use crate::types::ThesisRow;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// One of the three thesis criteria.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Criterion {
    #[serde(rename = "Hardware+Software")]
    HardwareSoftware,
    #[serde(rename = "Capital Efficiency")]
    CapitalEfficiency,
    #[serde(rename = "Data Markets")]
    DataMarkets,
}

impl Criterion {
    pub const ALL: [Criterion; 3] = [
        Self::HardwareSoftware,
        Self::CapitalEfficiency,
        Self::DataMarkets,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::HardwareSoftware => "Hardware+Software",
            Self::CapitalEfficiency => "Capital Efficiency",
            Self::DataMarkets => "Data Markets",
        }
    }
}

impl ThesisRow {
    /// Score on a single criterion.
    pub fn score(&self, criterion: Criterion) -> u8 {
        match criterion {
            Criterion::HardwareSoftware => self.hardware_software,
            Criterion::CapitalEfficiency => self.capital_efficiency,
            Criterion::DataMarkets => self.data_markets,
        }
    }

    /// Sum of the three criteria, 0-9 for validated rows. Saturates at `u8::MAX`.
    pub fn total_score(&self) -> u8 {
        self.hardware_software
            .saturating_add(self.capital_efficiency)
            .saturating_add(self.data_markets)
    }
}

/// The `n` highest-scoring rows by `key`, descending.
///
/// The sort is stable: rows with equal keys keep their input order.
pub fn top_n_by<T, K, F>(rows: &[T], n: usize, key: F) -> Vec<&T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut ranked: Vec<&T> = rows.iter().collect();
    ranked.sort_by_key(|row| Reverse(key(*row)));
    ranked.truncate(n);
    ranked
}

/// The `n` rows with the highest total score, ties in input order.
pub fn top_n(rows: &[ThesisRow], n: usize) -> Vec<&ThesisRow> {
    top_n_by(rows, n, ThesisRow::total_score)
}

/// Number of rows satisfying `predicate`.
pub fn count_where<T, P>(rows: &[T], predicate: P) -> usize
where
    P: Fn(&T) -> bool,
{
    rows.iter().filter(|row| predicate(*row)).count()
}

/// Portfolio-wide sum of each criterion.
pub fn criteria_totals(rows: &[ThesisRow]) -> Vec<(Criterion, u32)> {
    Criterion::ALL
        .into_iter()
        .map(|c| (c, rows.iter().map(|r| u32::from(r.score(c))).sum()))
        .collect()
}

/// Threshold counts highlighting where the portfolio leans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThesisInsights {
    pub companies: usize,
    /// Hardware+Software at or above the leader threshold
    pub hardware_software_leaders: usize,
    /// Capital Efficiency exactly at the champion score
    pub capital_efficiency_champions: usize,
    /// Data Markets at or above the player threshold
    pub data_market_players: usize,
}

impl ThesisInsights {
    pub fn from_rows(rows: &[ThesisRow], thresholds: &ThesisThresholds) -> Self {
        Self {
            companies: rows.len(),
            hardware_software_leaders: count_where(rows, |r| {
                r.hardware_software >= thresholds.hardware_software_min
            }),
            capital_efficiency_champions: count_where(rows, |r| {
                r.capital_efficiency == thresholds.capital_efficiency_exact
            }),
            data_market_players: count_where(rows, |r| {
                r.data_markets >= thresholds.data_markets_min
            }),
        }
    }
}

/// A thesis row with its total, as shown in the scoring table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoredCompany {
    pub company: String,
    pub hardware_software: u8,
    pub capital_efficiency: u8,
    pub data_markets: u8,
    pub total_score: u8,
}

impl From<&ThesisRow> for ScoredCompany {
    fn from(row: &ThesisRow) -> Self {
        Self {
            company: row.company.clone(),
            hardware_software: row.hardware_software,
            capital_efficiency: row.capital_efficiency,
            data_markets: row.data_markets,
            total_score: row.total_score(),
        }
    }
}
