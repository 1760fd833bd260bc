//! CSV loading with load-time row validation.

use crate::types::{RealPortfolioRow, SandboxRow, ThesisRow};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Conventional file name of the real portfolio dataset.
pub const REAL_PORTFOLIO_FILE: &str = "galvanize_portfolio_live_corrected.csv";
/// Conventional file name of the sandbox dataset.
pub const SANDBOX_FILE: &str = "galvanize_sandbox_portfolio.csv";
/// Conventional file name of the thesis scoring dataset.
pub const THESIS_FILE: &str = "investment_thesis_scores.csv";

/// Highest score a thesis criterion can take.
const MAX_CRITERION_SCORE: u8 = 3;

/// Row-level checks run before a row is admitted into a dataset.
pub trait Validate {
    /// Unique key of the row.
    fn key(&self) -> &str;

    /// Describe why the row cannot be used, if it cannot.
    fn validate(&self) -> std::result::Result<(), String>;
}

fn require_positive(name: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be > 0, got {}", name, value))
    }
}

fn require_non_negative(name: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be >= 0, got {}", name, value))
    }
}

impl Validate for RealPortfolioRow {
    fn key(&self) -> &str {
        &self.company
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.employees == 0 {
            return Err("employees must be > 0".to_string());
        }
        require_positive("funding_raised_m", self.funding_raised_m)?;
        require_non_negative(
            "estimated_annual_tco2e_avoided_k",
            self.estimated_annual_tco2e_avoided_k,
        )
    }
}

impl Validate for SandboxRow {
    fn key(&self) -> &str {
        &self.company
    }

    fn validate(&self) -> std::result::Result<(), String> {
        require_positive("Investment ($M)", self.investment_m)?;
        require_non_negative("Payback Period (years)", self.payback_years)?;
        require_non_negative("Lifetime tCO2e Avoided (M)", self.lifetime_tco2e_m)?;
        require_non_negative("Annual tCO2e Avoided (K)", self.annual_tco2e_k)?;
        if !self.irr_percent.is_finite() {
            return Err(format!("IRR (%) must be finite, got {}", self.irr_percent));
        }
        Ok(())
    }
}

impl Validate for ThesisRow {
    fn key(&self) -> &str {
        &self.company
    }

    fn validate(&self) -> std::result::Result<(), String> {
        for (name, score) in [
            ("Hardware+Software", self.hardware_software),
            ("Capital Efficiency", self.capital_efficiency),
            ("Data Markets", self.data_markets),
        ] {
            if score > MAX_CRITERION_SCORE {
                return Err(format!(
                    "{} must be between 0 and {}, got {}",
                    name, MAX_CRITERION_SCORE, score
                ));
            }
        }
        Ok(())
    }
}

/// A row that was excluded from a dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectedRow {
    /// 1-based line in the source file
    pub line: u64,
    /// Company key, when the row parsed far enough to have one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub reason: String,
}

/// Immutable snapshot of one dataset plus the rows that were excluded from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport<T> {
    /// File the rows came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// When the snapshot was taken
    pub loaded_at: DateTime<Utc>,
    /// Rows that passed validation, in file order
    pub rows: Vec<T>,
    /// Rows that failed to parse or validate
    pub rejected: Vec<RejectedRow>,
}

impl<T> LoadReport<T> {
    /// Whether every row in the source was admitted.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

fn read_rows<T, R>(reader: R, source: Option<PathBuf>) -> Result<LoadReport<T>>
where
    T: DeserializeOwned + Validate,
    R: io::Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut rows: Vec<T> = Vec::new();
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for record in csv_reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                rejected.push(RejectedRow {
                    line,
                    company: None,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: T = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                rejected.push(RejectedRow {
                    line,
                    company: record.get(0).map(str::to_string),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let reason = match row.validate() {
            Err(reason) => Some(reason),
            Ok(()) if !seen.insert(row.key().to_string()) => {
                Some(format!("duplicate company: {}", row.key()))
            }
            Ok(()) => None,
        };

        match reason {
            Some(reason) => rejected.push(RejectedRow {
                line,
                company: Some(row.key().to_string()),
                reason,
            }),
            None => rows.push(row),
        }
    }

    for row in &rejected {
        tracing::warn!(
            line = row.line,
            company = row.company.as_deref().unwrap_or("?"),
            reason = %row.reason,
            "excluding row"
        );
    }
    tracing::info!(
        source = ?source,
        rows = rows.len(),
        rejected = rejected.len(),
        "loaded dataset"
    );

    Ok(LoadReport {
        source,
        loaded_at: Utc::now(),
        rows,
        rejected,
    })
}

fn load_rows<T>(path: &Path) -> Result<LoadReport<T>>
where
    T: DeserializeOwned + Validate,
{
    let file = File::open(path).map_err(|source| Error::Dataset {
        path: path.to_path_buf(),
        source,
    })?;
    read_rows(file, Some(path.to_path_buf()))
}

/// Read real portfolio rows from any CSV source.
pub fn read_real_portfolio<R: io::Read>(reader: R) -> Result<LoadReport<RealPortfolioRow>> {
    read_rows(reader, None)
}

/// Read sandbox rows from any CSV source.
pub fn read_sandbox<R: io::Read>(reader: R) -> Result<LoadReport<SandboxRow>> {
    read_rows(reader, None)
}

/// Read thesis rows from any CSV source.
pub fn read_thesis<R: io::Read>(reader: R) -> Result<LoadReport<ThesisRow>> {
    read_rows(reader, None)
}

/// Load the real portfolio dataset from a CSV file.
pub fn load_real_portfolio(path: impl AsRef<Path>) -> Result<LoadReport<RealPortfolioRow>> {
    load_rows(path.as_ref())
}

/// Load the sandbox dataset from a CSV file.
pub fn load_sandbox(path: impl AsRef<Path>) -> Result<LoadReport<SandboxRow>> {
    load_rows(path.as_ref())
}

/// Load the thesis scoring dataset from a CSV file.
pub fn load_thesis(path: impl AsRef<Path>) -> Result<LoadReport<ThesisRow>> {
    load_rows(path.as_ref())
}
