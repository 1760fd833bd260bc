//! Per-company efficiency ratios.

use crate::types::{ImpactRecord, RealPortfolioRow, SandboxRow};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Million tons to thousand tons.
pub const MEGA_TO_KILO: f64 = 1000.0;

/// Divide, refusing a zero denominator instead of producing inf/NaN.
pub(crate) fn checked_div(numerator: f64, denominator: f64, what: &str) -> Result<f64> {
    if denominator == 0.0 {
        return Err(Error::DivisionUndefined(what.to_string()));
    }
    Ok(numerator / denominator)
}

/// Thousand tCO2e avoided per employee.
pub fn impact_per_employee(row: &RealPortfolioRow) -> Result<f64> {
    checked_div(
        row.impact_metric(),
        f64::from(row.employees),
        &format!("employees of {}", row.company),
    )
}

/// Thousand tCO2e avoided per $M of capital.
pub fn impact_per_funding_m<R: ImpactRecord + ?Sized>(row: &R) -> Result<f64> {
    checked_div(
        row.impact_metric(),
        row.funding_m(),
        &format!("funding of {}", row.company()),
    )
}

/// $M raised per employee.
pub fn funding_per_employee(row: &RealPortfolioRow) -> Result<f64> {
    checked_div(
        row.funding_raised_m,
        f64::from(row.employees),
        &format!("employees of {}", row.company),
    )
}

/// Lifetime tCO2e avoided per $1K invested.
///
/// Lifetime impact is stored in millions of tons and investment in $M, so the
/// numerator is scaled by [`MEGA_TO_KILO`].
pub fn impact_efficiency_sandbox(row: &SandboxRow) -> Result<f64> {
    checked_div(
        row.lifetime_tco2e_m * MEGA_TO_KILO,
        row.investment_m,
        &format!("investment of {}", row.company),
    )
}

/// The three real-portfolio ratios for one company.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CompanyRatios {
    pub impact_per_employee: f64,
    pub impact_per_funding: f64,
    pub funding_per_employee: f64,
}

impl CompanyRatios {
    pub fn for_row(row: &RealPortfolioRow) -> Result<Self> {
        Ok(Self {
            impact_per_employee: impact_per_employee(row)?,
            impact_per_funding: impact_per_funding_m(row)?,
            funding_per_employee: funding_per_employee(row)?,
        })
    }
}
