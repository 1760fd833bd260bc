//! Headline figures for the real and sandbox portfolio overviews.

use super::aggregate::{diversification_score, group_sum, mean_by, sum_by};
use super::ratios::{checked_div, MEGA_TO_KILO};
use crate::types::{RealPortfolioRow, SandboxRow};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Portfolio-wide totals for the real portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealPortfolioSummary {
    pub companies: usize,
    pub total_funding_m: f64,
    pub total_employees: u64,
    pub total_impact_k: f64,
    /// Mean founding year, truncated to a whole year
    pub average_year_founded: i32,
}

impl RealPortfolioSummary {
    pub fn from_rows<T: AsRef<RealPortfolioRow>>(rows: &[T]) -> Result<Self> {
        let average_year = mean_by(rows, |r| f64::from(r.as_ref().year_founded))?;

        Ok(Self {
            companies: rows.len(),
            total_funding_m: sum_by(rows, |r| r.as_ref().funding_raised_m),
            total_employees: rows.iter().map(|r| u64::from(r.as_ref().employees)).sum(),
            total_impact_k: sum_by(rows, |r| r.as_ref().estimated_annual_tco2e_avoided_k),
            average_year_founded: average_year as i32,
        })
    }
}

/// Sector breakdown of the real portfolio, ascending by value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorAttribution {
    pub funding_by_sector: Vec<(String, f64)>,
    pub impact_by_sector: Vec<(String, f64)>,
    /// Diversification of funding across sectors, 0-100
    pub funding_diversification: f64,
}

/// Sum funding and impact per sector.
///
/// Fails with [`Error::EmptyPortfolio`] when there is no funding to attribute.
pub fn sector_attribution<T: AsRef<RealPortfolioRow>>(rows: &[T]) -> Result<SectorAttribution> {
    let funding_by_sector = group_sum(rows, |r| r.as_ref().sector.as_str(), |r| {
        r.as_ref().funding_raised_m
    });
    let impact_by_sector = group_sum(rows, |r| r.as_ref().sector.as_str(), |r| {
        r.as_ref().estimated_annual_tco2e_avoided_k
    });
    let funding_diversification = diversification_score(&funding_by_sector)?;

    Ok(SectorAttribution {
        funding_by_sector,
        impact_by_sector,
        funding_diversification,
    })
}

/// Headline figures for the sandbox portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SandboxOverview {
    pub companies: usize,
    pub total_investment_m: f64,
    pub average_irr_percent: f64,
    pub total_lifetime_impact_m: f64,
    pub average_payback_years: f64,
    /// Lifetime tCO2e avoided per $1K across the whole portfolio
    pub portfolio_efficiency: f64,
    /// Companies whose IRR is strictly above `high_irr_threshold`
    pub high_irr_companies: usize,
    pub high_irr_threshold: f64,
    pub investment_by_sector: Vec<(String, f64)>,
    pub lifetime_impact_by_sector: Vec<(String, f64)>,
}

impl SandboxOverview {
    pub fn from_rows(rows: &[SandboxRow], high_irr_threshold: f64) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyPortfolio("sandbox overview".to_string()));
        }

        let total_investment_m = sum_by(rows, |r| r.investment_m);
        let total_lifetime_impact_m = sum_by(rows, |r| r.lifetime_tco2e_m);

        Ok(Self {
            companies: rows.len(),
            total_investment_m,
            average_irr_percent: mean_by(rows, |r| r.irr_percent)?,
            total_lifetime_impact_m,
            average_payback_years: mean_by(rows, |r| r.payback_years)?,
            portfolio_efficiency: checked_div(
                total_lifetime_impact_m * MEGA_TO_KILO,
                total_investment_m,
                "total investment",
            )?,
            high_irr_companies: rows
                .iter()
                .filter(|r| r.irr_percent > high_irr_threshold)
                .count(),
            high_irr_threshold,
            investment_by_sector: group_sum(rows, |r| r.sector.as_str(), |r| r.investment_m),
            lifetime_impact_by_sector: group_sum(rows, |r| r.sector.as_str(), |r| {
                r.lifetime_tco2e_m
            }),
        })
    }
}

/// A sandbox company on the risk/return plane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskReturnPoint {
    pub company: String,
    pub risk_score: u8,
    pub irr_percent: f64,
}

/// Risk score and IRR for every sandbox company, in input order.
pub fn risk_return_points(rows: &[SandboxRow]) -> Vec<RiskReturnPoint> {
    rows.iter()
        .map(|r| RiskReturnPoint {
            company: r.company.clone(),
            risk_score: r.risk_rating.score(),
            irr_percent: r.irr_percent,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{real_row, sandbox_row};
    use crate::types::{InvestmentStage, RiskRating};
    use approx::assert_relative_eq;

    #[test]
    fn test_real_summary() {
        let mut rows = vec![
            real_row("A", "Energy", InvestmentStage::Early, 10.0, 10, 5.0),
            real_row("B", "Energy", InvestmentStage::Late, 30.0, 50, 15.0),
        ];
        rows[0].year_founded = 2015;
        rows[1].year_founded = 2020;

        let summary = RealPortfolioSummary::from_rows(&rows).unwrap();
        assert_eq!(summary.companies, 2);
        assert_eq!(summary.total_funding_m, 40.0);
        assert_eq!(summary.total_employees, 60);
        assert_eq!(summary.total_impact_k, 20.0);
        // 2017.5 truncates
        assert_eq!(summary.average_year_founded, 2017);
    }

    #[test]
    fn test_real_summary_empty() {
        let rows: Vec<RealPortfolioRow> = Vec::new();
        assert!(matches!(
            RealPortfolioSummary::from_rows(&rows),
            Err(Error::EmptyPortfolio(_))
        ));
    }

    #[test]
    fn test_sector_attribution() {
        let rows = vec![
            real_row("A", "Energy", InvestmentStage::Early, 30.0, 10, 1.0),
            real_row("B", "Food", InvestmentStage::Early, 10.0, 10, 9.0),
            real_row("C", "Energy", InvestmentStage::Early, 60.0, 10, 2.0),
        ];
        let attribution = sector_attribution(&rows).unwrap();

        assert_eq!(
            attribution.funding_by_sector,
            vec![("Food".to_string(), 10.0), ("Energy".to_string(), 90.0)]
        );
        assert_eq!(
            attribution.impact_by_sector,
            vec![("Energy".to_string(), 3.0), ("Food".to_string(), 9.0)]
        );
        // shares 0.9 / 0.1 -> hhi 0.82
        assert_relative_eq!(attribution.funding_diversification, 18.0, epsilon = 1e-9);
    }

    fn sandbox() -> Vec<SandboxRow> {
        vec![
            sandbox_row("A", "Energy", 20.0, 25.0, 5.0, RiskRating::Medium, 2.0),
            sandbox_row("B", "Mobility", 30.0, 15.0, 7.0, RiskRating::High, 1.0),
            sandbox_row("C", "Energy", 50.0, 20.0, 6.0, RiskRating::Low, 3.0),
        ]
    }

    #[test]
    fn test_sandbox_overview() {
        let overview = SandboxOverview::from_rows(&sandbox(), 20.0).unwrap();

        assert_eq!(overview.companies, 3);
        assert_eq!(overview.total_investment_m, 100.0);
        assert_relative_eq!(overview.average_irr_percent, 20.0);
        assert_eq!(overview.total_lifetime_impact_m, 6.0);
        assert_relative_eq!(overview.average_payback_years, 6.0);
        // 6000K tons / $100M
        assert_relative_eq!(overview.portfolio_efficiency, 60.0);
        // 20.0 is not above the threshold
        assert_eq!(overview.high_irr_companies, 1);
        assert_eq!(
            overview.investment_by_sector,
            vec![("Mobility".to_string(), 30.0), ("Energy".to_string(), 70.0)]
        );
    }

    #[test]
    fn test_sandbox_overview_empty() {
        assert!(matches!(
            SandboxOverview::from_rows(&[], 20.0),
            Err(Error::EmptyPortfolio(_))
        ));
    }

    #[test]
    fn test_risk_return_points() {
        let points = risk_return_points(&sandbox());
        let scores: Vec<u8> = points.iter().map(|p| p.risk_score).collect();
        assert_eq!(scores, vec![2, 4, 1]);
        assert_eq!(points[1].irr_percent, 15.0);
    }
}
