//! Company-versus-baseline comparisons.
//!
//! Every "vs. portfolio avg" and "vs. industry avg" figure goes through [`percent_delta`].

use super::aggregate::{mean_by, try_mean_by};
use super::ratios::{
    funding_per_employee, impact_efficiency_sandbox, impact_per_employee, impact_per_funding_m,
    CompanyRatios,
};
use crate::config::{EngineConfig, SectorBenchmark};
use crate::types::{PerformanceTier, RealPortfolioRow, SandboxRow};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Delta above which both ratios make a company exceptional.
pub const EXCEPTIONAL_DELTA: f64 = 20.0;
/// Delta above which both ratios put a company above average.
pub const ABOVE_AVERAGE_DELTA: f64 = 0.0;
/// Delta above which both ratios keep a company on par.
pub const ON_PAR_DELTA: f64 = -20.0;

/// Percentage difference of `value` from `baseline`. Positive means above the baseline.
///
/// # Example
///
/// ```rust
/// use impact_metrics::percent_delta;
///
/// assert_eq!(percent_delta(150.0, 100.0).unwrap(), 50.0);
/// assert!(percent_delta(1.0, 0.0).is_err());
/// ```
pub fn percent_delta(value: f64, baseline: f64) -> Result<f64> {
    if baseline == 0.0 {
        return Err(Error::DivisionUndefined("benchmark baseline".to_string()));
    }
    Ok(((value / baseline) - 1.0) * 100.0)
}

/// Tier a company from two deltas (typically impact/employee and impact/$M).
///
/// Thresholds are strict: a delta of exactly 20 is not exceptional and exactly -20 is
/// below average.
pub fn classify_performance(delta1: f64, delta2: f64) -> PerformanceTier {
    let both_above = |threshold: f64| delta1 > threshold && delta2 > threshold;

    if both_above(EXCEPTIONAL_DELTA) {
        PerformanceTier::Exceptional
    } else if both_above(ABOVE_AVERAGE_DELTA) {
        PerformanceTier::AboveAverage
    } else if both_above(ON_PAR_DELTA) {
        PerformanceTier::OnPar
    } else {
        PerformanceTier::BelowAverage
    }
}

/// One metric of a company next to its baseline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricComparison {
    pub value: f64,
    pub baseline: f64,
    /// Percent above (+) or below (-) the baseline
    pub delta_percent: f64,
}

impl MetricComparison {
    pub fn new(value: f64, baseline: f64) -> Result<Self> {
        Ok(Self {
            value,
            baseline,
            delta_percent: percent_delta(value, baseline)?,
        })
    }
}

/// What a company was compared against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Baseline {
    /// Mean of each ratio over the (filtered) portfolio
    Portfolio { companies: usize },
    /// Sector benchmark table entry
    Sector { sector: String, fallback: bool },
}

/// A real-portfolio company measured against a baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyBenchmark {
    pub company: String,
    pub baseline: Baseline,
    pub impact_per_employee: MetricComparison,
    pub impact_per_funding: MetricComparison,
    /// Funding per employee against the portfolio, headcount against a sector
    pub scale: MetricComparison,
    pub tier: PerformanceTier,
}

impl CompanyBenchmark {
    fn build(
        row: &RealPortfolioRow,
        baseline: Baseline,
        impact_per_employee: MetricComparison,
        impact_per_funding: MetricComparison,
        scale: MetricComparison,
    ) -> Self {
        let tier = classify_performance(
            impact_per_employee.delta_percent,
            impact_per_funding.delta_percent,
        );
        tracing::debug!(company = %row.company, ?tier, "benchmarked company");
        Self {
            company: row.company.clone(),
            baseline,
            impact_per_employee,
            impact_per_funding,
            scale,
            tier,
        }
    }
}

/// Compare a company's ratios with the mean of the same ratios over `portfolio`.
///
/// `portfolio` is usually the currently filtered row set and may or may not contain `row`.
pub fn benchmark_against_portfolio<T>(
    row: &RealPortfolioRow,
    portfolio: &[T],
) -> Result<CompanyBenchmark>
where
    T: AsRef<RealPortfolioRow>,
{
    let ratios = CompanyRatios::for_row(row)?;
    let avg_ipe = try_mean_by(portfolio, |r| impact_per_employee(r.as_ref()))?;
    let avg_ipf = try_mean_by(portfolio, |r| impact_per_funding_m(r.as_ref()))?;
    let avg_fpe = try_mean_by(portfolio, |r| funding_per_employee(r.as_ref()))?;

    Ok(CompanyBenchmark::build(
        row,
        Baseline::Portfolio {
            companies: portfolio.len(),
        },
        MetricComparison::new(ratios.impact_per_employee, avg_ipe)?,
        MetricComparison::new(ratios.impact_per_funding, avg_ipf)?,
        MetricComparison::new(ratios.funding_per_employee, avg_fpe)?,
    ))
}

/// Compare a company with the benchmark for its sector.
///
/// Sectors missing from the table are compared against the table's default entry.
pub fn benchmark_against_sector(
    row: &RealPortfolioRow,
    config: &EngineConfig,
) -> Result<CompanyBenchmark> {
    let table = &config.sector_benchmarks;
    let fallback = !table.contains(&row.sector);
    let bench: &SectorBenchmark = table.lookup(&row.sector);

    Ok(CompanyBenchmark::build(
        row,
        Baseline::Sector {
            sector: row.sector.clone(),
            fallback,
        },
        MetricComparison::new(impact_per_employee(row)?, bench.impact_per_employee)?,
        MetricComparison::new(impact_per_funding_m(row)?, bench.impact_per_funding)?,
        MetricComparison::new(f64::from(row.employees), bench.employees_per_company)?,
    ))
}

/// A sandbox company's financial and impact figures against the portfolio means.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SandboxBenchmark {
    pub company: String,
    pub irr_percent: MetricComparison,
    pub payback_years: MetricComparison,
    pub impact_efficiency: MetricComparison,
    pub risk_score: u8,
}

/// Compare a sandbox company with the averages over `portfolio`.
pub fn benchmark_sandbox_company(
    row: &SandboxRow,
    portfolio: &[SandboxRow],
) -> Result<SandboxBenchmark> {
    let avg_irr = mean_by(portfolio, |r| r.irr_percent)?;
    let avg_payback = mean_by(portfolio, |r| r.payback_years)?;
    let avg_efficiency = try_mean_by(portfolio, impact_efficiency_sandbox)?;

    Ok(SandboxBenchmark {
        company: row.company.clone(),
        irr_percent: MetricComparison::new(row.irr_percent, avg_irr)?,
        payback_years: MetricComparison::new(row.payback_years, avg_payback)?,
        impact_efficiency: MetricComparison::new(impact_efficiency_sandbox(row)?, avg_efficiency)?,
        risk_score: row.risk_rating.score(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SECTOR_BENCHMARK;
    use crate::types::fixtures::{real_row, sandbox_row};
    use crate::types::{InvestmentStage, RiskRating};
    use approx::assert_relative_eq;

    #[test]
    fn test_self_delta_is_zero() {
        for v in [1.0, -3.5, 1e-9, 42_000.0] {
            assert_eq!(percent_delta(v, v).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_delta_sign() {
        assert_relative_eq!(percent_delta(120.0, 100.0).unwrap(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(percent_delta(75.0, 100.0).unwrap(), -25.0);
    }

    #[test]
    fn test_zero_baseline() {
        assert!(matches!(
            percent_delta(5.0, 0.0),
            Err(Error::DivisionUndefined(_))
        ));
    }

    #[test]
    fn test_classify_tiers() {
        assert_eq!(classify_performance(25.0, 30.0), PerformanceTier::Exceptional);
        assert_eq!(classify_performance(25.0, 5.0), PerformanceTier::AboveAverage);
        assert_eq!(classify_performance(25.0, -5.0), PerformanceTier::OnPar);
        assert_eq!(classify_performance(50.0, -40.0), PerformanceTier::BelowAverage);
    }

    #[test]
    fn test_classify_boundaries_fall_to_lower_tier() {
        assert_eq!(classify_performance(20.0, 20.0), PerformanceTier::AboveAverage);
        assert_eq!(classify_performance(0.0, 0.0), PerformanceTier::OnPar);
        assert_eq!(classify_performance(-20.0, -20.0), PerformanceTier::BelowAverage);
        assert_eq!(classify_performance(20.0001, 20.0001), PerformanceTier::Exceptional);
    }

    fn portfolio() -> Vec<RealPortfolioRow> {
        vec![
            real_row("A", "Energy", InvestmentStage::Growth, 10.0, 10, 30.0),
            real_row("B", "Energy", InvestmentStage::Early, 20.0, 20, 20.0),
            real_row("C", "Agriculture", InvestmentStage::Late, 40.0, 40, 80.0),
        ]
    }

    #[test]
    fn test_benchmark_against_portfolio() {
        let rows = portfolio();
        // impact/employee: 3, 1, 2 -> mean 2; impact/funding: same values
        let bench = benchmark_against_portfolio(&rows[0], &rows).unwrap();

        assert_relative_eq!(bench.impact_per_employee.baseline, 2.0);
        assert_relative_eq!(bench.impact_per_employee.delta_percent, 50.0);
        assert_relative_eq!(bench.impact_per_funding.delta_percent, 50.0);
        assert_relative_eq!(bench.scale.delta_percent, 0.0);
        assert_eq!(bench.baseline, Baseline::Portfolio { companies: 3 });
        assert_eq!(bench.tier, PerformanceTier::Exceptional);
    }

    #[test]
    fn test_benchmark_against_filtered_references() {
        let rows = portfolio();
        let filtered: Vec<&RealPortfolioRow> =
            rows.iter().filter(|r| r.sector == "Energy").collect();
        let bench = benchmark_against_portfolio(filtered[1], &filtered).unwrap();
        // impact/employee 1 vs mean 2
        assert_relative_eq!(bench.impact_per_employee.delta_percent, -50.0);
        assert_eq!(bench.tier, PerformanceTier::BelowAverage);
    }

    #[test]
    fn test_benchmark_against_empty_portfolio() {
        let rows = portfolio();
        let empty: Vec<RealPortfolioRow> = Vec::new();
        assert!(matches!(
            benchmark_against_portfolio(&rows[0], &empty),
            Err(Error::EmptyPortfolio(_))
        ));
    }

    #[test]
    fn test_benchmark_against_sector() {
        let config = EngineConfig::default();
        // Energy benchmark: 5.0 per employee, 8.0 per $M, 120 employees
        let row = real_row("GridCo", "Energy", InvestmentStage::Growth, 25.0, 60, 360.0);
        let bench = benchmark_against_sector(&row, &config).unwrap();

        assert_relative_eq!(bench.impact_per_employee.delta_percent, 20.0, epsilon = 1e-9);
        assert_relative_eq!(bench.impact_per_funding.delta_percent, 80.0, epsilon = 1e-9);
        assert_relative_eq!(bench.scale.delta_percent, -50.0, epsilon = 1e-9);
        assert_eq!(
            bench.baseline,
            Baseline::Sector {
                sector: "Energy".to_string(),
                fallback: false
            }
        );
    }

    #[test]
    fn test_unknown_sector_uses_default_benchmark() {
        let config = EngineConfig::default();
        let row = real_row("Orbital", "Space", InvestmentStage::Early, 10.0, 10, 100.0);
        let bench = benchmark_against_sector(&row, &config).unwrap();

        assert_eq!(
            bench.impact_per_employee.baseline,
            DEFAULT_SECTOR_BENCHMARK.impact_per_employee
        );
        assert!(matches!(bench.baseline, Baseline::Sector { fallback: true, .. }));
        assert_eq!(bench.tier, PerformanceTier::Exceptional);
    }

    #[test]
    fn test_benchmark_sandbox_company() {
        let rows = vec![
            sandbox_row("X", "Energy", 10.0, 30.0, 4.0, RiskRating::High, 1.0),
            sandbox_row("Y", "Energy", 20.0, 10.0, 8.0, RiskRating::Low, 1.0),
        ];
        let bench = benchmark_sandbox_company(&rows[0], &rows).unwrap();

        assert_relative_eq!(bench.irr_percent.baseline, 20.0);
        assert_relative_eq!(bench.irr_percent.delta_percent, 50.0);
        assert_relative_eq!(bench.payback_years.delta_percent, -100.0 / 3.0, epsilon = 1e-9);
        // efficiency: 100 and 50 -> mean 75
        assert_relative_eq!(bench.impact_efficiency.baseline, 75.0);
        assert_eq!(bench.risk_score, 4);
    }
}
