//! Portfolio metrics module.
//!
//! Provides efficiency ratios, portfolio aggregates, benchmark comparisons and
//! materiality classification.

mod aggregate;
mod benchmark;
mod materiality;
mod ratios;
mod summary;

pub use aggregate::{
    diversification_score, group_sum, herfindahl_concentration, mean_by, median, sum_by,
    try_mean_by,
};
pub use benchmark::{
    benchmark_against_portfolio, benchmark_against_sector, benchmark_sandbox_company,
    classify_performance, percent_delta, Baseline, CompanyBenchmark, MetricComparison,
    SandboxBenchmark, ABOVE_AVERAGE_DELTA, EXCEPTIONAL_DELTA, ON_PAR_DELTA,
};
pub use materiality::{
    classify_quadrant, financial_performance, impact_performance, materiality_matrix,
    MaterialityContext, MaterialityMatrix, MaterialityPoint,
};
pub use ratios::{
    funding_per_employee, impact_efficiency_sandbox, impact_per_employee, impact_per_funding_m,
    CompanyRatios, MEGA_TO_KILO,
};
pub use summary::{
    risk_return_points, sector_attribution, RealPortfolioSummary, RiskReturnPoint,
    SandboxOverview, SectorAttribution,
};
