//! Impact Metrics - Ratio, benchmark and materiality analytics for climate-tech portfolios.
//!
//! This crate turns three tabular datasets into derived metrics:
//!
//! - **Ratios**: impact per employee, impact per $M, funding per employee, sandbox efficiency
//! - **Aggregates**: sums, means, medians, ordered sector attribution, Herfindahl diversification
//! - **Benchmarks**: percent deltas against portfolio means or sector benchmarks, performance tiers
//! - **Materiality**: financial/impact quadrant classification against filtered-set medians
//! - **Thesis scoring**: totals, stable top-N ranking, threshold counts
//!
//! Every metric is a pure function over row slices. Loading and filtering live in [`data`].
//!
//! # Example
//!
//! ```rust,no_run
//! use impact_metrics::data::{load_real_portfolio, PortfolioFilter};
//! use impact_metrics::metrics::{group_sum, materiality_matrix};
//! use impact_metrics::EngineConfig;
//!
//! let report = load_real_portfolio("galvanize_portfolio_live_corrected.csv").unwrap();
//! let filter = PortfolioFilter::default().with_sector("Energy");
//! let rows: Vec<_> = filter.apply(&report.rows).into_iter().cloned().collect();
//!
//! let funding = group_sum(&rows, |r| r.sector.as_str(), |r| r.funding_raised_m);
//! let matrix = materiality_matrix(&rows, &EngineConfig::default()).unwrap();
//! println!("{:?} {:?}", funding, matrix.quadrant_counts());
//! ```

pub mod config;
pub mod data;
pub mod metrics;
pub mod thesis;
pub mod types;

// Re-export commonly used types
pub use config::{EngineConfig, SectorBenchmark, SectorBenchmarks};
pub use types::{
    ApiResponse, ImpactRecord, InvestmentStage, PerformanceTier, Quadrant, RealPortfolioRow,
    RiskRating, SandboxRow, ThesisRow,
};

// Re-export main functionality
pub use metrics::{
    classify_performance, classify_quadrant, diversification_score, funding_per_employee,
    group_sum, herfindahl_concentration, impact_efficiency_sandbox, impact_per_employee,
    impact_per_funding_m, materiality_matrix, mean_by, median, percent_delta, sum_by,
};
pub use thesis::{count_where, top_n};

/// Error types for impact-metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Division undefined: {0} is zero")]
    DivisionUndefined(String),

    #[error("Empty portfolio: cannot compute {0} over zero rows")]
    EmptyPortfolio(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open dataset {}: {source}", .path.display())]
    Dataset {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Company not found: {0}")]
    NotFound(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type for impact-metrics operations.
pub type Result<T> = std::result::Result<T, Error>;
