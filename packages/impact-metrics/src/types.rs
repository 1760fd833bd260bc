//! Row types for the three portfolio datasets and the labels derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Funding stage of a real portfolio company.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InvestmentStage {
    Early,
    Growth,
    Late,
}

impl InvestmentStage {
    /// All stages in lifecycle order.
    pub const ALL: [InvestmentStage; 3] = [Self::Early, Self::Growth, Self::Late];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Early => "Early",
            Self::Growth => "Growth",
            Self::Late => "Late",
        }
    }
}

impl fmt::Display for InvestmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestmentStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "early" => Ok(Self::Early),
            "growth" => Ok(Self::Growth),
            "late" => Ok(Self::Late),
            other => Err(format!("unknown investment stage: {}", other)),
        }
    }
}

/// Qualitative risk rating of a sandbox company, ordered from least to most risky.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskRating {
    Low,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

impl RiskRating {
    /// Numeric position on the risk axis (1 = Low ... 4 = High).
    pub fn score(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::MediumHigh => 3,
            Self::High => 4,
        }
    }
}

/// Read access shared by every row that carries an impact figure and a capital figure.
///
/// Ratio formulas are written once against this trait so the real and sandbox
/// portfolios cannot drift apart.
pub trait ImpactRecord {
    fn company(&self) -> &str;
    fn sector(&self) -> &str;
    /// Annual avoided emissions, in thousands of tCO2e.
    fn impact_metric(&self) -> f64;
    /// Capital deployed, in millions of USD.
    fn funding_m(&self) -> f64;
}

/// One company from the real climate-tech portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealPortfolioRow {
    pub company: String,
    pub sector: String,
    pub subsector: String,
    pub investment_stage: InvestmentStage,
    /// Total funding raised, USD millions
    pub funding_raised_m: f64,
    pub employees: u32,
    pub year_founded: i32,
    /// Estimated annual avoided emissions, thousands of tCO2e
    pub estimated_annual_tco2e_avoided_k: f64,
    pub scale_indicator: String,
    pub scale_value: i64,
    pub country: String,
    pub impact_lever: String,
    pub notes: String,
}

impl ImpactRecord for RealPortfolioRow {
    fn company(&self) -> &str {
        &self.company
    }

    fn sector(&self) -> &str {
        &self.sector
    }

    fn impact_metric(&self) -> f64 {
        self.estimated_annual_tco2e_avoided_k
    }

    fn funding_m(&self) -> f64 {
        self.funding_raised_m
    }
}

impl AsRef<RealPortfolioRow> for RealPortfolioRow {
    fn as_ref(&self) -> &RealPortfolioRow {
        self
    }
}

/// One company from the synthetic financial-model portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SandboxRow {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Investment ($M)")]
    pub investment_m: f64,
    #[serde(rename = "IRR (%)")]
    pub irr_percent: f64,
    #[serde(rename = "Payback Period (years)")]
    pub payback_years: f64,
    #[serde(rename = "Risk Rating")]
    pub risk_rating: RiskRating,
    #[serde(rename = "Lifetime tCO2e Avoided (M)")]
    pub lifetime_tco2e_m: f64,
    #[serde(rename = "Annual tCO2e Avoided (K)")]
    pub annual_tco2e_k: f64,
}

impl ImpactRecord for SandboxRow {
    fn company(&self) -> &str {
        &self.company
    }

    fn sector(&self) -> &str {
        &self.sector
    }

    fn impact_metric(&self) -> f64 {
        self.annual_tco2e_k
    }

    fn funding_m(&self) -> f64 {
        self.investment_m
    }
}

/// Investment-thesis scores for one company, each criterion on a 0-3 scale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThesisRow {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Hardware+Software")]
    pub hardware_software: u8,
    #[serde(rename = "Capital Efficiency")]
    pub capital_efficiency: u8,
    #[serde(rename = "Data Markets")]
    pub data_markets: u8,
}

/// Ordinal tier from comparing two ratio deltas against their baselines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    BelowAverage,
    OnPar,
    AboveAverage,
    Exceptional,
}

/// Cell of the financial/impact materiality grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    Stars,
    ImpactLeaders,
    FinancialLeaders,
    Underperformers,
}

/// API response wrapper for success cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
