//! Financial/impact materiality quadrants.
//!
//! Companies are placed on a 2x2 grid split at the medians of the row set being
//! examined. Medians and the funding-efficiency normalization are recomputed for every
//! call, so a filtered subset gets its own grid.

use super::aggregate::median;
use super::ratios::{checked_div, funding_per_employee, impact_per_funding_m};
use crate::config::EngineConfig;
use crate::types::{InvestmentStage, Quadrant, RealPortfolioRow};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Place a company given its two scores and the medians of its row set.
///
/// A score equal to its median counts as "not above" on that axis. The same comparison
/// is used for both axes and every quadrant.
pub fn classify_quadrant(
    financial: f64,
    impact: f64,
    median_financial: f64,
    median_impact: f64,
) -> Quadrant {
    let strong_financial = financial > median_financial;
    let strong_impact = impact > median_impact;

    match (strong_financial, strong_impact) {
        (true, true) => Quadrant::Stars,
        (false, true) => Quadrant::ImpactLeaders,
        (true, false) => Quadrant::FinancialLeaders,
        (false, false) => Quadrant::Underperformers,
    }
}

/// Set-level inputs the financial composite is normalized against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialityContext {
    /// Highest funding-per-employee in the row set
    pub max_funding_efficiency: f64,
}

impl MaterialityContext {
    pub fn from_rows<T: AsRef<RealPortfolioRow>>(rows: &[T]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyPortfolio("materiality context".to_string()));
        }

        let mut max_funding_efficiency = f64::NEG_INFINITY;
        for row in rows {
            max_funding_efficiency =
                max_funding_efficiency.max(funding_per_employee(row.as_ref())?);
        }
        Ok(Self {
            max_funding_efficiency,
        })
    }
}

/// Synthetic financial-performance score:
/// `w_stage * stage_score + w_eff * normalized_funding_efficiency + w_sector * multiplier * 100`.
///
/// Funding efficiency is $M raised per employee, scaled to 0-100 against the highest
/// value in the row set.
pub fn financial_performance(
    row: &RealPortfolioRow,
    context: &MaterialityContext,
    config: &EngineConfig,
) -> Result<f64> {
    let weights = &config.materiality;
    let stage_score = config.stage_scores.score(row.investment_stage);
    let normalized_efficiency = checked_div(
        funding_per_employee(row)?,
        context.max_funding_efficiency,
        "highest funding per employee",
    )? * 100.0;
    let multiplier = *config.sector_multipliers.lookup(&row.sector);

    Ok(weights.stage * stage_score
        + weights.funding_efficiency * normalized_efficiency
        + weights.sector * multiplier * 100.0)
}

/// Impact-performance score: impact per $M raised.
pub fn impact_performance(row: &RealPortfolioRow) -> Result<f64> {
    impact_per_funding_m(row)
}

/// One company's position in the materiality grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialityPoint {
    pub company: String,
    pub sector: String,
    pub stage: InvestmentStage,
    pub financial_performance: f64,
    pub impact_performance: f64,
    pub quadrant: Quadrant,
}

/// Materiality grid for one row set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialityMatrix {
    pub median_financial: f64,
    pub median_impact: f64,
    /// One point per input row, in input order
    pub points: Vec<MaterialityPoint>,
}

impl MaterialityMatrix {
    /// Number of companies per quadrant, in a fixed quadrant order.
    pub fn quadrant_counts(&self) -> Vec<(Quadrant, usize)> {
        [
            Quadrant::Stars,
            Quadrant::ImpactLeaders,
            Quadrant::FinancialLeaders,
            Quadrant::Underperformers,
        ]
        .into_iter()
        .map(|q| (q, self.points.iter().filter(|p| p.quadrant == q).count()))
        .collect()
    }

    /// Companies in one quadrant.
    pub fn in_quadrant(&self, quadrant: Quadrant) -> impl Iterator<Item = &MaterialityPoint> {
        self.points.iter().filter(move |p| p.quadrant == quadrant)
    }

    pub fn find(&self, company: &str) -> Option<&MaterialityPoint> {
        self.points.iter().find(|p| p.company == company)
    }
}

/// Score and classify every row against the medians of `rows`.
pub fn materiality_matrix<T>(rows: &[T], config: &EngineConfig) -> Result<MaterialityMatrix>
where
    T: AsRef<RealPortfolioRow>,
{
    let context = MaterialityContext::from_rows(rows)?;

    let mut scores = Vec::with_capacity(rows.len());
    for row in rows {
        let row = row.as_ref();
        scores.push((
            row,
            financial_performance(row, &context, config)?,
            impact_performance(row)?,
        ));
    }

    let financial: Vec<f64> = scores.iter().map(|(_, f, _)| *f).collect();
    let impact: Vec<f64> = scores.iter().map(|(_, _, i)| *i).collect();
    let median_financial = median(&financial)?;
    let median_impact = median(&impact)?;

    let points = scores
        .into_iter()
        .map(|(row, fin, imp)| MaterialityPoint {
            company: row.company.clone(),
            sector: row.sector.clone(),
            stage: row.investment_stage,
            financial_performance: fin,
            impact_performance: imp,
            quadrant: classify_quadrant(fin, imp, median_financial, median_impact),
        })
        .collect();

    tracing::debug!(
        rows = rows.len(),
        median_financial,
        median_impact,
        "computed materiality matrix"
    );

    Ok(MaterialityMatrix {
        median_financial,
        median_impact,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::real_row;
    use approx::assert_relative_eq;

    // Same sector and headcount, so only stage, funding and impact move the scores.
    fn ladder() -> Vec<RealPortfolioRow> {
        vec![
            real_row("Low", "Energy", InvestmentStage::Early, 10.0, 10, 10.0),
            real_row("Mid", "Energy", InvestmentStage::Growth, 20.0, 10, 40.0),
            real_row("High", "Energy", InvestmentStage::Late, 40.0, 10, 160.0),
        ]
    }

    #[test]
    fn test_classify_quadrant_branches() {
        assert_eq!(classify_quadrant(2.0, 2.0, 1.0, 1.0), Quadrant::Stars);
        assert_eq!(classify_quadrant(0.0, 2.0, 1.0, 1.0), Quadrant::ImpactLeaders);
        assert_eq!(classify_quadrant(2.0, 0.0, 1.0, 1.0), Quadrant::FinancialLeaders);
        assert_eq!(classify_quadrant(0.0, 0.0, 1.0, 1.0), Quadrant::Underperformers);
    }

    #[test]
    fn test_equal_to_median_is_not_above() {
        assert_eq!(classify_quadrant(1.0, 1.0, 1.0, 1.0), Quadrant::Underperformers);
        assert_eq!(classify_quadrant(1.0, 2.0, 1.0, 1.0), Quadrant::ImpactLeaders);
        assert_eq!(classify_quadrant(2.0, 1.0, 1.0, 1.0), Quadrant::FinancialLeaders);
    }

    #[test]
    fn test_financial_performance_composite() {
        let rows = ladder();
        let config = EngineConfig::default();
        let context = MaterialityContext::from_rows(&rows).unwrap();
        assert_eq!(context.max_funding_efficiency, 4.0);

        // 0.4*30 + 0.3*25 + 0.3*1.2*100
        assert_relative_eq!(
            financial_performance(&rows[0], &context, &config).unwrap(),
            55.5,
            epsilon = 1e-9
        );
        // 0.4*90 + 0.3*100 + 0.3*1.2*100
        assert_relative_eq!(
            financial_performance(&rows[2], &context, &config).unwrap(),
            102.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_unknown_sector_uses_default_multiplier() {
        let rows = vec![real_row("Orbital", "Space", InvestmentStage::Early, 10.0, 10, 1.0)];
        let config = EngineConfig::default();
        let context = MaterialityContext::from_rows(&rows).unwrap();
        // 0.4*30 + 0.3*100 + 0.3*1.0*100
        assert_relative_eq!(
            financial_performance(&rows[0], &context, &config).unwrap(),
            72.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_median_row_is_underperformer() {
        let rows = ladder();
        let matrix = materiality_matrix(&rows, &EngineConfig::default()).unwrap();

        let mid = matrix.find("Mid").unwrap();
        assert_eq!(mid.financial_performance, matrix.median_financial);
        assert_eq!(mid.impact_performance, matrix.median_impact);
        assert_eq!(mid.quadrant, Quadrant::Underperformers);

        assert_eq!(matrix.find("High").unwrap().quadrant, Quadrant::Stars);
        assert_eq!(matrix.find("Low").unwrap().quadrant, Quadrant::Underperformers);
        assert_eq!(
            matrix.quadrant_counts(),
            vec![
                (Quadrant::Stars, 1),
                (Quadrant::ImpactLeaders, 0),
                (Quadrant::FinancialLeaders, 0),
                (Quadrant::Underperformers, 2),
            ]
        );
    }

    #[test]
    fn test_medians_follow_the_filtered_set() {
        let rows = ladder();
        let subset: Vec<&RealPortfolioRow> = rows.iter().take(2).collect();
        let matrix = materiality_matrix(&subset, &EngineConfig::default()).unwrap();

        assert_relative_eq!(matrix.median_impact, 1.5);
        assert_eq!(matrix.find("Mid").unwrap().quadrant, Quadrant::Stars);
        assert_eq!(matrix.in_quadrant(Quadrant::Underperformers).count(), 1);
    }

    #[test]
    fn test_mixed_quadrants() {
        let rows = vec![
            // early stage but very impact-dense
            real_row("Dense", "Carbon Removal", InvestmentStage::Early, 10.0, 10, 100.0),
            // late stage, capital heavy, little impact
            real_row("Heavy", "Energy", InvestmentStage::Late, 100.0, 10, 10.0),
            real_row("Even", "Industry", InvestmentStage::Growth, 30.0, 10, 30.0),
        ];
        let matrix = materiality_matrix(&rows, &EngineConfig::default()).unwrap();

        assert_eq!(matrix.find("Dense").unwrap().quadrant, Quadrant::ImpactLeaders);
        assert_eq!(matrix.find("Heavy").unwrap().quadrant, Quadrant::FinancialLeaders);
        assert_eq!(matrix.find("Even").unwrap().quadrant, Quadrant::Underperformers);
    }

    #[test]
    fn test_empty_set() {
        let rows: Vec<RealPortfolioRow> = Vec::new();
        assert!(matches!(
            materiality_matrix(&rows, &EngineConfig::default()),
            Err(Error::EmptyPortfolio(_))
        ));
    }
}
