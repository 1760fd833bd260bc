//! Equality and search filters over the real portfolio.

use crate::types::{InvestmentStage, RealPortfolioRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// User-selected narrowing of the real portfolio. `None` means "All".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<InvestmentStage>,
    /// Case-insensitive substring matched against company name or notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl PortfolioFilter {
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_stage(mut self, stage: InvestmentStage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Whether a single row passes every active predicate.
    pub fn matches(&self, row: &RealPortfolioRow) -> bool {
        if let Some(sector) = &self.sector {
            if &row.sector != sector {
                return false;
            }
        }
        if let Some(stage) = self.stage {
            if row.investment_stage != stage {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                row.company.to_lowercase().contains(&term)
                    || row.notes.to_lowercase().contains(&term)
            }
        }
    }

    /// Rows that pass the filter, in input order.
    pub fn apply<'a>(&self, rows: &'a [RealPortfolioRow]) -> Vec<&'a RealPortfolioRow> {
        let filtered: Vec<_> = rows.iter().filter(|row| self.matches(row)).collect();
        tracing::debug!(
            filter = ?self,
            matched = filtered.len(),
            total = rows.len(),
            "applied portfolio filter"
        );
        filtered
    }

    /// Owned copy of the rows that pass the filter.
    pub fn apply_owned(&self, rows: &[RealPortfolioRow]) -> Vec<RealPortfolioRow> {
        self.apply(rows).into_iter().cloned().collect()
    }
}

/// Distinct values available for the sector and stage selectors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterOptions {
    pub sectors: Vec<String>,
    pub stages: Vec<InvestmentStage>,
}

impl FilterOptions {
    /// Collect sorted distinct sectors and stages present in the rows.
    pub fn from_rows(rows: &[RealPortfolioRow]) -> Self {
        let sectors: BTreeSet<&str> = rows.iter().map(|r| r.sector.as_str()).collect();
        let stages: BTreeSet<InvestmentStage> = rows.iter().map(|r| r.investment_stage).collect();

        Self {
            sectors: sectors.into_iter().map(str::to_string).collect(),
            stages: stages.into_iter().collect(),
        }
    }
}
