//! Engine configuration: benchmark tables, composite weights and thresholds.
//!
//! The built-in values are demo constants for the materiality composite and the sector
//! benchmark comparison, not validated business figures. Every one of them can be
//! overridden from a TOML file; keys left out keep their default.

use crate::types::InvestmentStage;
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "IMPACT_METRICS_CONFIG";

/// Per-sector lookup table with an explicit fallback for sectors it does not know.
///
/// When read from TOML, a table is applied on top of the built-in one: `default` is
/// optional and listed sectors are added to (or replace) the built-in entries.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectorTable<T> {
    /// Value used for any sector missing from `sectors`
    pub default: T,
    /// Values keyed by sector name
    pub sectors: BTreeMap<String, T>,
}

/// The shape of a sector table in a configuration file.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct SectorTableOverrides<T> {
    default: Option<T>,
    #[serde(default = "BTreeMap::new")]
    sectors: BTreeMap<String, T>,
}

impl<'de, T> Deserialize<'de> for SectorTable<T>
where
    T: Deserialize<'de>,
    SectorTable<T>: Default,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let overrides = SectorTableOverrides::<T>::deserialize(deserializer)?;
        let mut table = Self::default();
        if let Some(default) = overrides.default {
            table.default = default;
        }
        for (sector, value) in overrides.sectors {
            table.insert(sector, value);
        }
        Ok(table)
    }
}

impl<T> SectorTable<T> {
    pub fn new(default: T) -> Self {
        Self {
            default,
            sectors: BTreeMap::new(),
        }
    }

    pub fn with(mut self, sector: &str, value: T) -> Self {
        self.insert(sector.to_string(), value);
        self
    }

    /// Set a sector's value, replacing any entry whose name differs only in case.
    pub fn insert(&mut self, sector: String, value: T) {
        self.sectors.retain(|name, _| !name.eq_ignore_ascii_case(&sector));
        self.sectors.insert(sector, value);
    }

    /// Look up a sector, ignoring case. Unknown sectors get the default entry.
    pub fn lookup(&self, sector: &str) -> &T {
        if let Some(value) = self.sectors.get(sector) {
            return value;
        }
        self.sectors
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(sector))
            .map(|(_, value)| value)
            .unwrap_or_else(|| {
                tracing::debug!(sector, "unknown sector, using default table entry");
                &self.default
            })
    }

    /// Whether the sector has its own entry.
    pub fn contains(&self, sector: &str) -> bool {
        self.sectors
            .keys()
            .any(|name| name.eq_ignore_ascii_case(sector))
    }
}

/// Industry reference ratios for one sector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SectorBenchmark {
    /// Thousand tCO2e avoided per employee
    pub impact_per_employee: f64,
    /// Thousand tCO2e avoided per $M raised
    pub impact_per_funding: f64,
    /// Typical headcount
    pub employees_per_company: f64,
}

impl SectorBenchmark {
    pub const fn new(impact_per_employee: f64, impact_per_funding: f64, employees: f64) -> Self {
        Self {
            impact_per_employee,
            impact_per_funding,
            employees_per_company: employees,
        }
    }
}

/// Sector benchmark table.
pub type SectorBenchmarks = SectorTable<SectorBenchmark>;

/// Benchmark tuple applied to sectors missing from the table.
pub const DEFAULT_SECTOR_BENCHMARK: SectorBenchmark = SectorBenchmark::new(2.0, 5.0, 100.0);

impl Default for SectorTable<SectorBenchmark> {
    fn default() -> Self {
        SectorTable::new(DEFAULT_SECTOR_BENCHMARK)
            .with("Energy", SectorBenchmark::new(5.0, 8.0, 120.0))
            .with("Transportation", SectorBenchmark::new(2.5, 4.0, 150.0))
            .with("Carbon Removal", SectorBenchmark::new(1.5, 2.5, 80.0))
            .with("Agriculture", SectorBenchmark::new(3.0, 10.0, 60.0))
            .with("Industry", SectorBenchmark::new(4.0, 6.0, 140.0))
            .with("Buildings", SectorBenchmark::new(2.0, 5.0, 90.0))
            .with("Climate Data", SectorBenchmark::new(1.0, 6.0, 70.0))
    }
}

/// Sector multiplier applied to companies in sectors missing from the table.
pub const DEFAULT_SECTOR_MULTIPLIER: f64 = 1.0;

impl Default for SectorTable<f64> {
    fn default() -> Self {
        SectorTable::new(DEFAULT_SECTOR_MULTIPLIER)
            .with("Energy", 1.2)
            .with("Transportation", 1.1)
            .with("Carbon Removal", 0.8)
            .with("Agriculture", 0.9)
            .with("Industry", 1.0)
            .with("Buildings", 1.0)
            .with("Climate Data", 1.15)
    }
}

/// Weights of the synthetic financial-performance composite.
///
/// Placeholder demo weights (0.4 stage / 0.3 funding efficiency / 0.3 sector), kept
/// configurable because nothing validates them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaterialityWeights {
    pub stage: f64,
    pub funding_efficiency: f64,
    pub sector: f64,
}

impl Default for MaterialityWeights {
    fn default() -> Self {
        Self {
            stage: 0.4,
            funding_efficiency: 0.3,
            sector: 0.3,
        }
    }
}

/// Score assigned to each investment stage inside the financial composite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageScores {
    pub early: f64,
    pub growth: f64,
    pub late: f64,
}

impl StageScores {
    pub fn score(&self, stage: InvestmentStage) -> f64 {
        match stage {
            InvestmentStage::Early => self.early,
            InvestmentStage::Growth => self.growth,
            InvestmentStage::Late => self.late,
        }
    }
}

impl Default for StageScores {
    fn default() -> Self {
        Self {
            early: 30.0,
            growth: 70.0,
            late: 90.0,
        }
    }
}

/// Cut-offs behind the thesis insight counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThesisThresholds {
    /// Minimum Hardware+Software score for a "leader"
    pub hardware_software_min: u8,
    /// Capital Efficiency score counted as a "champion"
    pub capital_efficiency_exact: u8,
    /// Minimum Data Markets score for a "player"
    pub data_markets_min: u8,
}

impl Default for ThesisThresholds {
    fn default() -> Self {
        Self {
            hardware_software_min: 2,
            capital_efficiency_exact: 3,
            data_markets_min: 2,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// IRR (%) above which a sandbox company counts as high-IRR
    pub high_irr_threshold: f64,
    pub materiality: MaterialityWeights,
    pub stage_scores: StageScores,
    pub thesis: ThesisThresholds,
    pub sector_multipliers: SectorTable<f64>,
    pub sector_benchmarks: SectorBenchmarks,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            high_irr_threshold: 20.0,
            materiality: MaterialityWeights::default(),
            stage_scores: StageScores::default(),
            thesis: ThesisThresholds::default(),
            sector_multipliers: SectorTable::<f64>::default(),
            sector_benchmarks: SectorBenchmarks::default(),
        }
    }
}

impl EngineConfig {
    /// Get the default configuration file path.
    ///
    /// Default path: `<config dir>/impact-metrics/config.toml`
    /// Can be overridden with the `IMPACT_METRICS_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("impact-metrics/config.toml"))
            .unwrap_or_else(|| PathBuf::from("impact-metrics.toml"))
    }

    /// Load configuration from a file. A missing file yields the built-in defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::tempdir;

    #[test]
    fn test_default_weights() {
        let config = EngineConfig::default();
        assert_eq!(config.materiality.stage, 0.4);
        assert_eq!(config.materiality.funding_efficiency, 0.3);
        assert_eq!(config.materiality.sector, 0.3);
        assert_eq!(config.stage_scores.score(InvestmentStage::Early), 30.0);
        assert_eq!(config.stage_scores.score(InvestmentStage::Growth), 70.0);
        assert_eq!(config.stage_scores.score(InvestmentStage::Late), 90.0);
    }

    #[test]
    fn test_unknown_sector_falls_back() {
        let benchmarks = SectorBenchmarks::default();
        assert_eq!(*benchmarks.lookup("Space Mining"), DEFAULT_SECTOR_BENCHMARK);
        assert!(!benchmarks.contains("Space Mining"));

        let multipliers = SectorTable::<f64>::default();
        assert_eq!(*multipliers.lookup("Space Mining"), DEFAULT_SECTOR_MULTIPLIER);
    }

    #[test]
    fn test_sector_lookup_case_insensitive() {
        let benchmarks = SectorBenchmarks::default();
        assert_eq!(benchmarks.lookup("energy").impact_per_employee, 5.0);
        assert!(benchmarks.contains("ENERGY"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            high_irr_threshold = 25.0

            [materiality]
            stage = 0.5

            [sector_multipliers]
            default = 0.7

            [sector_multipliers.sectors]
            Hydrogen = 1.4
            "#,
        )
        .unwrap();

        assert_eq!(config.high_irr_threshold, 25.0);
        assert_eq!(config.materiality.stage, 0.5);
        assert_eq!(config.materiality.sector, 0.3);
        assert_eq!(*config.sector_multipliers.lookup("Hydrogen"), 1.4);
        assert_eq!(*config.sector_multipliers.lookup("Energy"), 1.2);
        assert_eq!(*config.sector_multipliers.lookup("Space Mining"), 0.7);
        assert_eq!(config.sector_benchmarks, SectorBenchmarks::default());
    }

    #[test]
    fn test_sector_override_without_default() {
        let config = EngineConfig::from_toml(
            r#"
            [sector_multipliers.sectors]
            Hydrogen = 1.4
            "#,
        )
        .unwrap();

        assert_eq!(*config.sector_multipliers.lookup("Hydrogen"), 1.4);
        assert_eq!(*config.sector_multipliers.lookup("Energy"), 1.2);
        assert_eq!(*config.sector_multipliers.lookup("Climate Data"), 1.15);
        assert_eq!(
            *config.sector_multipliers.lookup("Space Mining"),
            DEFAULT_SECTOR_MULTIPLIER
        );
    }

    #[test]
    fn test_sector_override_replaces_builtin_entry() {
        let config = EngineConfig::from_toml(
            r#"
            [sector_benchmarks.sectors.energy]
            impact_per_employee = 6.0
            impact_per_funding = 9.0
            employees_per_company = 110.0
            "#,
        )
        .unwrap();

        let benchmarks = &config.sector_benchmarks;
        assert_eq!(benchmarks.lookup("Energy").impact_per_employee, 6.0);
        assert_eq!(benchmarks.sectors.len(), SectorBenchmarks::default().sectors.len());
        assert_eq!(benchmarks.lookup("Industry").impact_per_employee, 4.0);
        assert_eq!(benchmarks.default, DEFAULT_SECTOR_BENCHMARK);
    }

    #[test]
    fn test_invalid_toml() {
        let result = EngineConfig::from_toml("high_irr_threshold = \"high\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[stage_scores]\nearly = 10.0\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.stage_scores.early, 10.0);
        assert_eq!(config.stage_scores.late, 90.0);
    }
}
