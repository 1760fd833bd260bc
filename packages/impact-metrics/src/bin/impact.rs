//! Impact CLI - Command line interface over the portfolio metrics engine.
//!
//! Every command prints a JSON `ApiResponse` on stdout; logs go to stderr.

use clap::{Args, Parser, Subcommand};
use impact_metrics::{
    data::{
        load_real_portfolio, load_sandbox, load_thesis, FilterOptions, LoadReport,
        PortfolioFilter, REAL_PORTFOLIO_FILE, SANDBOX_FILE, THESIS_FILE,
    },
    metrics::{
        benchmark_against_portfolio, benchmark_against_sector, benchmark_sandbox_company,
        impact_efficiency_sandbox, materiality_matrix, risk_return_points, sector_attribution,
        CompanyRatios, RealPortfolioSummary, SandboxOverview,
    },
    thesis::{criteria_totals, top_n, ScoredCompany, ThesisInsights},
    ApiResponse, EngineConfig, Error, InvestmentStage, RealPortfolioRow, Result,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "impact")]
#[command(about = "Impact CLI - climate portfolio ratios, benchmarks and materiality")]
#[command(version)]
struct Cli {
    /// Directory containing the three CSV datasets
    #[arg(short, long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Real portfolio commands
    Real {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(subcommand)]
        action: RealAction,
    },
    /// Sandbox portfolio commands
    Sandbox {
        #[command(subcommand)]
        action: SandboxAction,
    },
    /// Investment thesis commands
    Thesis {
        #[command(subcommand)]
        action: ThesisAction,
    },
    /// Engine configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Only companies in this sector
    #[arg(long, global = true)]
    sector: Option<String>,
    /// Only companies at this stage (early, growth, late)
    #[arg(long, global = true)]
    stage: Option<InvestmentStage>,
    /// Case-insensitive search in company names and notes
    #[arg(long, global = true)]
    search: Option<String>,
}

impl FilterArgs {
    fn into_filter(self) -> PortfolioFilter {
        PortfolioFilter {
            sector: self.sector,
            stage: self.stage,
            search: self.search,
        }
    }
}

#[derive(Subcommand)]
enum RealAction {
    /// Portfolio totals
    Summary,
    /// Funding and impact by sector
    Sectors,
    /// Ratios and benchmarks for one company
    Company {
        /// Company name
        #[arg(short, long)]
        name: String,
    },
    /// Financial/impact materiality quadrants
    Materiality,
    /// Available sector and stage filter values
    Options,
}

#[derive(Subcommand)]
enum SandboxAction {
    /// Portfolio overview metrics
    Overview,
    /// Drill-down for one company
    Company {
        /// Company name
        #[arg(short, long)]
        name: String,
    },
    /// Risk/return positioning
    Risk,
}

#[derive(Subcommand)]
enum ThesisAction {
    /// Scoring table with totals
    Scores,
    /// Highest scoring companies
    Top {
        /// Number of companies
        #[arg(short, long, default_value = "7")]
        n: usize,
    },
    /// Threshold counts per criterion
    Insights,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    let config_path = cli.config.unwrap_or_else(EngineConfig::default_path);
    let data_dir = cli.data_dir;
    let output = match cli.command {
        Commands::Real { filter, action } => with_config(&config_path, |config| {
            handle_real(action, filter.into_filter(), &data_dir, config)
        }),
        Commands::Sandbox { action } => {
            with_config(&config_path, |config| handle_sandbox(action, &data_dir, config))
        }
        Commands::Thesis { action } => {
            with_config(&config_path, |config| handle_thesis(action, &data_dir, config))
        }
        Commands::Config { action } => handle_config(action, &config_path),
    };

    println!("{}", output);
    Ok(())
}

fn with_config(path: &Path, handler: impl FnOnce(&EngineConfig) -> String) -> String {
    match EngineConfig::load(path) {
        Ok(config) => handler(&config),
        Err(e) => render::<()>(Err(e)),
    }
}

fn render<T: Serialize>(result: Result<T>) -> String {
    let rendered = match result {
        Ok(data) => serde_json::to_string_pretty(&ApiResponse::ok(data)),
        Err(e) => serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string())),
    };
    rendered.unwrap_or_else(|e| format!("{{\"ok\": false, \"error\": \"{}\"}}", e))
}

fn rejected_summary<T>(report: &LoadReport<T>) -> Value {
    json!({
        "rows": report.rows.len(),
        "rejected": report.rejected,
        "loaded_at": report.loaded_at,
    })
}

fn find_company<'a, T>(rows: &'a [T], name: &str, company: impl Fn(&T) -> &str) -> Result<&'a T> {
    rows.iter()
        .find(|row| company(*row).eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::NotFound(name.to_string()))
}

fn handle_real(
    action: RealAction,
    filter: PortfolioFilter,
    data_dir: &Path,
    config: &EngineConfig,
) -> String {
    let report = match load_real_portfolio(data_dir.join(REAL_PORTFOLIO_FILE)) {
        Ok(report) => report,
        Err(e) => return render::<()>(Err(e)),
    };
    let rows: Vec<&RealPortfolioRow> = filter.apply(&report.rows);

    let result = match action {
        RealAction::Summary => RealPortfolioSummary::from_rows(&rows).map(|summary| {
            json!({
                "filter": filter,
                "summary": summary,
                "dataset": rejected_summary(&report),
            })
        }),
        RealAction::Sectors => sector_attribution(&rows).map(|attribution| {
            json!({
                "filter": filter,
                "sectors": attribution,
            })
        }),
        RealAction::Company { name } => {
            find_company(&rows, &name, |r| r.company.as_str()).and_then(|row| {
                Ok(json!({
                    "company": row,
                    "ratios": CompanyRatios::for_row(row)?,
                    "vs_portfolio": benchmark_against_portfolio(row, &rows)?,
                    "vs_sector": benchmark_against_sector(row, config)?,
                }))
            })
        }
        RealAction::Materiality => materiality_matrix(&rows, config).map(|matrix| {
            json!({
                "filter": filter,
                "quadrant_counts": matrix.quadrant_counts(),
                "matrix": matrix,
            })
        }),
        RealAction::Options => Ok(json!(FilterOptions::from_rows(&report.rows))),
    };

    render(result)
}

fn handle_sandbox(action: SandboxAction, data_dir: &Path, config: &EngineConfig) -> String {
    let report = match load_sandbox(data_dir.join(SANDBOX_FILE)) {
        Ok(report) => report,
        Err(e) => return render::<()>(Err(e)),
    };
    let rows = &report.rows;

    let result = match action {
        SandboxAction::Overview => {
            SandboxOverview::from_rows(rows, config.high_irr_threshold).map(|overview| {
                json!({
                    "overview": overview,
                    "dataset": rejected_summary(&report),
                })
            })
        }
        SandboxAction::Company { name } => {
            find_company(rows, &name, |r| r.company.as_str()).and_then(|row| {
                Ok(json!({
                    "company": row,
                    "impact_efficiency": impact_efficiency_sandbox(row)?,
                    "vs_portfolio": benchmark_sandbox_company(row, rows)?,
                }))
            })
        }
        SandboxAction::Risk => Ok(json!({
            "points": risk_return_points(rows),
        })),
    };

    render(result)
}

fn handle_thesis(action: ThesisAction, data_dir: &Path, config: &EngineConfig) -> String {
    let report = match load_thesis(data_dir.join(THESIS_FILE)) {
        Ok(report) => report,
        Err(e) => return render::<()>(Err(e)),
    };
    let rows = &report.rows;

    let result: Result<Value> = match action {
        ThesisAction::Scores => {
            let scored: Vec<ScoredCompany> = rows.iter().map(ScoredCompany::from).collect();
            Ok(json!({
                "companies": scored,
                "criteria_totals": criteria_totals(rows),
                "dataset": rejected_summary(&report),
            }))
        }
        ThesisAction::Top { n } => {
            let top: Vec<ScoredCompany> = top_n(rows, n)
                .into_iter()
                .map(ScoredCompany::from)
                .collect();
            Ok(json!({ "top": top }))
        }
        ThesisAction::Insights => Ok(json!(ThesisInsights::from_rows(rows, &config.thesis))),
    };

    render(result)
}

fn handle_config(action: ConfigAction, path: &Path) -> String {
    match action {
        ConfigAction::Show => render(EngineConfig::load(path)),
        ConfigAction::Path => render::<Value>(Ok(json!({
            "path": path,
            "exists": path.exists(),
        }))),
    }
}
