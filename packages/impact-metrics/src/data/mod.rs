//! Dataset loading and row filtering.
//!
//! Rows are validated once at load time so ratio computations never see a zero
//! denominator from a well-formed dataset.

mod filter;
mod loader;

pub use filter::{FilterOptions, PortfolioFilter};
pub use loader::{
    load_real_portfolio, load_sandbox, load_thesis, read_real_portfolio, read_sandbox,
    read_thesis, LoadReport, RejectedRow, Validate, REAL_PORTFOLIO_FILE, SANDBOX_FILE,
    THESIS_FILE,
};
