//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, date parsing)
//! - `import` - CSV import and import history
//! - `reports` - Monthly metrics and insight tables
//! - `forecast` - Forecast tables, chart rows and JSON output
//! - `audit` - Audit log viewer
//! - `serve` - Web server command

pub mod audit;
pub mod core;
pub mod forecast;
pub mod import;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use audit::*;
pub use core::*;
pub use forecast::*;
pub use import::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an optional percentage for tables
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.1}%", v),
        None => "-".to_string(),
    }
}
