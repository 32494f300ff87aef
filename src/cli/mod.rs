//! Command-line parsing for the Treasury curve tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tsy", version, about = "Treasury Yield Curve Lab (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the latest Treasury curve, fit Nelson-Siegel and a cubic spline,
    /// print the comparison, and optionally plot/export.
    Curve(CurveArgs),
    /// Run the correlation/PCA study on synthetic data and daily yield changes.
    Pca(PcaArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
}

/// Options for curve fitting.
#[derive(Debug, Parser, Clone)]
pub struct CurveArgs {
    /// Use the built-in sample snapshot instead of fetching from FRED.
    #[arg(long)]
    pub offline: bool,

    /// Fetch the curve as of this date (YYYY-MM-DD) instead of the latest.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Minimum tau (years) for the grid search.
    #[arg(long, default_value_t = 0.05)]
    pub tau_min: f64,

    /// Maximum tau (years) for the grid search.
    #[arg(long, default_value_t = 30.0)]
    pub tau_max: f64,

    /// Tau grid steps.
    #[arg(long, default_value_t = 60)]
    pub tau_steps: usize,

    /// Condition-number ceiling for the inner least-squares solve.
    #[arg(long, default_value_t = 1e12)]
    pub max_condition: f64,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-tenor results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export curve (params + fitted grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,

    /// Write the comparison chart to an SVG file.
    #[arg(long)]
    pub svg: Option<PathBuf>,
}

/// Options for the correlation/PCA study.
#[derive(Debug, Parser, Clone)]
pub struct PcaArgs {
    /// Use the built-in sample panel instead of fetching from FRED.
    #[arg(long)]
    pub offline: bool,

    /// Trailing window of daily yields, in months.
    #[arg(long, default_value_t = 6)]
    pub months: u32,

    /// Synthetic panel: number of samples.
    #[arg(long, default_value_t = 100)]
    pub samples: usize,

    /// Synthetic panel: number of variables.
    #[arg(long, default_value_t = 5)]
    pub vars: usize,

    /// Synthetic panel: standard deviation of the Gaussian draws.
    #[arg(long, default_value_t = 0.01)]
    pub sd: f64,

    /// Random seed for the synthetic panel (and the offline sample panel).
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Render ASCII scree plots in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,

    /// Write the fetched yield panel to CSV.
    #[arg(long = "export-panel")]
    pub export_panel: Option<PathBuf>,

    /// Write the scree chart to an SVG file.
    #[arg(long)]
    pub svg: Option<PathBuf>,
}

/// Options for plotting a saved curve.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `tsy curve --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
