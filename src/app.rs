//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches FRED data (or the offline samples)
//! - runs curve fitting / the correlation study
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, CurveArgs, PcaArgs, PlotArgs};
use crate::domain::{CurveConfig, PcaConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `tsy` binary.
pub fn run() -> Result<(), AppError> {
    // We want `tsy` and `tsy --offline` to behave like `tsy curve ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Curve(args) => handle_curve(args),
        Command::Pca(args) => handle_pca(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_curve(args: CurveArgs) -> Result<(), AppError> {
    let config = curve_config_from_args(&args);
    let run = pipeline::run_curve(&config)?;

    println!(
        "{}",
        crate::report::format_curve_summary(&run.snapshot, &run.curve, &run.points)
    );

    if config.plot {
        let plot = crate::plot::render_curve_plot(
            &run.points,
            &run.curve,
            Some(&run.spline),
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export_results {
        crate::io::write_results_csv(path, &run.points, run.snapshot.date)?;
    }
    if let Some(path) = &config.export_curve {
        crate::io::write_curve_json(path, &run.curve, &run.snapshot)?;
    }
    if let Some(path) = &config.svg {
        crate::plot::write_curve_svg(path, &run.points, &run.curve, Some(&run.spline))?;
    }

    Ok(())
}

fn handle_pca(args: PcaArgs) -> Result<(), AppError> {
    let config = pca_config_from_args(&args);
    let run = pipeline::run_pca(&config)?;

    println!(
        "{}",
        crate::report::format_pca_summary(&run.synthetic, &run.real, &run.panel)
    );

    if config.plot {
        println!(
            "{}",
            crate::plot::render_scree_plot(
                "Synthetic scree",
                &run.synthetic,
                config.plot_width,
                config.plot_height
            )
        );
        println!(
            "{}",
            crate::plot::render_scree_plot(
                "Yield-change scree",
                &run.real,
                config.plot_width,
                config.plot_height
            )
        );
    }

    if let Some(path) = &config.export_panel {
        crate::io::write_panel_csv(path, &run.panel)?;
    }
    if let Some(path) = &config.svg {
        crate::plot::write_scree_svg(path, &run.synthetic, &run.real)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::read_curve_json(&args.curve)?;
    let plot = crate::plot::render_curve_file_plot(&curve, args.width, args.height);
    println!("{plot}");
    Ok(())
}

pub fn curve_config_from_args(args: &CurveArgs) -> CurveConfig {
    CurveConfig {
        offline: args.offline,
        asof_date: args.date,
        tau_min: args.tau_min,
        tau_max: args.tau_max,
        tau_steps: args.tau_steps,
        max_condition: args.max_condition,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_curve: args.export_curve.clone(),
        svg: args.svg.clone(),
    }
}

pub fn pca_config_from_args(args: &PcaArgs) -> PcaConfig {
    PcaConfig {
        offline: args.offline,
        window_months: args.months,
        synthetic_samples: args.samples,
        synthetic_vars: args.vars,
        synthetic_sd: args.sd,
        seed: args.seed,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_panel: args.export_panel.clone(),
        svg: args.svg.clone(),
    }
}

/// Rewrite argv so `tsy` defaults to `tsy curve`.
///
/// Rules:
/// - `tsy`                     -> `tsy curve`
/// - `tsy --offline ...`       -> `tsy curve --offline ...`
/// - `tsy --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("curve".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "curve" | "pca" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "curve flags".
    if arg1.starts_with('-') {
        argv.insert(1, "curve".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_curve() {
        assert_eq!(rewrite_args(v(&["tsy"])), v(&["tsy", "curve"]));
        assert_eq!(
            rewrite_args(v(&["tsy", "--offline"])),
            v(&["tsy", "curve", "--offline"])
        );
    }

    #[test]
    fn explicit_subcommands_pass_through() {
        assert_eq!(rewrite_args(v(&["tsy", "pca"])), v(&["tsy", "pca"]));
        assert_eq!(rewrite_args(v(&["tsy", "--help"])), v(&["tsy", "--help"]));
    }
}
