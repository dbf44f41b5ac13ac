use std::path::{Path, PathBuf};

use ap_app::{
    AdsorbateStatus, AppResult, ModelFamily, RunOptions, RunRequest, model_catalog, run_service,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ap-cli")]
#[command(about = "Adsorption-potential predictions from measured or fitted isotherms", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build characteristic curves and run every prediction in a configuration
    Run {
        /// Path to the run configuration (YAML or JSON)
        config_path: PathBuf,
        /// Write outputs here instead of the configured output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Compute without writing any files
        #[arg(long)]
        dry_run: bool,
    },
    /// Load and resolve a configuration without computing
    Validate {
        /// Path to the run configuration (YAML or JSON)
        config_path: PathBuf,
    },
    /// List isotherm, saturation-pressure and density models
    Models,
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config_path,
            output,
            dry_run,
        } => cmd_run(&config_path, output, dry_run),
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Models => {
            cmd_models();
            Ok(())
        }
    }
}

fn cmd_run(config_path: &Path, output: Option<PathBuf>, dry_run: bool) -> AppResult<()> {
    println!("Running: {}", config_path.display());
    let request = RunRequest {
        config_path,
        options: RunOptions {
            write_outputs: !dry_run,
            output_directory: output,
        },
    };
    let report = run_service::run(&request)?;

    for adsorbate in &report.adsorbates {
        match &adsorbate.status {
            AdsorbateStatus::Completed(summary) => {
                println!(
                    "✓ {}: curve with {} points (A_max = {:.3} kJ/mol)",
                    adsorbate.name, summary.curve_points, summary.max_potential
                );
                for prediction in &summary.predictions {
                    println!("    {} {}: {} points", prediction.kind, prediction.name, prediction.points);
                }
                if !summary.files.is_empty() {
                    println!("    {} files written", summary.files.len());
                }
            }
            AdsorbateStatus::Failed { error } => println!("✗ {}: {error}", adsorbate.name),
        }
        for diagnostic in &adsorbate.diagnostics {
            println!("    warning: {diagnostic}");
        }
    }

    println!(
        "{} completed, {} failed, {} warnings in {:.2} s",
        report.completed(),
        report.failed(),
        report.warnings(),
        report.total_time_s
    );
    Ok(())
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating: {}", config_path.display());
    let report = run_service::validate(config_path)?;
    for (name, status) in &report.adsorbates {
        match status {
            Ok((datasets, predictions)) => {
                println!("✓ {name}: {datasets} datasets, {predictions} predictions")
            }
            Err(error) => println!("✗ {name}: {error}"),
        }
    }
    if report.is_valid() {
        println!("✓ Configuration is valid");
    }
    Ok(())
}

fn cmd_models() {
    let catalog = model_catalog();
    for family in [ModelFamily::Isotherm, ModelFamily::SaturationPressure, ModelFamily::Density] {
        println!("{}:", family.name());
        for entry in catalog.iter().filter(|e| e.family == family) {
            let sites = if entry.multi_site { " (per site)" } else { "" };
            if entry.parameters.is_empty() {
                println!("  {}", entry.name);
            } else {
                println!("  {} [{}]{sites}", entry.name, entry.parameters.join(", "));
            }
        }
    }
}
