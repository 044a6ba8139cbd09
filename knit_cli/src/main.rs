//! # Purlwise CLI
//!
//! Terminal front end for `knit_core`: validate pattern documents, run the
//! full calculation, or use the repeat fitter, dimension converter and yarn
//! estimator on their own.
//!
//! ```text
//! knit validate sweater.json
//! knit calculate sweater.json --output sweater.calculated.json
//! knit repeat --target 100 --repeat 8 --edge 3
//! knit convert --dimension 50 --stitches 22 --rows 30
//! knit yarn estimate.json --json
//! ```

mod logger;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use knit_core::calculations::conversion::convert_dimension;
use knit_core::calculations::pattern::calculate_pattern;
use knit_core::calculations::repeat::{integrate_repeat, RepeatIntegrationInput};
use knit_core::calculations::yarn_estimate::{estimate_yarn, YarnEstimateInput};
use knit_core::errors::{PatternError, PatternResult};
use knit_core::file_io::{load_json, load_pattern, read_document, save_json};
use knit_core::model::GaugeData;
use knit_core::profiles::NoProfiles;
use knit_core::settings::{load_settings, CalculationSettings};
use knit_core::units::LengthUnit;
use knit_core::validation::{validate_json, validate_repeat_request, validate_yarn_estimate, ValidationIssue, ValidationReport};

#[derive(Parser, Debug)]
#[command(name = "knit")]
#[command(author, version, about = "Knitting pattern calculations", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Calculation settings (TOML)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a pattern document without calculating
    Validate {
        /// Pattern document (JSON)
        pattern: PathBuf,
    },

    /// Calculate every component of a pattern
    Calculate {
        /// Pattern document (JSON)
        pattern: PathBuf,

        /// Also write the calculated details to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fit a stitch-pattern repeat into a stitch count
    Repeat {
        /// Stitches available, edges included
        #[arg(long)]
        target: u32,

        /// Stitches in one pattern repeat
        #[arg(long)]
        repeat: u32,

        /// Plain edge stitches each side
        #[arg(long, default_value_t = 0)]
        edge: u32,

        /// Pattern name used in descriptions
        #[arg(long, default_value = "pattern")]
        name: String,
    },

    /// Convert a length into stitches and rows
    Convert {
        /// Length to convert
        #[arg(long)]
        dimension: f64,

        /// Stitches per 10 cm
        #[arg(long)]
        stitches: f64,

        /// Rows per 10 cm
        #[arg(long)]
        rows: f64,

        /// Unit of the dimension
        #[arg(long, value_enum, default_value_t = UnitArg::Cm)]
        unit: UnitArg,
    },

    /// Estimate yarn for a project
    Yarn {
        /// Estimate request (JSON)
        request: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitArg {
    Cm,
    Inch,
}

impl From<UnitArg> for LengthUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Cm => LengthUnit::Cm,
            UnitArg::Inch => LengthUnit::Inch,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{}", e);
            eprintln!("Error: {}", e);
            if let PatternError::ValidationFailed { .. } = e {
                for message in e.messages() {
                    eprintln!("  - {}", message);
                }
            }
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when a validated document has errors
fn run(cli: &Cli) -> PatternResult<bool> {
    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => CalculationSettings::default(),
    };

    match &cli.command {
        Commands::Validate { pattern } => validate(pattern, &settings, cli.json),
        Commands::Calculate { pattern, output } => calculate(pattern, output.as_deref(), &settings, cli.json),
        Commands::Repeat {
            target,
            repeat,
            edge,
            name,
        } => {
            let input = RepeatIntegrationInput::new(*target, *repeat, *edge, name.clone());
            let warnings = validate_repeat_request(&input, &settings).into_result()?;
            let layout = integrate_repeat(&input)?;
            if cli.json {
                print_json(&layout)?;
            } else {
                println!("Repeat layout: {} ({}-stitch repeat)", name, repeat);
                println!("  Available for pattern: {} sts", layout.available_width_for_pattern);
                println!(
                    "  Full repeats:          {} ({} sts)",
                    layout.full_repeats, layout.stitches_used_by_repeats
                );
                println!("  Remaining:             {} sts", layout.remaining_stitches);
                println!("  Suggested cast-on:     {} sts", layout.suggested_adjusted_stitch_count);
                println!();
                for option in &layout.options {
                    println!("  [{:?}] {}", option.option_type, option.description);
                }
                print_warnings(&warnings);
            }
            Ok(true)
        }
        Commands::Convert {
            dimension,
            stitches,
            rows,
            unit,
        } => {
            let unit = LengthUnit::from(*unit);
            let counts = convert_dimension(*dimension, unit, &GaugeData::new(*stitches, *rows))?;
            if cli.json {
                print_json(&counts)?;
            } else {
                println!(
                    "{} {} at {} sts / {} rows per 10 cm = {} stitches, {} rows",
                    dimension,
                    unit.abbreviation(),
                    stitches,
                    rows,
                    counts.stitches,
                    counts.rows
                );
            }
            Ok(true)
        }
        Commands::Yarn { request } => {
            let input: YarnEstimateInput = load_json(request)?;
            let warnings = validate_yarn_estimate(&input, &settings).into_result()?;
            let estimate = estimate_yarn(&input, &settings, &NoProfiles)?;
            if cli.json {
                print_json(&estimate)?;
            } else {
                println!("Yarn estimate ({})", input.project.project_type.as_str());
                println!("  Surface area:  {:.4} m2", estimate.surface_area_m2);
                println!(
                    "  Base length:   {:.2} m ({} m/m2)",
                    estimate.base_length_meters, estimate.yarn_factor_used
                );
                println!(
                    "  Total length:  {:.2} m (+{}% buffer)",
                    estimate.total_length_meters, estimate.buffer_percentage
                );
                if estimate.total_weight_grams > 0.0 {
                    println!("  Total weight:  {:.2} g", estimate.total_weight_grams);
                }
                println!("  Skeins:        {}", estimate.number_of_skeins);
                for note in &estimate.notes {
                    println!("  Note: {}", note);
                }
                print_warnings(&warnings);
            }
            Ok(true)
        }
    }
}

fn validate(path: &Path, settings: &CalculationSettings, json: bool) -> PatternResult<bool> {
    let text = read_document(path)?;
    let (report, _) = validate_json(&text, settings);
    print_report(&report, json)?;
    Ok(report.is_valid)
}

fn calculate(path: &Path, output: Option<&Path>, settings: &CalculationSettings, json: bool) -> PatternResult<bool> {
    let definition = load_pattern(path)?;
    let details = calculate_pattern(&definition, settings)?;

    if let Some(output) = output {
        save_json(&details, output)?;
        tracing::info!(path = %output.display(), "wrote calculated pattern");
    }
    if json {
        print_json(&details)?;
        return Ok(true);
    }

    println!("═══════════════════════════════════════");
    println!("  {}", details.pattern_name);
    println!("═══════════════════════════════════════");
    for component in details.components.values() {
        println!();
        println!("{} [{}]", component.display_name, component.component_key);
        println!("  Cast on:      {} sts", component.cast_on_stitches);
        println!("  Length:       {} rows", component.length_in_rows);
        println!("  Final count:  {} sts", component.final_stitch_count);
        println!(
            "  Finished:     {:.1} x {:.1} cm",
            component.finished_dimensions.width_cm, component.finished_dimensions.length_cm
        );
        for step in &component.shaping {
            println!("  Shaping:      {}", step.description);
        }
        for note in &component.construction_notes {
            println!("  Note:         {}", note);
        }
    }
    if let Some(estimate) = &details.yarn_estimate {
        println!();
        println!(
            "Yarn: {:.2} m, {} skein(s)",
            estimate.total_length_meters, estimate.number_of_skeins
        );
    }
    if !details.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &details.warnings {
            println!("  - {}", warning);
        }
    }
    Ok(true)
}

fn print_json<T: Serialize>(value: &T) -> PatternResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_report(report: &ValidationReport, json: bool) -> PatternResult<()> {
    if json {
        return print_json(report);
    }
    println!("Validation: {}", if report.is_valid { "[OK]" } else { "[FAIL]" });
    if !report.errors.is_empty() {
        println!("  Errors ({}):", report.errors.len());
        for issue in &report.errors {
            println!("    - {}", issue);
        }
    }
    if !report.missing_fields.is_empty() {
        println!("  Missing fields: {}", report.missing_fields.join(", "));
    }
    print_warnings(&report.warnings);
    Ok(())
}

fn print_warnings(warnings: &[ValidationIssue]) {
    if !warnings.is_empty() {
        println!("  Warnings ({}):", warnings.len());
        for issue in warnings {
            println!("    - {}", issue);
        }
    }
}
