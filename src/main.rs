//! CLI entry point for the accessibility analyzer.
//!
//! # Usage
//!
//! ```bash
//! # Check every accessibility<N>.meta snapshot in a directory
//! a11y-analyzer --target ./captures
//!
//! # Use an older preset and a smaller touch target minimum
//! a11y-analyzer --target ./captures --preset version_2_0 --min-touch-target-size 32
//!
//! # Write a default configuration file
//! a11y-analyzer --init-config analyzer.toml
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use a11y_hierarchy::analyzer::Analyzer;
use a11y_hierarchy::config::AnalyzerConfig;
use a11y_hierarchy::CheckPreset;

/// Options for an analysis run. Flags override the configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
struct AnalyzeOptions {
    target: PathBuf,
    config: Option<PathBuf>,
    preset: Option<CheckPreset>,
    min_touch_target_size: Option<u32>,
    write_results: bool,
}

/// CLI command to execute
#[derive(Debug, Clone, PartialEq)]
enum Command {
    /// Analyze the snapshots in a directory
    Analyze(AnalyzeOptions),
    /// Write the default configuration to a file
    InitConfig(PathBuf),
    /// Show help message
    Help,
}

fn flag_value<'a>(
    flag: &str,
    args: &mut impl Iterator<Item = &'a String>,
) -> Result<&'a String, String> {
    args.next()
        .ok_or_else(|| format!("{} requires a value", flag))
}

/// Parse command line arguments (without the program name)
fn parse_args(args: &[String]) -> Result<Command, String> {
    // If no arguments provided, show help
    if args.is_empty() {
        return Ok(Command::Help);
    }

    let mut options = AnalyzeOptions::default();
    let mut target = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--target" | "-t" => target = Some(PathBuf::from(flag_value(arg, &mut iter)?)),
            "--config" | "-c" => options.config = Some(PathBuf::from(flag_value(arg, &mut iter)?)),
            "--preset" | "-p" => {
                let value = flag_value(arg, &mut iter)?;
                options.preset = Some(value.parse()?);
            }
            "--min-touch-target-size" => {
                let value = flag_value(arg, &mut iter)?;
                let size = value
                    .parse::<u32>()
                    .map_err(|_| format!("--min-touch-target-size expects a size in dp, got {}", value))?;
                options.min_touch_target_size = Some(size);
            }
            "--write-results" | "-w" => options.write_results = true,
            "--init-config" => {
                return Ok(Command::InitConfig(PathBuf::from(flag_value(arg, &mut iter)?)));
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    options.target = target.ok_or("--target is required (e.g., --target ./captures)")?;
    Ok(Command::Analyze(options))
}

/// Print help message to stdout
fn print_help() {
    println!("a11y-analyzer - Run accessibility checks over captured UI hierarchies");
    println!();
    println!("USAGE:");
    println!("    a11y-analyzer --target <DIR> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -t, --target <DIR>               Directory containing accessibility<N>.meta snapshots");
    println!("    -c, --config <FILE>              Load settings from a TOML file");
    println!("    -p, --preset <NAME>              Check preset (latest, version_1_0, version_2_0,");
    println!("                                     version_3_0, no_checks, prerelease)");
    println!("        --min-touch-target-size <DP> Minimum touch target size in dp");
    println!("    -w, --write-results              Write each result next to its snapshot");
    println!("        --init-config <FILE>         Write the default configuration and exit");
    println!("    -h, --help                       Print this help message");
    println!();
    println!("OUTPUT:");
    println!("    The report is JSON formatted to stdout.");
    println!("    Progress and errors are written to stderr. Set RUST_LOG for more detail.");
}

fn handle_analyze(options: &AnalyzeOptions) -> i32 {
    let mut config = match &options.config {
        Some(path) => AnalyzerConfig::load_from_path(path),
        None => AnalyzerConfig::default(),
    };
    if let Some(preset) = options.preset {
        config.preset = preset;
    }
    if options.min_touch_target_size.is_some() {
        config.min_touch_target_size_dp = options.min_touch_target_size;
    }

    let analyzer = match Analyzer::new(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("[A11Y-ANALYZER] ❌ {}", e);
            return 1;
        }
    };

    eprintln!(
        "[A11Y-ANALYZER] 🔍 Analyzing {} with preset {}...",
        options.target.display(),
        analyzer.config().preset
    );
    let report = match analyzer.analyze_dir(&options.target) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("[A11Y-ANALYZER] ❌ Analysis failed: {}", e);
            return 1;
        }
    };

    if options.write_results {
        for snapshot in &report.snapshots {
            if let Err(e) = analyzer.write_result_files(&options.target, snapshot) {
                eprintln!("[A11Y-ANALYZER] ❌ Failed to write results: {}", e);
                return 1;
            }
        }
    }

    eprintln!(
        "[A11Y-ANALYZER] ✅ {} snapshots, {} results",
        report.snapshots.len(),
        report.result_count()
    );
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("[A11Y-ANALYZER] ❌ Error serializing output: {}", e);
            1
        }
    }
}

fn handle_init_config(path: &Path) -> i32 {
    match AnalyzerConfig::default().save_to_path(path) {
        Ok(()) => {
            eprintln!("[A11Y-ANALYZER] ✅ Wrote default configuration to {}", path.display());
            0
        }
        Err(e) => {
            eprintln!("[A11Y-ANALYZER] ❌ Failed to write {}: {}", path.display(), e);
            1
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information.");
            process::exit(1);
        }
    };

    log::debug!("Executing command: {:?}", command);

    let exit_code = match command {
        Command::Analyze(options) => handle_analyze(&options),
        Command::InitConfig(path) => handle_init_config(&path),
        Command::Help => {
            print_help();
            0
        }
    };

    process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_shows_help() {
        assert_eq!(parse_args(&[]), Ok(Command::Help));
    }

    #[test]
    fn test_full_analyze_command() {
        let command = parse_args(&args(&[
            "-t",
            "captures",
            "--preset",
            "v2.0",
            "--min-touch-target-size",
            "32",
            "-w",
        ]))
        .unwrap();

        assert_eq!(
            command,
            Command::Analyze(AnalyzeOptions {
                target: PathBuf::from("captures"),
                config: None,
                preset: Some(CheckPreset::Version2_0),
                min_touch_target_size: Some(32),
                write_results: true,
            })
        );
    }

    #[test]
    fn test_target_is_required() {
        assert!(parse_args(&args(&["--preset", "latest"])).is_err());
    }

    #[test]
    fn test_missing_flag_value() {
        let error = parse_args(&args(&["--target"])).unwrap_err();
        assert!(error.contains("--target requires a value"));
    }

    #[test]
    fn test_bad_touch_target_size() {
        assert!(parse_args(&args(&["-t", "x", "--min-touch-target-size", "big"])).is_err());
    }

    #[test]
    fn test_unknown_argument() {
        let error = parse_args(&args(&["--bogus"])).unwrap_err();
        assert_eq!(error, "Unknown argument: --bogus");
    }
}
