mod check;
mod cli;
mod cms_config;
mod config;
mod progress;
mod report;
mod tester;
mod types;

use std::path::Path;

use clap::Parser;
use cli::{Cli, Commands, RunArgs};
use cms_config::ConfigError;
use console::Style;

fn main() {
    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => match run(&args, cli.verbose) {
            Ok(code) => std::process::exit(code),
            Err(e) => {
                eprintln!("Error: {e:#}");
                std::process::exit(2);
            }
        },
        Commands::ValidateConfig {
            path,
            duplicate_scope,
        } => {
            let text = match std::fs::read_to_string(&path) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error reading {path}: {e}");
                    std::process::exit(2);
                }
            };
            let green = Style::new().green().bold();
            let red = Style::new().red().bold();
            match cms_config::validate(&text, duplicate_scope) {
                Ok(summary) => {
                    println!(
                        "{} {path}: {} collections, {} fields",
                        green.apply_to("VALID"),
                        summary.collections,
                        summary.fields
                    );
                    std::process::exit(0);
                }
                Err(ConfigError::Parse(e)) => {
                    println!("{} {path}: YAML error: {e}", red.apply_to("INVALID"));
                    std::process::exit(1);
                }
                Err(ConfigError::Duplicates(names)) => {
                    println!(
                        "{} {path}: duplicate field names: {}",
                        red.apply_to("INVALID"),
                        names.join(", ")
                    );
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Run the selected check groups. Returns the process exit code: 0 when
/// every check passed, 1 otherwise.
fn run(args: &RunArgs, verbose: bool) -> anyhow::Result<i32> {
    let base = match &args.base_url {
        Some(url) => config::BaseUrl::new(url)?,
        None => config::load_base_url(Path::new(&args.env_file), &args.env_key)?,
    };

    println!("Testing backend API at: {}", base.as_str());
    if let Some((scheme, host)) = base.scheme_and_host() {
        println!("Protocol: {scheme}, Domain: {host}");
    }

    let groups = check::selected_groups(&args.groups);

    let run_report = check::run_groups(&base, &groups, args.duplicate_scope, verbose)?;
    report::print_summary(&run_report);

    if let Some(path) = &args.json {
        report::write_json(&run_report, Path::new(path))?;
        println!("Report written to {path}");
    }

    Ok(run_report.exit_code())
}
