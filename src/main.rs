use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use jacoco_summary::cli::{self, Style};
use jacoco_summary::github::{self, JobSummary};

/// jacoco-summary — Render JaCoCo XML/CSV coverage reports as a GitHub
/// Actions job summary.
#[derive(Parser)]
#[command(name = "jacoco-summary", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the coverage summary to the job summary.
    Summary {
        /// Path to the coverage report (.xml or .csv). Defaults to the
        /// `coverage-file` action input.
        file: Option<PathBuf>,

        /// Override format detection (xml, csv).
        #[arg(long)]
        format: Option<String>,

        /// Print the markup to stdout instead of the job summary.
        #[arg(long)]
        stdout: bool,
    },

    /// Show package and class coverage in the terminal.
    Show {
        /// Path to the coverage report (.xml or .csv).
        file: PathBuf,

        /// Override format detection (xml, csv).
        #[arg(long)]
        format: Option<String>,

        /// Output style.
        #[arg(long, value_enum, default_value = "text")]
        style: Style,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", github::error_command(&format!("{e:#}")));
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Summary {
            file,
            format,
            stdout,
        } => {
            let file = match file {
                Some(f) => f,
                None => github::coverage_file_input()?,
            };
            if stdout {
                print!("{}", cli::cmd_summary(&file, format.as_deref())?);
            } else {
                let mut summary = JobSummary::from_env()?;
                let detected = cli::cmd_publish(&file, format.as_deref(), &mut summary)?;
                eprintln!(
                    "Coverage summary for {} ({detected}) written to {}",
                    file.display(),
                    summary.path().display()
                );
            }
            Ok(())
        }
        Commands::Show {
            file,
            format,
            style,
        } => {
            print!("{}", cli::cmd_show(&file, format.as_deref(), &style)?);
            Ok(())
        }
    }
}
