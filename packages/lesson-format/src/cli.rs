//! Command-line interface for lesson files.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::background::{spawn_load, OperationUpdate};
use crate::config::PROGRESS_TEMPLATE;
use crate::error::{LessonError, Result};
use crate::progress::ProgressTick;
use crate::session::{LessonSession, Loaded};
use crate::types::{CountSnapshot, Document, TabKind};

/// Lesson Format - Inspect and rewrite XML lesson files.
#[derive(Parser)]
#[command(name = "lesson-format")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count sections, pages and items without loading content.
    Scan {
        /// Lesson file to scan
        file: PathBuf,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a lesson file with a progress bar and print a summary.
    Inspect {
        /// Lesson file to load
        file: PathBuf,
    },

    /// Load a lesson file and save it again in normalised form.
    Resave {
        /// Lesson file to read
        input: PathBuf,

        /// File to write
        output: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let session = LessonSession::new();

    match cli.command {
        Commands::Scan { file, json } => scan_command(&session, &file, json),
        Commands::Inspect { file } => inspect_command(&session, &file),
        Commands::Resave { input, output } => resave_command(&session, &input, &output),
    }
}

/// Execute the scan command.
fn scan_command(session: &LessonSession, file: &Path, json: bool) -> Result<()> {
    let snapshot = scan_or_fail(session, file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{} {}", style("Scanned").bold(), style(file.display()).cyan());
    for kind in TabKind::ALL {
        let sections = snapshot.tab(kind);
        println!("  {} tab: {} sections", kind, sections.len());
        for (index, pages) in sections.iter().enumerate() {
            println!("    Section {}: items per page {:?}", index + 1, pages);
        }
    }
    print_totals(&snapshot);

    Ok(())
}

/// Execute the inspect command.
fn inspect_command(session: &LessonSession, file: &Path) -> Result<()> {
    let snapshot = scan_or_fail(session, file)?;

    println!(
        "{} {}",
        style("Loading").bold(),
        style(file.display()).cyan()
    );

    let pb = progress_bar(snapshot.total_ticks());
    pb.set_message("Reading lesson...");

    let (sender, receiver) = mpsc::channel();
    let worker = spawn_load(session, file.to_path_buf(), sender);

    let mut result = None;
    for update in receiver {
        match update {
            OperationUpdate::Progress(tick) => {
                if tick == ProgressTick::Section {
                    pb.set_message("Reading sections...");
                }
                pb.inc(1);
            }
            OperationUpdate::Complete(loaded) => result = Some(loaded),
        }
    }
    pb.finish_and_clear();
    if worker.join().is_err() {
        return Err(incomplete("load", "worker panicked"));
    }

    let loaded = result.ok_or_else(|| incomplete("load", "no result"))??;
    let document = loaded_document(loaded)?;

    println!();
    for tab in document.tabs() {
        let pages: usize = tab.sections.iter().map(|s| s.pages.len()).sum();
        println!(
            "  {:<10} {} sections, {} pages, {} items",
            style(tab.kind()).green(),
            tab.sections.len(),
            pages,
            tab.item_count()
        );
        for section in &tab.sections {
            println!("    - {}", section.title);
        }
    }

    Ok(())
}

/// Execute the resave command.
fn resave_command(session: &LessonSession, input: &Path, output: &Path) -> Result<()> {
    let snapshot = scan_or_fail(session, input)?;

    // Load and save emit the same tick sequence for the same document.
    let pb = progress_bar(snapshot.total_ticks() * 2);

    pb.set_message("Loading...");
    let loaded = session.load(input, &mut |_: ProgressTick| pb.inc(1))?;
    let document = match loaded_document(loaded) {
        Ok(document) => document,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Saving...");
    let outcome = session.save(&document, output, &mut |_: ProgressTick| pb.inc(1))?;
    pb.finish_and_clear();

    if !outcome.is_successful() {
        return Err(incomplete("save", &format!("{outcome:?}")));
    }

    println!(
        "{} {} items to {}",
        style("Saved").green().bold(),
        document.item_count(),
        output.display()
    );

    Ok(())
}

fn scan_or_fail(session: &LessonSession, file: &Path) -> Result<CountSnapshot> {
    session
        .scan(file)?
        .ok_or_else(|| incomplete("scan", "file could not be scanned"))
}

fn loaded_document(loaded: Loaded) -> Result<Document> {
    let outcome = loaded.outcome;
    loaded
        .document
        .ok_or_else(|| incomplete("load", &format!("{outcome:?}")))
}

fn incomplete(operation: &str, outcome: &str) -> LessonError {
    LessonError::Incomplete {
        operation: operation.to_string(),
        outcome: outcome.to_string(),
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .expect("valid template")
            .progress_chars("=> "),
    );
    pb
}

fn print_totals(snapshot: &CountSnapshot) {
    println!(
        "  Total: {} sections, {} pages, {} items",
        snapshot.total_sections(),
        snapshot.total_pages(),
        style(snapshot.total_items()).bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_scan() {
        let cli = Cli::parse_from(["lesson-format", "scan", "course.lesson", "--json"]);
        match cli.command {
            Commands::Scan { file, json } => {
                assert_eq!(file, PathBuf::from("course.lesson"));
                assert!(json);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_scan_default_text() {
        let cli = Cli::parse_from(["lesson-format", "scan", "course.lesson"]);
        assert!(matches!(cli.command, Commands::Scan { json: false, .. }));
    }

    #[test]
    fn test_cli_parse_inspect() {
        let cli = Cli::parse_from(["lesson-format", "inspect", "course.lesson"]);
        assert!(matches!(cli.command, Commands::Inspect { .. }));
    }

    #[test]
    fn test_cli_parse_resave() {
        let cli = Cli::parse_from(["lesson-format", "resave", "in.lesson", "out.lesson"]);
        match cli.command {
            Commands::Resave { input, output } => {
                assert_eq!(input, PathBuf::from("in.lesson"));
                assert_eq!(output, PathBuf::from("out.lesson"));
            }
            _ => panic!("Expected Resave command"),
        }
    }

    #[test]
    fn test_cli_resave_requires_output() {
        assert!(Cli::try_parse_from(["lesson-format", "resave", "in.lesson"]).is_err());
    }

    #[test]
    fn test_loaded_document_requires_success() {
        let err = loaded_document(Loaded::default()).unwrap_err();
        assert!(err.to_string().contains("Null"));
    }
}
