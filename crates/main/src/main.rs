use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docx_helper::assembler::SavedDocument;
use docx_helper::documents;

/// Generates the Sefaria Chat Word documents.
///
/// Output paths are relative to the current directory. The technical reference
/// embeds `docs/architecture.png`, `docs/flowchart.png` and `docs/sequence.png`
/// when they exist and is built without them otherwise.
#[derive(Parser)]
#[command(author, version, about = "Generates the Sefaria Chat Word documents")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Build `Sefaria Chat Announcement.docx`.
    #[command(name = "announcement", aliases = ["flyer"])]
    Announcement,

    /// Build `docs/Sefaria Chat - Technical Reference.docx`.
    #[command(name = "reference", aliases = ["docs"])]
    Reference,

    /// Build every document (the default).
    #[command(name = "all", aliases = ["run-all", "run_all"])]
    All,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let base_dir = PathBuf::from(".");

    let result = match cli.command.unwrap_or(Commands::All) {
        Commands::Announcement => documents::build_announcement(&base_dir).map(|saved| vec![saved]),
        Commands::Reference => documents::build_reference(&base_dir).map(|saved| vec![saved]),
        Commands::All => documents::run_all(&base_dir),
    };

    match result {
        Ok(saved) => report(&saved),
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn report(saved: &[SavedDocument]) {
    for document in saved {
        println!("Saved: {} ({} bytes)", document.path.display(), document.bytes);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
