use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tally::chat::Orchestrator;
use tally::collab::{bulk_extract, collect_images, TesseractCli};
use tally::config::{paths::TallyPaths, settings::Settings};
use tally::logging;

#[derive(Parser)]
#[command(
    name = "tally",
    author = "Kaylee Beyene",
    version,
    about = "Chat-driven personal finance tracker",
    long_about = "Tally tracks expenses and monthly budgets through short text \
                  commands like 'add 12.34 groceries milk' or 'set rent 1200'. \
                  Run without arguments for an interactive session."
)]
struct Cli {
    /// Directory holding settings, the ledger and exports
    #[arg(long, global = true, env = "TALLY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Chat,

    /// Handle a single command and print the reply
    Run {
        /// Command words, e.g. `add 5 coffee latte`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Read receipt images (files or folders) with tesseract and record
    /// their items
    Ingest {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => TallyPaths::with_base_dir(dir),
        None => TallyPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    logging::init_tracing(&settings.log_filter);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            paths.ensure_directories()?;
            run_shell(Orchestrator::open(&paths, settings)?)?;
        }
        Commands::Run { words } => {
            paths.ensure_directories()?;
            let mut chat = Orchestrator::open(&paths, settings)?.without_onboarding();
            println!("{}", chat.handle(&words.join(" ")));
        }
        Commands::Ingest { paths: inputs } => {
            paths.ensure_directories()?;
            let chat = Orchestrator::open(&paths, settings)?.without_onboarding();
            ingest(chat, &inputs)?;
        }
        Commands::Config => {
            println!("Tally Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("State file:       {}", paths.state_file().display());
            println!("Export file:      {}", settings.export_path(&paths).display());
            println!();
            println!("Settings:");
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn run_shell(mut chat: Orchestrator) -> Result<()> {
    println!("Tally chat. Type 'help' for commands, 'exit' to quit.");
    if let Some(banner) = chat.welcome() {
        println!("{}", banner);
    }

    while let Some(line) = prompt_line("> ")? {
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        let input = if line.eq_ignore_ascii_case("receipt:") {
            read_receipt_body(line)?
        } else {
            line
        };
        println!("{}", chat.handle(&input));
    }

    println!("Bye.");
    Ok(())
}

/// A bare `receipt:` starts a paste that ends at the first empty line
fn read_receipt_body(header: String) -> Result<String> {
    println!("Paste receipt lines, then an empty line to finish.");
    let mut body = header;
    while let Some(line) = prompt_line("... ")? {
        if line.is_empty() {
            break;
        }
        body.push('\n');
        body.push_str(&line);
    }
    Ok(body)
}

/// Prompt and read one trimmed line; `None` at end of input
fn prompt_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }

    Ok(Some(input.trim().to_string()))
}

fn ingest(mut chat: Orchestrator, inputs: &[PathBuf]) -> Result<()> {
    let images = collect_images(inputs)?;
    if images.is_empty() {
        println!("No receipt images found.");
        return Ok(());
    }

    let extractor = TesseractCli::new();
    let mut failed = 0;
    for outcome in bulk_extract(&extractor, &images) {
        let path = outcome.path.display();
        match outcome.lines {
            Ok(lines) if lines.is_empty() => println!("{}: no text found", path),
            Ok(lines) => {
                let reply = chat.handle(&format!("receipt:\n{}", lines.join("\n")));
                println!("{}: {}", path, reply);
            }
            Err(e) => {
                failed += 1;
                println!("{}: {}", path, e);
            }
        }
    }

    println!("Processed {} receipts, {} failed.", images.len(), failed);
    Ok(())
}
