use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    str::FromStr,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;
use weft_ast::{DocumentChange, LinkedAst};
use weft_lexgen::{error::Diagnostics, model::GrammarModel};

use config::Config;

mod config;

/// Turns grammar models into editor tokenizers and serialized trees into linked graphs.
#[derive(Parser)]
#[command(name = "weft", version, about, long_about = None)]
struct Cli {
    /// JSON file overriding the reference conventions and output options.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides `RUST_LOG`, defaults to `warn`.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the tokenizer description derived from a grammar model.
    Tokenizer { grammar: PathBuf },
    /// Links a serialized tree and prints a summary.
    Link {
        document: PathBuf,
        /// Print the linked tree instead.
        #[arg(long)]
        json: bool,
    },
    /// Prints the containment graph of a serialized tree in the dot language.
    Graph {
        document: PathBuf,
        /// Print `{nodes, edges}` instead.
        #[arg(long)]
        json: bool,
    },
    /// Links the tree carried by a document change notification.
    Document { notification: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(level: Option<&str>) -> anyhow::Result<()> {
    let level = match level {
        Some(level) => level.to_owned(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| "WARN".to_owned()),
    };
    let level = LevelFilter::from_str(&level)
        .map_err(|_| anyhow::anyhow!("Unknown log level `{level}`"))?;

    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    )
    .context("Failed to initialize logger")
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read `{}`", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let string = match pretty {
        true => serde_json::to_string_pretty(value)?,
        false => serde_json::to_string(value)?,
    };
    println!("{string}");
    Ok(())
}

fn link_file(path: &Path, config: &Config) -> anyhow::Result<LinkedAst> {
    let text = read(path)?;
    LinkedAst::parse(&text, &config.conventions)
        .with_context(|| format!("Failed to link `{}`", path.display()))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    init_logger(cli.log_level.as_deref())?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Tokenizer { grammar } => {
            let text = read(&grammar)?;
            let model = serde_json::from_str::<GrammarModel>(&text)
                .with_context(|| format!("Failed to parse grammar `{}`", grammar.display()))?;

            let err = Diagnostics::new();
            let tokenizer = weft_lexgen::synthesize(&model, &err);
            for diagnostic in err.take() {
                log::warn!("{}: {diagnostic}", grammar.display());
            }

            print_json(&tokenizer, config.pretty)?;
        }
        Command::Link { document, json } => {
            let ast = link_file(&document, &config)?;
            match json {
                true => print_json(&ast.to_json(), config.pretty)?,
                false => print!("{}", ast.statistics()),
            }
        }
        Command::Graph { document, json } => {
            let graph = link_file(&document, &config)?.to_node_edge_graph();
            match json {
                true => print_json(&graph, config.pretty)?,
                false => print!("{}", graph.to_dot()),
            }
        }
        Command::Document { notification } => {
            let text = read(&notification)?;
            let document = DocumentChange::from_json(&text)
                .and_then(|change| change.link(&config.conventions))
                .with_context(|| format!("Failed to link `{}`", notification.display()))?;

            println!("uri\t{}", document.uri);
            println!(
                "diagnostics\t{} ({} errors)",
                document.diagnostics.len(),
                document.errors().count()
            );
            print!("{}", document.ast.statistics());
        }
    }

    Ok(())
}
