mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{init, publish, render, slug, InitArgs, PublishArgs, RenderArgs, SlugArgs};

/// Pagesmith CLI - landing and product page studio
#[derive(Parser, Debug)]
#[command(name = "pagesmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default pagesmith.config.json
    Init(InitArgs),

    /// Normalize a title into a slug and check its format
    Slug(SlugArgs),

    /// Render a stored page as a standalone HTML document
    Render(RenderArgs),

    /// Publish a page into a JSON page store
    Publish(PublishArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Slug(args) => slug(args),
            Command::Render(args) => render(args),
            Command::Publish(args) => publish(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
