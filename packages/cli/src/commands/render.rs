use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_evaluator::PublishedViewer;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Stored page JSON (`contentBlocks` and `designTokens`)
    pub page: PathBuf,

    /// Output HTML file (stdout when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Document title
    #[arg(short, long, default_value = "Pagesmith page")]
    pub title: String,
}

pub fn render(args: RenderArgs) -> Result<()> {
    let source = fs::read_to_string(&args.page)
        .with_context(|| format!("Failed to read {}", args.page.display()))?;
    let viewer = PublishedViewer::from_json(&source)
        .with_context(|| format!("Failed to decode {}", args.page.display()))?;

    let html = viewer.to_document(&args.title);

    match &args.out {
        Some(out) => {
            fs::write(out, html)?;
            eprintln!(
                "   {} {} → {}",
                "✓".green(),
                args.page.display(),
                out.display()
            );
        }
        None => print!("{}", html),
    }

    if viewer.skipped > 0 {
        eprintln!(
            "   {} skipped {} malformed block(s)",
            "⚠️".yellow(),
            viewer.skipped
        );
    }

    Ok(())
}
