use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_common::{check_slug_format, normalize_slug, sanitize_slug};

#[derive(Args, Debug)]
pub struct SlugArgs {
    /// Title or slug candidate
    pub input: String,
}

pub fn slug(args: SlugArgs) -> Result<()> {
    let candidate = sanitize_slug(&args.input);
    let normalized = normalize_slug(&args.input);

    println!("   Input:      {}", args.input);
    println!("   Slug:       {}", normalized.bright_white().bold());

    match check_slug_format(&candidate) {
        Ok(()) => println!("   {} valid format", "✓".green()),
        Err(err) => {
            println!("   {} {}", "✗".red(), err);
            if candidate != normalized && check_slug_format(&normalized).is_ok() {
                println!("   {} use {} instead", "→".yellow(), normalized);
            }
        }
    }

    Ok(())
}
