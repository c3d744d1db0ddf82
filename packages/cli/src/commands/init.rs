use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_studio::{StudioConfig, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current one)
    pub dir: Option<PathBuf>,

    /// Base URL published pages are served under
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Keep undo history on disk in this directory
    #[arg(long)]
    pub history_dir: Option<PathBuf>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let dir = args.dir.clone().unwrap_or_else(|| cwd.to_path_buf());
    let config_path = dir.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Pagesmith studio...".bright_blue().bold());

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
        println!("  {} Created {}/", "✓".green(), dir.display());
    }

    let mut config = StudioConfig::default();
    if let Some(base_url) = args.base_url {
        config.published_base_url = base_url;
    }
    if let Some(history_dir) = args.history_dir {
        fs::create_dir_all(dir.join(&history_dir))?;
        config.history_dir = Some(history_dir);
    }

    config.write(&dir)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Studio initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagesmith slug \"My Page Title\"");
    println!("  2. Run: pagesmith publish page.json --store pages.json");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            dir: None,
            base_url: Some("https://go.brand.test".to_string()),
            history_dir: None,
            force: false,
        };

        init(args, dir.path()).unwrap();

        let config = StudioConfig::load(dir.path()).unwrap();
        assert_eq!(config.published_base_url, "https://go.brand.test");
    }
}
