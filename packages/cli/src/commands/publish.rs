use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_common::PageDocument;
use pagesmith_studio::{MemoryPageStore, PageStore, PublishError, StudioConfig, StudioSession};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Page document JSON
    pub page: PathBuf,

    /// JSON page list acting as the page store; created when missing
    #[arg(short, long)]
    pub store: PathBuf,

    /// Save as a draft instead of publishing
    #[arg(long)]
    pub draft: bool,
}

fn load_store(path: &Path) -> Result<MemoryPageStore> {
    if !path.exists() {
        return Ok(MemoryPageStore::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let pages: Vec<PageDocument> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid page store {}", path.display()))?;
    Ok(MemoryPageStore::from_pages(pages))
}

pub fn publish(args: PublishArgs, cwd: &Path) -> Result<()> {
    let config = StudioConfig::load(cwd)?;
    let content = fs::read_to_string(&args.page)
        .with_context(|| format!("Failed to read {}", args.page.display()))?;
    let document: PageDocument = serde_json::from_str(&content)
        .with_context(|| format!("Invalid page document {}", args.page.display()))?;
    let store = Arc::new(load_store(&args.store)?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(async {
        let page_store: Arc<dyn PageStore> = store.clone();
        let mut session = StudioSession::from_document(config, page_store, document);
        let result = if args.draft {
            session.save_draft().await.cloned()
        } else {
            session.publish().await.cloned()
        };
        session.close()?;
        Ok::<_, anyhow::Error>(result)
    })?;

    let saved = match outcome {
        Ok(saved) => saved,
        Err(PublishError::Blocked(violations)) => {
            println!("{} {}", "✗".red(), "Publish blocked".red().bold());
            for violation in &violations {
                println!("   • {}", violation);
            }
            anyhow::bail!("{} guard(s) failed", violations.len());
        }
        Err(err) => return Err(err.into()),
    };

    fs::write(&args.store, serde_json::to_string_pretty(&store.pages()?)?)
        .with_context(|| format!("Failed to write {}", args.store.display()))?;

    let id = saved
        .id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    if args.draft {
        println!("{} Saved draft {}", "✓".green(), id.bright_white());
    } else {
        println!("{} Published {}", "✓".green(), id.bright_white());
        if let Some(url) = &saved.publish_info.published_url {
            println!("   URL: {}", url.bright_blue());
        }
    }
    println!("   Store: {}", args.store.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "contentBlocks": [{"id": "b-1", "type": "header", "props": {"title": "Harbour"}}],
        "linkMetadata": {"slug": "harbour-coffee"},
        "pageSettings": {"pageName": "Harbour Coffee"}
    }"#;

    fn quick_config(dir: &Path) {
        StudioConfig {
            validation_debounce_ms: 0,
            ..Default::default()
        }
        .write(dir)
        .unwrap();
    }

    #[test]
    fn test_publish_writes_store() {
        let dir = tempfile::tempdir().unwrap();
        quick_config(dir.path());
        let page = dir.path().join("page.json");
        let store = dir.path().join("pages.json");
        fs::write(&page, PAGE).unwrap();

        publish(
            PublishArgs {
                page,
                store: store.clone(),
                draft: false,
            },
            dir.path(),
        )
        .unwrap();

        let pages: Vec<PageDocument> =
            serde_json::from_str(&fs::read_to_string(store).unwrap()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].status, pagesmith_common::PageStatus::Published);
        assert_eq!(pages[0].page_settings.slug.as_deref(), Some("harbour-coffee"));
    }

    #[test]
    fn test_taken_slug_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        quick_config(dir.path());
        let page = dir.path().join("page.json");
        let store = dir.path().join("pages.json");
        fs::write(&page, PAGE).unwrap();
        fs::write(
            &store,
            r#"[{"id": "page-9", "linkMetadata": {"slug": "harbour-coffee"}, "status": "published"}]"#,
        )
        .unwrap();

        let err = publish(
            PublishArgs {
                page,
                store: store.clone(),
                draft: false,
            },
            dir.path(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("guard"));
    }
}
