//! Feed inspection command.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use storefront_feed::FeedSource;
use storefront_render::{load_into, Binding, CardRule, LoadOutcome, PostCard, ProductCard, RenderTarget};
use storefront_site::SiteConfig;

/// Which schema a feed is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedKind {
    Products,
    Posts,
}

/// Run the feed command.
pub async fn run(
    config_path: &Path,
    source: Option<String>,
    kind: FeedKind,
    fallback: Option<String>,
    html: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let source = resolve_source(source, kind, &config)?;
    let (mut target, rule) = target_for(kind, &config, fallback);

    tracing::info!("Loading {} into #{}", source, target.id());

    let client = reqwest::Client::new();
    match load_into(&mut target, &source, rule.as_ref(), &client).await {
        LoadOutcome::Rendered { rows, cards } => {
            tracing::info!("Rendered {} of {} rows into #{}", cards, rows, target.id());
            if cards < rows {
                tracing::info!("Skipped {} rows with too few fields", rows - cards);
            }
        }
        LoadOutcome::Failed { reason } => {
            anyhow::bail!("Failed to load {}: {}", source, reason);
        }
    }

    if html {
        println!("{}", target.to_html());
    }

    Ok(())
}

/// Use the site config for columns and fallbacks when it exists.
fn load_config(path: &Path) -> Result<SiteConfig> {
    if path.exists() {
        SiteConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))
    } else {
        tracing::debug!("No {}, using default columns", path.display());
        Ok(SiteConfig::default())
    }
}

/// The feed given on the command line, or the one configured for `kind`.
fn resolve_source(source: Option<String>, kind: FeedKind, config: &SiteConfig) -> Result<FeedSource> {
    let configured = match kind {
        FeedKind::Products => config.store.feed.as_deref(),
        FeedKind::Posts => config.blog.feed.as_deref(),
    };

    source
        .as_deref()
        .or(configured)
        .map(FeedSource::parse)
        .with_context(|| format!("No feed given and none configured for {:?}", kind))
}

fn target_for(
    kind: FeedKind,
    config: &SiteConfig,
    fallback: Option<String>,
) -> (RenderTarget, Box<dyn CardRule>) {
    let fallback = fallback.unwrap_or_else(|| config.store.fallback_image.clone());

    match kind {
        FeedKind::Products => {
            let rule: Box<dyn CardRule> = Box::new(ProductCard::new(config.store.columns, fallback));
            let target = RenderTarget::new("inv-grid")
                .with_class("grid-3")
                .with_binding(Binding::ProductCards);
            (target, rule)
        }
        FeedKind::Posts => {
            let rule: Box<dyn CardRule> = Box::new(PostCard::new(config.blog.columns, fallback));
            let target = RenderTarget::new("blog-grid")
                .with_class("grid-3")
                .with_binding(Binding::PostCards);
            (target, rule)
        }
    }
}
