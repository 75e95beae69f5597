//! Fetch a feed and render it into a target.

use storefront_feed::FeedSource;

use crate::card::{render_rows, CardRule, Header};
use crate::target::RenderTarget;

/// What happened when a target was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The target now holds `cards` rendered rows out of `rows` data rows.
    Rendered { rows: usize, cards: usize },
    /// The feed could not be loaded; the target still shows its placeholder.
    Failed { reason: String },
}

/// Fetch `source`, render it with `rule` and replace the target's content.
///
/// Failures never propagate: they are logged and the placeholder is left in
/// place, matching what visitors see in the browser.
pub async fn load_into(
    target: &mut RenderTarget,
    source: &FeedSource,
    rule: &dyn CardRule,
    client: &reqwest::Client,
) -> LoadOutcome {
    let table = match source.load(client).await {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!("Failed to load {} for #{}: {}", source, target.id(), e);
            return LoadOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    let cards = render_rows(&table, rule, Header::Skip);
    let outcome = LoadOutcome::Rendered {
        rows: table.data_rows().len(),
        cards: cards.len(),
    };

    target.replace(cards.concat());
    tracing::debug!("Rendered #{} with {}: {:?}", target.id(), rule.name(), outcome);

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use axum::{routing::get, Router};
    use storefront_feed::ProductColumns;

    use crate::card::ProductCard;
    use crate::target::PLACEHOLDER;

    fn rule() -> ProductCard {
        ProductCard::new(ProductColumns::default(), "default.png")
    }

    #[tokio::test]
    async fn renders_feed_into_target() {
        let app = Router::new().route(
            "/store.csv",
            get(|| async { "name,price,desc,image,link\nWidget,9.99,Nice,,\nGadget,5,,,https://pay.example/x\nbroken\n" }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut target = RenderTarget::new("inv-grid");
        let source = FeedSource::parse(&format!("http://{}/store.csv", addr));

        let outcome = load_into(&mut target, &source, &rule(), &reqwest::Client::new()).await;

        assert_eq!(outcome, LoadOutcome::Rendered { rows: 3, cards: 2 });
        assert!(target.is_populated());
        assert!(target.inner_html().contains("Widget"));
        assert!(target.inner_html().contains("https://pay.example/x"));
    }

    #[tokio::test]
    async fn failure_keeps_placeholder() {
        let mut target = RenderTarget::new("inv-grid");
        let source = FeedSource::File(PathBuf::from("/nonexistent/store.csv"));

        let outcome = load_into(&mut target, &source, &rule(), &reqwest::Client::new()).await;

        assert!(matches!(outcome, LoadOutcome::Failed { .. }));
        assert!(!target.is_populated());
        assert!(target.inner_html().contains(PLACEHOLDER));
    }

    #[tokio::test]
    async fn reload_replaces_previous_content() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("store.csv");
        let source = FeedSource::File(path.clone());
        let mut target = RenderTarget::new("inv-grid");

        std::fs::write(&path, "name,price\nOld,1\n").unwrap();
        load_into(&mut target, &source, &rule(), &reqwest::Client::new()).await;
        std::fs::write(&path, "name,price\nNew,2\n").unwrap();
        load_into(&mut target, &source, &rule(), &reqwest::Client::new()).await;

        assert!(target.inner_html().contains("New"));
        assert!(!target.inner_html().contains("Old"));
    }
}
