//! Render targets: page containers that receive generated markup.

use serde::Serialize;
use storefront_feed::escape_html;

/// Text shown in a target until its feed has been rendered.
pub const PLACEHOLDER: &str = "Loading...";

/// Shown on a product page whose `?item=` names no product in the feed.
pub const PRODUCT_NOT_FOUND: &str = "Product not found.";

/// Shown on a post page whose `?id=` names no post in the feed.
pub const POST_NOT_FOUND: &str = "Post not found.";

/// Which renderer the runtime script attaches to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Binding {
    /// Grid of product cards from the store feed
    ProductCards,
    /// Single product chosen by `?item=`
    ProductDetail,
    /// Grid of post cards from the blog feed
    PostCards,
    /// Single post chosen by `?id=`
    PostDetail,
}

impl Binding {
    /// Value of the `data-render` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductCards => "product-cards",
            Self::ProductDetail => "product-detail",
            Self::PostCards => "post-cards",
            Self::PostDetail => "post-detail",
        }
    }

    /// Message for a detail binding whose selected entry does not exist.
    pub fn not_found(&self) -> Option<&'static str> {
        match self {
            Self::ProductDetail => Some(PRODUCT_NOT_FOUND),
            Self::PostDetail => Some(POST_NOT_FOUND),
            Self::ProductCards | Self::PostCards => None,
        }
    }
}

/// A container identified by element id whose content is replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    id: String,
    class: Option<String>,
    binding: Option<Binding>,
    placeholder: String,
    content: Option<String>,
}

impl RenderTarget {
    /// Create a target showing the default placeholder.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: None,
            binding: None,
            placeholder: PLACEHOLDER.to_string(),
            content: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn binding(&self) -> Option<Binding> {
        self.binding
    }

    /// Replace the target's content with new markup.
    pub fn replace(&mut self, markup: impl Into<String>) {
        self.content = Some(markup.into());
    }

    /// Show rendered detail markup, or the binding's not-found message when
    /// the feed loaded but had no matching entry.
    pub fn show_detail(&mut self, markup: Option<String>) {
        let markup = markup.unwrap_or_else(|| {
            let message = self
                .binding
                .and_then(|b| b.not_found())
                .unwrap_or(PRODUCT_NOT_FOUND);
            message_html(message)
        });
        self.replace(markup);
    }

    /// Whether content has replaced the placeholder.
    pub fn is_populated(&self) -> bool {
        self.content.is_some()
    }

    /// Current inner HTML: the rendered markup, or the escaped placeholder.
    pub fn inner_html(&self) -> String {
        match &self.content {
            Some(markup) => markup.clone(),
            None => message_html(&self.placeholder),
        }
    }

    /// The full container element.
    pub fn to_html(&self) -> String {
        let mut attrs = format!(r#"id="{}""#, escape_html(&self.id));
        if let Some(class) = &self.class {
            attrs.push_str(&format!(r#" class="{}""#, escape_html(class)));
        }
        if let Some(binding) = self.binding {
            attrs.push_str(&format!(r#" data-render="{}""#, binding.as_str()));
        }

        format!("<div {}>{}</div>", attrs, self.inner_html())
    }
}

/// A short status message in place of rendered content.
fn message_html(text: &str) -> String {
    format!(r#"<p class="placeholder">{}</p>"#, escape_html(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_with_placeholder() {
        let target = RenderTarget::new("inv-grid");

        assert!(!target.is_populated());
        assert_eq!(
            target.to_html(),
            r#"<div id="inv-grid"><p class="placeholder">Loading...</p></div>"#
        );
    }

    #[test]
    fn replace_overwrites_previous_content() {
        let mut target = RenderTarget::new("blog-grid");

        target.replace("<p>first</p>");
        target.replace("<p>second</p>");

        assert!(target.is_populated());
        assert_eq!(target.inner_html(), "<p>second</p>");
    }

    #[test]
    fn renders_binding_and_class() {
        let target = RenderTarget::new("inv-grid")
            .with_class("grid-3")
            .with_binding(Binding::ProductCards);

        let html = target.to_html();

        assert!(html.starts_with(r#"<div id="inv-grid" class="grid-3" data-render="product-cards">"#));
    }

    #[test]
    fn missing_detail_shows_not_found() {
        let mut product = RenderTarget::new("prod-box").with_binding(Binding::ProductDetail);
        let mut post = RenderTarget::new("post-container").with_binding(Binding::PostDetail);

        product.show_detail(None);
        post.show_detail(None);

        assert!(product.is_populated());
        assert_eq!(
            product.inner_html(),
            r#"<p class="placeholder">Product not found.</p>"#
        );
        assert_eq!(
            post.inner_html(),
            r#"<p class="placeholder">Post not found.</p>"#
        );
    }

    #[test]
    fn found_detail_replaces_placeholder() {
        let mut target = RenderTarget::new("prod-box").with_binding(Binding::ProductDetail);

        target.show_detail(Some("<h1>Widget</h1>".to_string()));

        assert_eq!(target.inner_html(), "<h1>Widget</h1>");
        assert_eq!(Binding::ProductCards.not_found(), None);
    }
}
