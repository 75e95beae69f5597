//! Row-to-markup rules for feed listings and detail views.

use storefront_feed::{
    escape_html, inline_markup, Post, PostColumns, Product, ProductColumns, Row, Table,
};
use url::form_urlencoded;

/// A per-row rendering rule.
pub trait CardRule: Send + Sync {
    /// Rule identifier used in log output (e.g., "product-cards")
    fn name(&self) -> &'static str;

    /// Rows with fewer fields than this are skipped.
    fn min_fields(&self) -> usize;

    /// Render one row, or `None` if the row does not qualify.
    fn render(&self, row: &Row) -> Option<String>;
}

/// Whether the first row of a table is a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Header {
    #[default]
    Skip,
    Include,
}

/// Render every qualifying row of a table.
///
/// Blank rows and rows shorter than the rule's minimum are skipped silently.
pub fn render_rows(table: &Table, rule: &dyn CardRule, header: Header) -> Vec<String> {
    let rows = match header {
        Header::Skip => table.data_rows(),
        Header::Include => table.rows(),
    };

    let mut skipped = 0;
    let cards: Vec<String> = rows
        .iter()
        .filter_map(|row| {
            if row.is_blank() || row.len() < rule.min_fields() {
                skipped += 1;
                return None;
            }
            rule.render(row)
        })
        .collect();

    if skipped > 0 {
        tracing::debug!("{}: skipped {} short or blank rows", rule.name(), skipped);
    }

    cards
}

/// What a product card's button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    /// Direct link to an external payment page
    ExternalLink(String),
    /// Append the product to the local cart
    AddToCart { name: String, price: String },
}

impl CardAction {
    pub fn for_product(product: &Product) -> Self {
        match &product.payment_link {
            Some(link) => Self::ExternalLink(link.clone()),
            None => Self::AddToCart {
                name: product.name.clone(),
                price: product.price.clone(),
            },
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::ExternalLink(link) => format!(
                r#"<a href="{}" class="btn btn-primary btn-block" target="_blank" rel="noopener">Buy Now</a>"#,
                escape_html(link)
            ),
            Self::AddToCart { name, price } => format!(
                r#"<button type="button" class="btn btn-primary btn-block" data-cart-add data-name="{}" data-price="{}">Add to Cart</button>"#,
                escape_html(name),
                escape_html(price)
            ),
        }
    }
}

/// Store listing card.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub columns: ProductColumns,
    /// Image used when a row has no usable image
    pub fallback_image: String,
}

impl ProductCard {
    pub fn new(columns: ProductColumns, fallback_image: impl Into<String>) -> Self {
        Self {
            columns,
            fallback_image: fallback_image.into(),
        }
    }

    pub fn render_product(&self, product: &Product) -> String {
        format!(
            r#"<div class="card reveal"><img src="{img}" class="prod-img" loading="lazy" alt="{name}"><div><h3><a href="product.html?item={item}">{name}</a></h3><p class="price">{price}</p><p class="desc">{desc}</p>{action}</div></div>"#,
            img = escape_html(product.image_or(&self.fallback_image)),
            name = escape_html(&product.name),
            item = query_value(&product.name),
            price = escape_html(&product.price),
            desc = escape_html(&product.description),
            action = CardAction::for_product(product).to_html(),
        )
    }
}

impl CardRule for ProductCard {
    fn name(&self) -> &'static str {
        "product-cards"
    }

    fn min_fields(&self) -> usize {
        self.columns.min_fields()
    }

    fn render(&self, row: &Row) -> Option<String> {
        self.columns
            .extract(row)
            .map(|product| self.render_product(&product))
    }
}

/// Blog listing card.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub columns: PostColumns,
    pub fallback_image: String,
}

impl PostCard {
    pub fn new(columns: PostColumns, fallback_image: impl Into<String>) -> Self {
        Self {
            columns,
            fallback_image: fallback_image.into(),
        }
    }

    pub fn render_post(&self, post: &Post) -> String {
        format!(
            r#"<div class="card reveal"><img src="{img}" class="prod-img" loading="lazy" alt="{title}"><div><span class="blog-badge">{category}</span><h3><a href="post.html?id={id}">{title}</a></h3><p class="desc">{summary}</p></div></div>"#,
            img = escape_html(post.image_or(&self.fallback_image)),
            title = escape_html(&post.title),
            category = escape_html(&post.category),
            id = query_value(&post.slug),
            summary = escape_html(&post.summary),
        )
    }
}

impl CardRule for PostCard {
    fn name(&self) -> &'static str {
        "post-cards"
    }

    fn min_fields(&self) -> usize {
        self.columns.min_fields()
    }

    fn render(&self, row: &Row) -> Option<String> {
        self.columns.extract(row).map(|post| self.render_post(&post))
    }
}

/// Render the detail view of one product.
///
/// `item` selects the product by name; `None` picks the first product, which
/// is what previews show when no query string is present.
pub fn render_product_detail(
    table: &Table,
    card: &ProductCard,
    item: Option<&str>,
) -> Option<String> {
    let product = table
        .data_rows()
        .iter()
        .filter_map(|row| card.columns.extract(row))
        .find(|p| item.map_or(true, |name| p.name == name))?;

    let main_image = product.image_or(&card.fallback_image);
    let thumbs: String = product
        .images
        .iter()
        .skip(1)
        .map(|src| {
            format!(
                r#"<img src="{}" class="thumb" loading="lazy" alt="">"#,
                escape_html(src)
            )
        })
        .collect();

    Some(format!(
        r#"<div class="detail-view"><div class="gallery"><img src="{img}" class="detail-img" alt="{name}"><div class="thumbs">{thumbs}</div></div><div><h1>{name}</h1><p class="price">{price}</p><p>{desc}</p>{action}</div></div>"#,
        img = escape_html(main_image),
        name = escape_html(&product.name),
        thumbs = thumbs,
        price = escape_html(&product.price),
        desc = escape_html(&product.description),
        action = CardAction::for_product(&product).to_html(),
    ))
}

/// Render the full article for one post, selected by slug (or the first post).
pub fn render_post_detail(table: &Table, card: &PostCard, slug: Option<&str>) -> Option<String> {
    let post = table
        .data_rows()
        .iter()
        .filter_map(|row| card.columns.extract(row))
        .find(|p| slug.map_or(true, |s| p.slug == s))?;

    let date = if post.date.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="post-date">{}</p>"#, escape_html(&post.date))
    };

    Some(format!(
        r#"<div class="post-hero"><div class="container"><h1>{title}</h1><span class="blog-badge">{category}</span>{date}</div></div><div class="container post-body"><img src="{img}" class="post-img" alt="{title}"><div class="post-content">{body}</div></div>"#,
        title = escape_html(&post.title),
        category = escape_html(&post.category),
        date = date,
        img = escape_html(post.image_or(&card.fallback_image)),
        body = inline_markup(&post.body),
    ))
}

fn query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
