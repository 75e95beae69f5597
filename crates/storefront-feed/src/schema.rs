//! Named column schemas for store and blog feeds.
//!
//! Feed columns are positional in the spreadsheet; these schemas give each
//! position a name so renderers never index rows with bare numbers.

use serde::{Deserialize, Serialize};

use crate::table::Row;

/// Separator between multiple image URLs inside one cell.
pub const IMAGE_SEPARATOR: char = '|';

/// Image cells this short or shorter are treated as absent.
const MIN_IMAGE_LEN: usize = 5;

/// Column positions of a store feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductColumns {
    pub name: usize,
    pub price: usize,
    pub description: usize,
    /// One or more image URLs joined by `|`
    pub images: usize,
    /// External payment link; rows without one get a cart action
    pub payment_link: usize,
}

impl Default for ProductColumns {
    fn default() -> Self {
        Self {
            name: 0,
            price: 1,
            description: 2,
            images: 3,
            payment_link: 4,
        }
    }
}

impl ProductColumns {
    /// Minimum field count for a row to describe a product (name and price).
    pub fn min_fields(&self) -> usize {
        self.name.max(self.price) + 1
    }

    /// Read a product out of a row, or `None` if the row is too short.
    pub fn extract(&self, row: &Row) -> Option<Product> {
        if row.len() < self.min_fields() || row.is_blank() {
            return None;
        }

        let payment_link = row
            .get(self.payment_link)
            .filter(|link| link.contains("http"))
            .map(str::to_string);

        Some(Product {
            name: row.field(self.name).to_string(),
            price: row.field(self.price).to_string(),
            description: row.field(self.description).to_string(),
            images: split_images(row.field(self.images)),
            payment_link,
        })
    }
}

/// A product read from a store feed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub price: String,
    pub description: String,
    pub images: Vec<String>,
    pub payment_link: Option<String>,
}

impl Product {
    /// The card image: the first listed image if usable, else the fallback.
    pub fn image_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        usable_image(self.images.first().map(String::as_str)).unwrap_or(fallback)
    }
}

/// Column positions of a blog feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostColumns {
    /// Identifier used in `post.html?id=`
    pub slug: usize,
    pub title: usize,
    pub date: usize,
    pub category: usize,
    pub summary: usize,
    pub image: usize,
    /// Article body with light inline markup
    pub body: usize,
}

impl Default for PostColumns {
    fn default() -> Self {
        Self {
            slug: 0,
            title: 1,
            date: 2,
            category: 3,
            summary: 4,
            image: 5,
            body: 6,
        }
    }
}

impl PostColumns {
    /// Minimum field count for a row to be listed as a post.
    pub fn min_fields(&self) -> usize {
        self.slug
            .max(self.title)
            .max(self.category)
            .max(self.summary)
            + 1
    }

    pub fn extract(&self, row: &Row) -> Option<Post> {
        if row.len() < self.min_fields() || row.is_blank() {
            return None;
        }

        Some(Post {
            slug: row.field(self.slug).to_string(),
            title: row.field(self.title).to_string(),
            date: row.field(self.date).to_string(),
            category: row.field(self.category).to_string(),
            summary: row.field(self.summary).to_string(),
            image: row.field(self.image).to_string(),
            body: row.field(self.body).to_string(),
        })
    }
}

/// A blog post read from a blog feed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub category: String,
    pub summary: String,
    pub image: String,
    pub body: String,
}

impl Post {
    pub fn image_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        usable_image(Some(self.image.as_str())).unwrap_or(fallback)
    }
}

fn split_images(cell: &str) -> Vec<String> {
    cell.split(IMAGE_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn usable_image(candidate: Option<&str>) -> Option<&str> {
    candidate.filter(|url| url.len() > MIN_IMAGE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_product_with_defaults() {
        let row = Row::from(vec![
            "Widget",
            "9.99",
            "A nice widget",
            "https://img/a.png | https://img/b.png",
        ]);

        let product = ProductColumns::default().extract(&row).unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.images, vec!["https://img/a.png", "https://img/b.png"]);
        assert_eq!(product.payment_link, None);
        assert_eq!(product.image_or("default.png"), "https://img/a.png");
    }

    #[test]
    fn rejects_rows_without_price() {
        let row = Row::from(vec!["Widget"]);

        assert!(ProductColumns::default().extract(&row).is_none());
    }

    #[test]
    fn short_image_falls_back() {
        let row = Row::from(vec!["Widget", "9.99", "", "x.png"]);

        let product = ProductColumns::default().extract(&row).unwrap();

        assert_eq!(product.image_or("default.png"), "default.png");
    }

    #[test]
    fn payment_link_requires_http() {
        let columns = ProductColumns::default();
        let with_link = Row::from(vec!["A", "1", "", "", "https://pay.example/x"]);
        let without = Row::from(vec!["A", "1", "", "", "call us"]);

        assert_eq!(
            columns.extract(&with_link).unwrap().payment_link.as_deref(),
            Some("https://pay.example/x")
        );
        assert_eq!(columns.extract(&without).unwrap().payment_link, None);
    }

    #[test]
    fn honours_custom_positions() {
        let columns = ProductColumns {
            name: 1,
            price: 0,
            ..Default::default()
        };
        let row = Row::from(vec!["12.00", "Lamp"]);

        let product = columns.extract(&row).unwrap();

        assert_eq!(product.name, "Lamp");
        assert_eq!(product.price, "12.00");
    }

    #[test]
    fn extracts_post() {
        let row = Row::from(vec![
            "launch",
            "We launched",
            "2024-01-01",
            "News",
            "Big day",
            "https://img/p.png",
            "**Hello** world",
        ]);

        let post = PostColumns::default().extract(&row).unwrap();

        assert_eq!(post.slug, "launch");
        assert_eq!(post.category, "News");
        assert_eq!(post.body, "**Hello** world");
    }

    #[test]
    fn post_needs_five_fields() {
        let row = Row::from(vec!["a", "b", "c", "d"]);

        assert_eq!(PostColumns::default().min_fields(), 5);
        assert!(PostColumns::default().extract(&row).is_none());
    }
}
