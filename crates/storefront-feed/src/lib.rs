//! Spreadsheet feed parsing for storefront sites.
//!
//! This crate turns the CSV export of a published spreadsheet into a [`Table`]
//! of rows, maps rows onto named store and blog schemas, and provides the text
//! helpers used when those rows become HTML.

pub mod delimited;
pub mod markup;
pub mod schema;
pub mod source;
pub mod table;

pub use delimited::{parse_line, parse_table};
pub use markup::{escape_html, inline_markup, rich_text};
pub use schema::{Post, PostColumns, Product, ProductColumns};
pub use source::{FeedError, FeedSource};
pub use table::{Row, Table};
