//! Static site generator for storefront sites.
//!
//! Builds a complete storefront (pages, theme, client runtime and support
//! files) from one `site.toml`, in memory first, then to a directory or a zip.

pub mod archive;
pub mod assets;
pub mod builder;
pub mod config;
pub mod pages;
pub mod templates;
pub mod theme;

pub use builder::{BuildError, BuildOptions, BuildResult, SiteBuilder, SiteBundle};
pub use config::{ConfigError, SiteConfig, STARTER_CONFIG};
pub use pages::Page;
