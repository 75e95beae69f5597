//! Site builder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use storefront_feed::rich_text;
use storefront_render::{
    runtime_script, Binding, RenderTarget, RuntimeConfig, POST_NOT_FOUND, PRODUCT_NOT_FOUND,
    RUNTIME_PATH,
};

use crate::archive;
use crate::assets;
use crate::config::SiteConfig;
use crate::pages::Page;
use crate::templates::{Context, FeatureView, NavLink, TemplateEngine};
use crate::theme;

/// Path of the generated stylesheet inside a site.
pub const THEME_PATH: &str = "assets/theme.css";

/// Options that change how a site is built, independent of its content.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Minify the stylesheet
    pub minify: bool,

    /// Build for the preview server: detail pages fall back to the first
    /// entry and the service worker is not registered
    pub preview: bool,

    /// Extra script URLs appended to every page
    pub extra_scripts: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            minify: true,
            preview: false,
            extra_scripts: vec![],
        }
    }
}

/// Result of writing a bundle to disk.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of HTML pages written
    pub pages: usize,

    /// Number of files written, pages included
    pub files: usize,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to generate {path}: {message}")]
    AssetError { path: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Failed to write archive: {0}")]
    ArchiveError(#[from] archive::ArchiveError),
}

/// A fully built site held in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct SiteBundle {
    files: BTreeMap<String, Vec<u8>>,
    pages: usize,
}

impl SiteBundle {
    /// Contents of one file.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Relative paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of HTML pages.
    pub fn pages(&self) -> usize {
        self.pages
    }

    fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Write every file under `dir`.
    pub fn write_dir(&self, dir: &Path) -> Result<BuildResult, BuildError> {
        for (path, contents) in self.entries() {
            let target = dir.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
            }
            fs::write(&target, contents)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", target.display(), e)))?;
        }

        Ok(BuildResult {
            pages: self.pages,
            files: self.files.len(),
            output_dir: dir.to_path_buf(),
        })
    }

    /// Write the bundle as a zip archive at `path`.
    pub fn write_archive(&self, path: &Path) -> Result<(), BuildError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }
        let file = fs::File::create(path)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))?;

        archive::write_zip(file, self.entries())?;
        Ok(())
    }

    /// The bundle as zip bytes.
    pub fn to_zip(&self) -> Result<Vec<u8>, BuildError> {
        Ok(archive::zip_bytes(self.entries())?)
    }
}

/// Values shared by every page of one build.
struct Shared {
    fonts_url: String,
    whatsapp: String,
    structured_data: String,
    runtime_config: String,
    features: Vec<FeatureView>,
    about_summary: String,
}

/// Static site builder.
pub struct SiteBuilder {
    config: SiteConfig,
    options: BuildOptions,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: SiteConfig, options: BuildOptions) -> Result<Self, BuildError> {
        let templates =
            TemplateEngine::new().map_err(|e| BuildError::TemplateError(e.to_string()))?;

        Ok(Self {
            config,
            options,
            templates,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Build the site into memory.
    pub fn build(&self) -> Result<SiteBundle, BuildError> {
        let pages = Page::enabled(&self.config.modules);
        let shared = self.shared()?;

        // Render pages in parallel
        let rendered: Vec<Result<(Page, String), BuildError>> = pages
            .par_iter()
            .map(|page| self.render_page(*page, &shared).map(|html| (*page, html)))
            .collect();

        let mut bundle = SiteBundle::default();
        for result in rendered {
            let (page, html) = result?;
            bundle.insert(page.file_name(), html);
            bundle.pages += 1;
        }

        self.add_assets(&mut bundle, &pages)?;

        tracing::debug!(
            "Built {} pages, {} files for {}",
            bundle.pages,
            bundle.len(),
            self.config.identity.name
        );

        Ok(bundle)
    }

    fn shared(&self) -> Result<Shared, BuildError> {
        let structured_data =
            assets::structured_data(&self.config).map_err(|e| BuildError::AssetError {
                path: "structured data".to_string(),
                message: e.to_string(),
            })?;

        let runtime_config = self
            .runtime_config()
            .to_script_tag()
            .map_err(|e| BuildError::AssetError {
                path: "runtime config".to_string(),
                message: e.to_string(),
            })?;

        let features = self
            .config
            .features
            .items
            .iter()
            .map(|f| FeatureView {
                icon: assets::icon_svg(&f.icon),
                title: f.title.clone(),
                body: rich_text(&f.body),
            })
            .collect();

        Ok(Shared {
            fonts_url: theme::font_stylesheet_url(&self.config.theme),
            whatsapp: self.config.whatsapp_digits(),
            structured_data,
            runtime_config,
            features,
            about_summary: rich_text(&self.config.about.summary),
        })
    }

    /// Settings handed to the client runtime.
    pub fn runtime_config(&self) -> RuntimeConfig {
        let config = &self.config;

        RuntimeConfig {
            store_feed: config.store.feed.clone(),
            blog_feed: config.blog.feed.clone().filter(|_| config.modules.blog),
            translations_feed: config.social.translations.clone(),
            fallback_image: config.store.fallback_image.clone(),
            product_columns: config.store.columns,
            post_columns: config.blog.columns,
            whatsapp: config.whatsapp_digits(),
            upi: config.store.upi.clone(),
            paypal: config.store.paypal.clone(),
            preview: self.options.preview,
            ..Default::default()
        }
    }

    fn navigation(&self, current: Page) -> Vec<NavLink> {
        let modules = &self.config.modules;

        let mut links = vec![("Home", "index.html".to_string())];
        if modules.store {
            links.push(("Store", "index.html#inventory".to_string()));
        }
        if modules.blog {
            links.push(("Blog", Page::Blog.file_name().to_string()));
        }
        if modules.booking {
            links.push(("Book", Page::Booking.file_name().to_string()));
        }
        links.push(("About", Page::About.file_name().to_string()));
        links.push(("Contact", Page::Contact.file_name().to_string()));

        links
            .into_iter()
            .map(|(title, href)| NavLink {
                active: href == current.file_name(),
                title: title.to_string(),
                href,
            })
            .collect()
    }

    /// The render target a page hands to the runtime, if any.
    fn target(&self, page: Page) -> Option<RenderTarget> {
        let store_ready = self.config.store.feed.is_some();
        let blog_ready = self.config.blog.feed.is_some();

        let (target, ready, empty) = match page {
            Page::Home if self.config.modules.store => (
                RenderTarget::new("inv-grid")
                    .with_class("grid-3")
                    .with_binding(Binding::ProductCards),
                store_ready,
                "Products coming soon.",
            ),
            Page::Product => (
                RenderTarget::new("prod-box").with_binding(Binding::ProductDetail),
                store_ready,
                PRODUCT_NOT_FOUND,
            ),
            Page::Blog => (
                RenderTarget::new("blog-grid")
                    .with_class("grid-3")
                    .with_binding(Binding::PostCards),
                blog_ready,
                "No posts yet.",
            ),
            Page::Post => (
                RenderTarget::new("post-container").with_binding(Binding::PostDetail),
                blog_ready,
                POST_NOT_FOUND,
            ),
            _ => return None,
        };

        Some(if ready {
            target
        } else {
            target.with_placeholder(empty)
        })
    }

    fn body(&self, page: Page) -> String {
        match page {
            Page::About => rich_text(&self.config.about.body),
            Page::Privacy => rich_text(&self.config.legal.privacy),
            Page::Terms => rich_text(&self.config.legal.terms),
            _ => String::new(),
        }
    }

    /// Render a single page.
    fn render_page(&self, page: Page, shared: &Shared) -> Result<String, BuildError> {
        let context = Context {
            title: page.title().to_string(),
            page: page.file_name(),
            site: &self.config,
            nav: self.navigation(page),
            fonts_url: shared.fonts_url.clone(),
            icon: self.config.app_icon(),
            whatsapp: shared.whatsapp.clone(),
            structured_data: shared.structured_data.clone(),
            runtime_config: shared.runtime_config.clone(),
            extra_scripts: self.options.extra_scripts.clone(),
            features: shared.features.clone(),
            about_summary: shared.about_summary.clone(),
            body: self.body(page),
            target: self.target(page).map(|t| t.to_html()).unwrap_or_default(),
        };

        self.templates
            .render_page(page.template(), &context)
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", page.file_name(), e)))
    }

    /// Generate stylesheet, runtime and support files.
    fn add_assets(&self, bundle: &mut SiteBundle, pages: &[Page]) -> Result<(), BuildError> {
        let css = theme::theme_css(&self.config.theme);
        let css = if self.options.minify {
            theme::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Serving unminified theme: {}", e);
                css
            })
        } else {
            css
        };
        bundle.insert(THEME_PATH, css);

        bundle.insert(RUNTIME_PATH, runtime_script());

        let manifest = assets::manifest_json(&self.config).map_err(|e| BuildError::AssetError {
            path: "manifest.json".to_string(),
            message: e.to_string(),
        })?;
        bundle.insert("manifest.json", manifest);

        bundle.insert("service-worker.js", assets::service_worker(pages));
        bundle.insert("robots.txt", assets::robots_txt(&self.config));
        bundle.insert("sitemap.xml", assets::sitemap_xml(&self.config, pages));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn page(bundle: &SiteBundle, path: &str) -> String {
        String::from_utf8(bundle.get(path).unwrap().to_vec()).unwrap()
    }

    fn build(config: SiteConfig) -> SiteBundle {
        SiteBuilder::new(config, BuildOptions::default())
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn builds_full_file_set() {
        let bundle = build(SiteConfig::default());

        let paths: Vec<&str> = bundle.paths().collect();

        assert_eq!(
            paths,
            vec![
                "about.html",
                "assets/storefront.js",
                "assets/theme.css",
                "blog.html",
                "booking.html",
                "contact.html",
                "index.html",
                "manifest.json",
                "post.html",
                "privacy.html",
                "product.html",
                "robots.txt",
                "service-worker.js",
                "sitemap.xml",
                "terms.html",
            ]
        );
        assert_eq!(bundle.pages(), 9);
    }

    #[test]
    fn blog_off_drops_blog_pages() {
        let mut config = SiteConfig::default();
        config.modules.blog = false;

        let bundle = build(config);

        assert!(!bundle.contains("blog.html"));
        assert!(!bundle.contains("post.html"));
        assert!(!page(&bundle, "index.html").contains(r#"href="blog.html""#));
        assert!(!page(&bundle, "service-worker.js").contains("blog.html"));
    }

    #[test]
    fn pages_carry_render_targets() {
        let mut config = SiteConfig::default();
        config.store.feed = Some("https://example.com/store.csv".to_string());

        let bundle = build(config);

        let home = page(&bundle, "index.html");
        assert!(home.contains(r#"<div id="inv-grid" class="grid-3" data-render="product-cards"><p class="placeholder">Loading...</p></div>"#));
        assert!(page(&bundle, "product.html").contains(r#"data-render="product-detail""#));
        assert!(page(&bundle, "blog.html").contains("No posts yet."));
        assert!(page(&bundle, "post.html").contains(r#"data-render="post-detail""#));
    }

    #[test]
    fn runtime_config_reflects_site() {
        let mut config = SiteConfig::default();
        config.store.feed = Some("https://example.com/store.csv".to_string());
        config.store.upi = Some("shop@upi".to_string());
        config.modules.blog = false;
        config.blog.feed = Some("https://example.com/blog.csv".to_string());

        let builder = SiteBuilder::new(
            config,
            BuildOptions {
                preview: true,
                ..Default::default()
            },
        )
        .unwrap();
        let runtime = builder.runtime_config();

        assert_eq!(runtime.store_feed.as_deref(), Some("https://example.com/store.csv"));
        assert_eq!(runtime.blog_feed, None);
        assert_eq!(runtime.whatsapp, "966572562151");
        assert_eq!(runtime.upi.as_deref(), Some("shop@upi"));
        assert!(runtime.preview);

        let home = page(&builder.build().unwrap(), "index.html");
        assert!(home.contains(r#""preview":true"#));
    }

    #[test]
    fn renders_markdown_copy() {
        let mut config = SiteConfig::default();
        config.legal.privacy = "We keep **nothing**.\n\n* no cookies\n* no tracking".to_string();

        let bundle = build(config);

        let privacy = page(&bundle, "privacy.html");
        assert!(privacy.contains("<strong>nothing</strong>"));
        assert!(privacy.contains("<li>no cookies</li>"));
        assert!(page(&bundle, "index.html").contains("<strong>0.1s High-Velocity Loading</strong>"));
    }

    #[test]
    fn navigation_marks_current_page() {
        let bundle = build(SiteConfig::default());

        let contact = page(&bundle, "contact.html");

        assert!(contact.contains(r#"<a href="contact.html" class="active">Contact</a>"#));
        assert!(!contact.contains(r#"<a href="about.html" class="active">"#));
    }

    #[test]
    fn minify_option_controls_stylesheet() {
        let minified = build(SiteConfig::default());
        let plain = SiteBuilder::new(
            SiteConfig::default(),
            BuildOptions {
                minify: false,
                ..Default::default()
            },
        )
        .unwrap()
        .build()
        .unwrap();

        assert!(minified.get(THEME_PATH).unwrap().len() < plain.get(THEME_PATH).unwrap().len());
    }

    #[test]
    fn preview_scripts_are_injected() {
        let bundle = SiteBuilder::new(
            SiteConfig::default(),
            BuildOptions {
                extra_scripts: vec!["__hmr.js".to_string()],
                ..Default::default()
            },
        )
        .unwrap()
        .build()
        .unwrap();

        assert!(page(&bundle, "about.html").contains(r#"<script src="__hmr.js"></script>"#));
    }

    #[test]
    fn writes_directory_and_archive() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let bundle = build(SiteConfig::default());

        let result = bundle.write_dir(&out).unwrap();
        bundle.write_archive(&temp.path().join("site.zip")).unwrap();

        assert_eq!(result.pages, 9);
        assert_eq!(result.files, bundle.len());
        assert!(out.join("index.html").exists());
        assert!(out.join("assets").join("storefront.js").exists());

        let zip = fs::read(temp.path().join("site.zip")).unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip)).unwrap();
        assert_eq!(archive.len(), bundle.len());
    }
}
