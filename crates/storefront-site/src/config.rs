//! Site configuration (`site.toml`).
//!
//! Every section and field is optional; missing values fall back to the
//! starter content a fresh site ships with.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use storefront_feed::{PostColumns, ProductColumns};
use url::Url;

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("Invalid hex color regex")
});

/// Errors that can occur loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse site config: {0}")]
    Parse(String),

    #[error("Failed to serialize site config: {0}")]
    Serialize(String),

    #[error("Business name must not be empty")]
    MissingName,

    #[error("{field} must be a hex color, got {value:?}")]
    InvalidColor { field: &'static str, value: String },

    #[error("{field} must be an http(s) URL, got {value:?}")]
    InvalidUrl { field: &'static str, value: String },
}

/// Complete site configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub identity: Identity,
    pub theme: ThemeConfig,
    pub modules: Modules,
    pub seo: Seo,
    pub social: Social,
    pub hero: Hero,
    pub features: Features,
    pub about: About,
    pub pricing: Pricing,
    pub store: Store,
    pub booking: Booking,
    pub blog: Blog,
    pub legal: Legal,
    pub cta: Cta,
    pub build: BuildSettings,
    pub stats: Vec<Stat>,
    pub testimonials: Vec<Testimonial>,
    pub faq: Vec<FaqEntry>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            identity: Identity::default(),
            theme: ThemeConfig::default(),
            modules: Modules::default(),
            seo: Seo::default(),
            social: Social::default(),
            hero: Hero::default(),
            features: Features::default(),
            about: About::default(),
            pricing: Pricing::default(),
            store: Store::default(),
            booking: Booking::default(),
            blog: Blog::default(),
            legal: Legal::default(),
            cta: Cta::default(),
            build: BuildSettings::default(),
            stats: default_stats(),
            testimonials: Vec::new(),
            faq: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded site config from {}", path.display());

        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Check colors, required identity fields and feed locations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.name.trim().is_empty() {
            return Err(ConfigError::MissingName);
        }

        for (field, value) in [
            ("theme.primary", &self.theme.primary),
            ("theme.accent", &self.theme.accent),
        ] {
            if !HEX_COLOR_RE.is_match(value) {
                return Err(ConfigError::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }

        for (field, value) in [
            ("store.feed", &self.store.feed),
            ("blog.feed", &self.blog.feed),
            ("social.translations", &self.social.translations),
        ] {
            if let Some(value) = value {
                if !is_http_url(value) {
                    return Err(ConfigError::InvalidUrl {
                        field,
                        value: value.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Messaging number with everything but digits removed.
    pub fn whatsapp_digits(&self) -> String {
        storefront_render::cart::clean_phone(&self.social.whatsapp)
    }

    /// Icon used for the web app manifest, falling back to the logo.
    pub fn app_icon(&self) -> Option<&str> {
        self.identity
            .icon
            .as_deref()
            .or(self.identity.logo.as_deref())
    }
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Business identity and contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Canonical site URL, used by the sitemap and structured data
    pub url: String,
    pub address: String,
    /// Raw map iframe markup
    pub map_embed: Option<String>,
    pub description: String,
    pub logo: Option<String>,
    pub icon: Option<String>,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "StopWebRent.com".to_string(),
            phone: "966572562151".to_string(),
            email: "hello@stopwebrent.com".to_string(),
            url: "https://www.stopwebrent.com".to_string(),
            address: "Kaydiem Script Lab, Kolkata".to_string(),
            map_embed: None,
            description: "Stop paying monthly fees.".to_string(),
            logo: None,
            icon: None,
        }
    }
}

/// Named base palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreset {
    #[default]
    CleanCorporate,
    MidnightSaas,
    Glassmorphism,
    CyberpunkNeon,
    LuxuryGold,
    StarkMinimalist,
}

/// Entrance animation for `.reveal` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Animation {
    #[default]
    FadeUp,
    ZoomIn,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub preset: ThemePreset,
    /// Brand color (hex)
    pub primary: String,
    /// Call-to-action color (hex)
    pub accent: String,
    pub heading_font: String,
    pub body_font: String,
    /// Corner radius as a CSS length
    pub radius: String,
    pub animation: Animation,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            preset: ThemePreset::default(),
            primary: "#0F172A".to_string(),
            accent: "#EF4444".to_string(),
            heading_font: "Montserrat".to_string(),
            body_font: "Inter".to_string(),
            radius: "8px".to_string(),
            animation: Animation::default(),
        }
    }
}

/// Which home sections and optional pages are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modules {
    pub hero: bool,
    pub stats: bool,
    pub features: bool,
    pub pricing: bool,
    pub store: bool,
    pub about: bool,
    pub testimonials: bool,
    pub faq: bool,
    pub cta: bool,
    pub blog: bool,
    pub booking: bool,
}

impl Default for Modules {
    fn default() -> Self {
        Self {
            hero: true,
            stats: true,
            features: true,
            pricing: true,
            store: true,
            about: true,
            testimonials: true,
            faq: true,
            cta: true,
            blog: true,
            booking: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seo {
    /// Service area named in structured data
    pub area: String,
    pub keywords: String,
    pub google_verification: Option<String>,
    /// Social share image
    pub og_image: Option<String>,
}

impl Default for Seo {
    fn default() -> Self {
        Self {
            area: "Global".to_string(),
            keywords: "web design".to_string(),
            google_verification: None,
            og_image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Social {
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    /// Messaging number used for checkout and the chat widget
    pub whatsapp: String,
    /// Feed of `element-id,text` pairs for the language toggle
    pub translations: Option<String>,
}

impl Default for Social {
    fn default() -> Self {
        Self {
            facebook: None,
            twitter: None,
            whatsapp: "966572562151".to_string(),
            translations: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    pub headline: String,
    pub subtext: String,
    /// Background images cycled by the carousel
    pub slides: Vec<String>,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            headline: "Stop Paying Rent for Your Website.".to_string(),
            subtext: "The Titan Engine is the world's first 0.1s website architecture that runs on $0 monthly fees. Pay once. Own it forever.".to_string(),
            slides: vec![
                "https://images.unsplash.com/photo-1460925895917-afdab827c52f?q=80&w=1600".to_string(),
                "https://images.unsplash.com/photo-1551288049-bebda4e38f71?q=80&w=1600".to_string(),
                "https://images.unsplash.com/photo-1526374965328-7f61d4dc18c5?q=80&w=1600".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

impl Stat {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

fn default_stats() -> Vec<Stat> {
    vec![
        Stat::new("0.1s", "Speed"),
        Stat::new("$0", "Fees"),
        Stat::new("100%", "Ownership"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub title: String,
    pub items: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Icon name (`bolt`, `wallet`, anything else draws a check mark)
    #[serde(default)]
    pub icon: String,
    pub title: String,
    /// Markdown
    #[serde(default)]
    pub body: String,
}

impl Feature {
    fn new(icon: &str, title: &str, body: &str) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self {
            title: "Value Pillars".to_string(),
            items: vec![
                Feature::new("bolt", "The Performance Pillar", "**0.1s High-Velocity Loading**. While traditional sites take 3-5s, Titan loads instantly."),
                Feature::new("wallet", "The Economic Pillar", "**$0 Monthly Fees**. We eliminated hosting subscriptions. You pay once and own the raw source code forever."),
                Feature::new("table", "The Functional Pillar", "**Google Sheets CMS**. Update prices and photos directly from a simple spreadsheet."),
                Feature::new("shield", "The Authority Pillar", "**Unhackable Security**. By removing the database, we removed the hacker's primary entry point."),
                Feature::new("layers", "The Reliability Pillar", "**Global Edge Deployment**. Distributed across 100+ servers worldwide."),
                Feature::new("star", "The Conversion Pillar", "**One-Tap WhatsApp**. Customers tap one button to start a conversation."),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub title: String,
    pub image: String,
    /// Markdown shown on the home page
    pub summary: String,
    /// Markdown shown on the about page
    pub body: String,
}

impl Default for About {
    fn default() -> Self {
        Self {
            title: "Control Your Empire".to_string(),
            image: "https://images.unsplash.com/photo-1543286386-713df548e9cc?q=80&w=1600".to_string(),
            summary: "No WordPress dashboard. No plugins to update. Just open your private Google Sheet, change a text, and watch your site update globally in seconds.".to_string(),
            body: "**The Trap**\n\nMost business owners rent their website forever.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    /// One-time setup price
    pub price: String,
    pub monthly: String,
    /// Name of the compared alternative
    pub competitor: String,
    pub competitor_monthly: String,
    pub savings: String,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            price: "$199".to_string(),
            monthly: "$0".to_string(),
            competitor: "Wix".to_string(),
            competitor_monthly: "$29/mo".to_string(),
            savings: "$1,466".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Store {
    /// Published CSV feed of products
    pub feed: Option<String>,
    /// Image used for products without a usable one
    pub fallback_image: String,
    pub paypal: Option<String>,
    pub upi: Option<String>,
    pub columns: ProductColumns,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            feed: None,
            fallback_image: "https://images.unsplash.com/photo-1460925895917-afdab827c52f?q=80&w=800".to_string(),
            paypal: None,
            upi: None,
            columns: ProductColumns::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Booking {
    /// Raw scheduling widget markup
    pub embed: Option<String>,
    pub title: String,
    pub subtext: String,
}

impl Default for Booking {
    fn default() -> Self {
        Self {
            embed: None,
            title: "Book Now".to_string(),
            subtext: "Select a slot.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blog {
    /// Published CSV feed of posts
    pub feed: Option<String>,
    pub title: String,
    pub subtext: String,
    pub columns: PostColumns,
}

impl Default for Blog {
    fn default() -> Self {
        Self {
            feed: None,
            title: "Insights".to_string(),
            subtext: "News.".to_string(),
            columns: PostColumns::default(),
        }
    }
}

/// Legal page bodies (Markdown).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Legal {
    pub privacy: String,
    pub terms: String,
}

impl Default for Legal {
    fn default() -> Self {
        Self {
            privacy: "We only collect what you send us through the contact form.".to_string(),
            terms: "All sales are final once the site is delivered.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cta {
    pub title: String,
    pub subtext: String,
    pub button: String,
}

impl Default for Cta {
    fn default() -> Self {
        Self {
            title: "Start Owning Your Future".to_string(),
            subtext: "Stop paying rent.".to_string(),
            button: "Get Started".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Output directory for `build`
    pub output: PathBuf,
    /// Zip written next to the output directory by `build`; empty disables it
    pub archive: String,
    pub minify: bool,
}

impl BuildSettings {
    /// Where `build` writes the archive, if anywhere.
    pub fn archive_path(&self) -> Option<PathBuf> {
        let archive = self.archive.trim();
        (!archive.is_empty()).then(|| PathBuf::from(archive))
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            archive: "site.zip".to_string(),
            minify: true,
        }
    }
}

/// Starter `site.toml` written by `storefront init`.
pub const STARTER_CONFIG: &str = r##"# Storefront site configuration

[identity]
name = "StopWebRent.com"
phone = "966572562151"
email = "hello@stopwebrent.com"
url = "https://www.stopwebrent.com"
address = "Kaydiem Script Lab, Kolkata"
description = "Stop paying monthly fees."

[theme]
# clean-corporate, midnight-saas, glassmorphism, cyberpunk-neon, luxury-gold, stark-minimalist
preset = "clean-corporate"
primary = "#0F172A"
accent = "#EF4444"
heading_font = "Montserrat"
body_font = "Inter"
radius = "8px"
# fade-up, zoom-in, none
animation = "fade-up"

[modules]
hero = true
stats = true
features = true
pricing = true
store = true
about = true
testimonials = true
faq = true
cta = true
blog = true
booking = true

[social]
whatsapp = "966572562151"
# translations = "https://docs.google.com/spreadsheets/d/e/.../pub?output=csv"

[store]
# Published spreadsheet with columns: name, price, description, images, payment link
# feed = "https://docs.google.com/spreadsheets/d/e/.../pub?output=csv"
# upi = "shop@upi"
# paypal = "https://paypal.me/shop"

[blog]
# Columns: slug, title, date, category, summary, image, body
# feed = "https://docs.google.com/spreadsheets/d/e/.../pub?output=csv"
title = "Insights"
subtext = "News."

[[stats]]
value = "0.1s"
label = "Speed"

[[stats]]
value = "$0"
label = "Fees"

[[stats]]
value = "100%"
label = "Ownership"

[[testimonials]]
name = "Aisha R."
quote = "Our site loads instantly and costs nothing to run."

[[faq]]
question = "Do I pay monthly?"
answer = "No. You pay once and own the site."

[build]
output = "dist"
archive = "site.zip"
minify = true
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();

        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.identity.name, "StopWebRent.com");
        assert_eq!(config.store.columns, ProductColumns::default());
        assert!(config.modules.blog);
    }

    #[test]
    fn starter_config_is_valid() {
        let config = SiteConfig::from_toml_str(STARTER_CONFIG).unwrap();

        assert_eq!(config.stats.len(), 3);
        assert_eq!(config.faq[0].question, "Do I pay monthly?");
        assert_eq!(config.theme.preset, ThemePreset::CleanCorporate);
    }

    #[test]
    fn parses_sections_and_columns() {
        let config = SiteConfig::from_toml_str(
            r##"
[theme]
preset = "midnight-saas"
animation = "none"

[modules]
blog = false

[store]
feed = "https://example.com/store.csv"

[store.columns]
name = 1
price = 0
"##,
        )
        .unwrap();

        assert_eq!(config.theme.preset, ThemePreset::MidnightSaas);
        assert_eq!(config.theme.animation, Animation::None);
        assert!(!config.modules.blog);
        assert!(config.modules.store);
        assert_eq!(config.store.columns.name, 1);
        assert_eq!(config.store.columns.description, 2);
    }

    #[test]
    fn rejects_bad_colors() {
        let err = SiteConfig::from_toml_str("[theme]\nprimary = \"blue\"\n").unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidColor {
                field: "theme.primary",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_http_feeds() {
        let err = SiteConfig::from_toml_str("[blog]\nfeed = \"not a url\"\n").unwrap_err();

        assert!(matches!(err, ConfigError::InvalidUrl { field: "blog.feed", .. }));
    }

    #[test]
    fn rejects_empty_name() {
        let err = SiteConfig::from_toml_str("[identity]\nname = \"  \"\n").unwrap_err();

        assert!(matches!(err, ConfigError::MissingName));
    }

    #[test]
    fn serializes_back_to_toml() {
        let config = SiteConfig::default();

        let text = config.to_toml().unwrap();
        let reparsed = SiteConfig::from_toml_str(&text).unwrap();

        assert_eq!(reparsed, config);
    }

    #[test]
    fn whatsapp_digits_strip_formatting() {
        let mut config = SiteConfig::default();
        config.social.whatsapp = "+966 57-256".to_string();

        assert_eq!(config.whatsapp_digits(), "96657256");
    }

    #[test]
    fn loads_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, "[identity]\nname = \"Lamp Shop\"\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();

        assert_eq!(config.identity.name, "Lamp Shop");
        assert!(matches!(
            SiteConfig::load(&temp.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn archive_path_follows_build_settings() {
        let mut build = BuildSettings::default();
        assert_eq!(build.archive_path(), Some(PathBuf::from("site.zip")));

        build.archive = "custom-name.zip".to_string();
        assert_eq!(build.archive_path(), Some(PathBuf::from("custom-name.zip")));

        build.archive = "  ".to_string();
        assert_eq!(build.archive_path(), None);
    }
}
