//! Generated support files: web app manifest, service worker, crawler files,
//! structured data and inline icons.

use serde_json::json;

use crate::config::SiteConfig;
use crate::pages::Page;

/// Cache name used by the service worker.
pub const CACHE_NAME: &str = "storefront-v1";

/// Web app manifest (`manifest.json`).
pub fn manifest_json(config: &SiteConfig) -> Result<String, serde_json::Error> {
    let icons: Vec<serde_json::Value> = config
        .app_icon()
        .map(|src| json!({ "src": src, "sizes": "512x512", "type": "image/png" }))
        .into_iter()
        .collect();

    serde_json::to_string_pretty(&json!({
        "name": config.identity.name,
        "short_name": config.identity.name,
        "description": config.identity.description,
        "start_url": "./index.html",
        "display": "standalone",
        "background_color": config.theme.preset.palette().background,
        "theme_color": config.theme.primary,
        "icons": icons,
    }))
}

/// Service worker that pre-caches the page set and serves from cache first.
pub fn service_worker(pages: &[Page]) -> String {
    let mut urls: Vec<String> = pages
        .iter()
        .map(|p| format!("./{}", p.file_name()))
        .collect();
    urls.push("./assets/theme.css".to_string());
    urls.push(format!("./{}", storefront_render::RUNTIME_PATH));

    let list = urls
        .iter()
        .map(|u| format!("'{}'", u))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"const CACHE = '{cache}';
const PRECACHE = [{list}];

self.addEventListener('install', (event) => {{
  event.waitUntil(caches.open(CACHE).then((cache) => cache.addAll(PRECACHE)));
}});

self.addEventListener('activate', (event) => {{
  event.waitUntil(
    caches.keys().then((keys) =>
      Promise.all(keys.filter((key) => key !== CACHE).map((key) => caches.delete(key)))
    )
  );
}});

self.addEventListener('fetch', (event) => {{
  if (event.request.method !== 'GET') return;
  event.respondWith(caches.match(event.request).then((hit) => hit || fetch(event.request)));
}});
"#,
        cache = CACHE_NAME,
        list = list,
    )
}

/// `robots.txt` pointing crawlers at the sitemap.
pub fn robots_txt(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
        site_root(config)
    )
}

/// `sitemap.xml` listing every page that stands on its own.
pub fn sitemap_xml(config: &SiteConfig, pages: &[Page]) -> String {
    let root = site_root(config);

    let urls: Vec<String> = pages
        .iter()
        .filter(|p| p.in_sitemap())
        .map(|page| {
            let loc = match page {
                Page::Home => format!("{}/", root),
                _ => format!("{}/{}", root, page.file_name()),
            };
            format!(
                "  <url>\n    <loc>{}</loc>\n  </url>",
                storefront_feed::escape_html(&loc)
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>
"#,
        urls.join("\n")
    )
}

/// JSON-LD `LocalBusiness` block for search engines.
pub fn structured_data(config: &SiteConfig) -> Result<String, serde_json::Error> {
    let identity = &config.identity;

    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "name": identity.name,
        "url": identity.url,
        "telephone": identity.phone,
        "email": identity.email,
        "address": identity.address,
        "description": identity.description,
        "areaServed": config.seo.area,
    });

    if let Some(logo) = &identity.logo {
        data["logo"] = json!(logo);
    }

    let same_as: Vec<&String> = [&config.social.facebook, &config.social.twitter]
        .into_iter()
        .flatten()
        .collect();
    if !same_as.is_empty() {
        data["sameAs"] = json!(same_as);
    }

    let json = serde_json::to_string(&data)?.replace("</", "<\\/");
    Ok(format!(
        r#"<script type="application/ld+json">{}</script>"#,
        json
    ))
}

/// Inline SVG for a feature icon name.
///
/// Names containing `bolt` or `wallet` get their glyph; anything else draws a
/// check mark.
pub fn icon_svg(name: &str) -> String {
    let name = name.trim().to_lowercase();

    let path = if name.contains("bolt") {
        BOLT_PATH
    } else if name.contains("wallet") {
        WALLET_PATH
    } else {
        CHECK_PATH
    };

    format!(
        r#"<svg viewBox="0 0 24 24" width="32" height="32" fill="currentColor" aria-hidden="true"><path d="{}"/></svg>"#,
        path
    )
}

fn site_root(config: &SiteConfig) -> &str {
    config.identity.url.trim_end_matches('/')
}

const CHECK_PATH: &str = "M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2zm-2 15l-5-5 1.41-1.41L10 14.17l7.59-7.59L19 8l-9 9z";

const BOLT_PATH: &str = "M11 21h-1l1-7H7.5c-.58 0-.57-.32-.38-.66.19-.34.05-.08.07-.12C8.48 10.94 10.42 7.54 13 3h1l-1 7h3.5c.49 0 .56.33.47.51l-.07.15C12.96 17.55 11 21 11 21z";

const WALLET_PATH: &str = "M21 18v1c0 1.1-.9 2-2 2H5c-1.11 0-2-.9-2-2V5c0-1.1.89-2 2-2h14c1.1 0 2 .9 2 2v1h-9c-1.11 0-2 .9-2 2v8c0 1.1.89 2 2 2h9zm-9-2h10V8H12v8zm4-2.5c-.83 0-1.5-.67-1.5-1.5s.67-1.5 1.5-1.5 1.5.67 1.5 1.5-.67 1.5-1.5 1.5z";
