//! Theme stylesheet generation.

use crate::config::{Animation, ThemeConfig, ThemePreset};

/// Base colors of a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub card: &'static str,
    pub nav: &'static str,
}

impl ThemePreset {
    pub fn palette(&self) -> Palette {
        match self {
            Self::CleanCorporate => Palette {
                background: "#ffffff",
                text: "#0f172a",
                card: "rgba(255,255,255,0.8)",
                nav: "rgba(255,255,255,0.9)",
            },
            Self::MidnightSaas => Palette {
                background: "#0f172a",
                text: "#f8fafc",
                card: "rgba(30,41,59,0.9)",
                nav: "rgba(15,23,42,0.9)",
            },
            Self::Glassmorphism => Palette {
                background: "#eef2ff",
                text: "#0f172a",
                card: "rgba(255,255,255,0.35)",
                nav: "rgba(255,255,255,0.5)",
            },
            Self::CyberpunkNeon => Palette {
                background: "#050505",
                text: "#00ff9d",
                card: "rgba(10,10,10,0.9)",
                nav: "rgba(0,0,0,0.9)",
            },
            Self::LuxuryGold => Palette {
                background: "#101010",
                text: "#D4AF37",
                card: "rgba(20,20,20,0.9)",
                nav: "rgba(0,0,0,0.9)",
            },
            Self::StarkMinimalist => Palette {
                background: "#ffffff",
                text: "#000000",
                card: "#ffffff",
                nav: "rgba(255,255,255,1)",
            },
        }
    }
}

/// Generate the site stylesheet for a theme.
pub fn theme_css(theme: &ThemeConfig) -> String {
    let palette = theme.preset.palette();

    let root = format!(
        ":root {{ --p: {}; --s: {}; --bg: {}; --txt: {}; --card: {}; --nav: {}; --radius: {}; --h-font: '{}', sans-serif; --b-font: '{}', sans-serif; }}\n",
        theme.primary,
        theme.accent,
        palette.background,
        palette.text,
        palette.card,
        palette.nav,
        theme.radius,
        css_font_name(&theme.heading_font),
        css_font_name(&theme.body_font),
    );

    let mut css = root;
    css.push_str(BASE_CSS);
    css.push_str(animation_css(theme.animation));
    css.push_str(RESPONSIVE_CSS);
    css
}

/// Google Fonts stylesheet URL for the theme's heading and body fonts.
pub fn font_stylesheet_url(theme: &ThemeConfig) -> String {
    format!(
        "https://fonts.googleapis.com/css2?family={}:wght@400;700;900&family={}:wght@300;400;600&display=swap",
        theme.heading_font.trim().replace(' ', "+"),
        theme.body_font.trim().replace(' ', "+"),
    )
}

/// Minify CSS using lightningcss.
pub fn minify_css(css: &str) -> Result<String, String> {
    use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| format!("CSS parse error: {}", e))?;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| format!("CSS minify error: {}", e))?;

    Ok(minified.code)
}

fn css_font_name(font: &str) -> String {
    font.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect()
}

fn animation_css(animation: Animation) -> &'static str {
    match animation {
        Animation::FadeUp => {
            ".reveal { opacity: 0; transform: translateY(30px); transition: all 0.8s ease; }\n.reveal.active { opacity: 1; transform: translateY(0); }\n"
        }
        Animation::ZoomIn => {
            ".reveal { opacity: 0; transform: scale(0.92); transition: all 0.8s ease; }\n.reveal.active { opacity: 1; transform: scale(1); }\n"
        }
        Animation::None => "",
    }
}

const BASE_CSS: &str = r#"* { box-sizing: border-box; }
html { scroll-behavior: smooth; font-size: 16px; }
body { background-color: var(--bg); color: var(--txt); font-family: var(--b-font); margin: 0; line-height: 1.6; overflow-x: hidden; }
h1, h2, h3 { font-family: var(--h-font); color: var(--txt); font-weight: 800; line-height: 1.2; margin-bottom: 0.5rem; }
img { max-width: 100%; }

.container { max-width: 1280px; margin: 0 auto; padding: 0 24px; }
.section-head { text-align: center; margin-bottom: 3rem; }
.btn { display: inline-flex; align-items: center; justify-content: center; padding: 0.8rem 2rem; border-radius: var(--radius); font-weight: 700; text-transform: uppercase; cursor: pointer; border: none; text-decoration: none; color: white; transition: 0.3s; min-height: 3rem; }
.btn-primary { background: var(--p); }
.btn-accent { background: var(--s); }
.btn-glass { background: rgba(255,255,255,0.2); backdrop-filter: blur(10px); }
.btn-light { background: white; color: var(--s); }
.btn-block { width: 100%; }

nav { position: fixed; top: 0; width: 100%; z-index: 1000; padding: 1rem 0; background: var(--nav); backdrop-filter: blur(12px); border-bottom: 1px solid rgba(128,128,128,0.1); }
.nav-flex { display: flex; justify-content: space-between; align-items: center; }
.nav-logo { font-family: var(--h-font); font-weight: 900; font-size: 1.25rem; color: var(--txt); text-decoration: none; display: flex; align-items: center; gap: 0.5rem; }
.nav-logo img { height: 40px; }
.nav-links a { margin-left: 2rem; text-decoration: none; font-weight: 600; color: var(--txt); opacity: 0.8; transition: 0.2s; }
.nav-links a:hover { opacity: 1; color: var(--s); }
.lang-toggle { margin-left: 2rem; background: none; border: 1px solid rgba(128,128,128,0.3); border-radius: var(--radius); color: var(--txt); padding: 0.3rem 0.8rem; cursor: pointer; }
.mobile-menu { display: none; font-size: 1.5rem; cursor: pointer; background: none; border: none; color: var(--txt); }

.hero { min-height: 90vh; display: flex; align-items: center; justify-content: center; position: relative; background: var(--p); padding-top: 80px; }
.hero-inner { min-height: 40vh; }
.hero-inner h1, .hero-inner p { color: white; }
.hero-content { z-index: 2; width: 100%; text-align: center; }
.hero-actions { display: flex; gap: 1rem; justify-content: center; flex-wrap: wrap; }
.hero h1 { color: white !important; font-size: clamp(2.5rem, 5vw, 4.5rem); text-shadow: 0 4px 20px rgba(0,0,0,0.5); }
.hero p { color: rgba(255,255,255,0.95); max-width: 700px; margin: 0 auto 2rem; font-size: 1.2rem; }
.hero-blog { background-size: cover; background-position: center; }
.carousel-slide { position: absolute; top: 0; left: 0; width: 100%; height: 100%; background-size: cover; background-position: center; opacity: 0; transition: 1.5s; }
.carousel-slide.active { opacity: 1; }
.hero-overlay { background: rgba(0,0,0,0.5); position: absolute; top: 0; left: 0; width: 100%; height: 100%; z-index: 1; }

.stats { background: var(--p); color: white; padding: 3rem 0; text-align: center; }
.stats h3 { color: #ffffff; margin: 0; font-size: 3rem; }
.stats p { color: rgba(255,255,255,0.7); }

.grid-3 { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 2rem; }
.about-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 3rem; align-items: center; }
.about-grid img { width: 100%; border-radius: var(--radius); box-shadow: 0 20px 50px rgba(0,0,0,0.2); }
.contact-grid { display: grid; grid-template-columns: 1fr 2fr; gap: 3rem; }
.prose { padding: 3rem 24px; }
.prose p, .prose li { opacity: 0.9; margin-bottom: 1rem; }
.prose ul { padding-left: 1.5rem; }

.card { background: var(--card); padding: 2rem; border-radius: var(--radius); border: 1px solid rgba(128,128,128,0.1); transition: 0.3s; height: 100%; }
.card:hover { transform: translateY(-5px); box-shadow: 0 10px 30px rgba(0,0,0,0.1); border-color: var(--s); }
.card h3 a { color: var(--txt); text-decoration: none; }
.feature-icon { color: var(--s); margin-bottom: 1rem; }
.prod-img { width: 100%; height: 250px; object-fit: cover; border-radius: calc(var(--radius) - 4px); margin-bottom: 1rem; background: #f1f5f9; }
.price { font-weight: bold; color: var(--s); margin-bottom: 0.5rem; }
.desc { font-size: 0.9rem; opacity: 0.8; margin-bottom: 1rem; }
.placeholder { text-align: center; padding: 4rem; opacity: 0.7; }
.store { background: rgba(0,0,0,0.02); }
.testimonial { text-align: center; }

.detail-view { display: grid; grid-template-columns: 1fr 1fr; gap: 3rem; align-items: start; padding: 150px 0 4rem; }
.detail-img { width: 100%; border-radius: 20px; }
.detail-view .price { font-size: 1.5rem; }
.thumbs { display: flex; gap: 0.5rem; margin-top: 0.5rem; flex-wrap: wrap; }
.thumb { width: 80px; height: 80px; object-fit: cover; border-radius: calc(var(--radius) - 4px); }

.post-hero { background: var(--p); padding: 8rem 1rem 4rem; color: white; text-align: center; }
.post-hero h1 { color: white; }
.post-date { opacity: 0.8; }
.post-body { max-width: 800px; padding: 3rem 1rem; }
.post-img { width: 100%; border-radius: 12px; margin-bottom: 2rem; }
.post-content { line-height: 1.8; font-size: 1.1rem; }

.pricing-wrapper { overflow-x: auto; margin: 2rem 0; }
.pricing-table { width: 100%; border-collapse: collapse; min-width: 600px; }
.pricing-table th { background: var(--p); color: white; padding: 1.5rem; }
.pricing-table th.ours { background: var(--s); }
.pricing-table td { padding: 1.5rem; border-bottom: 1px solid rgba(128,128,128,0.1); }
.pricing-table .savings { color: var(--s); font-size: 1.3rem; }

.blog-badge { background: var(--s); color: white; padding: 0.3rem 0.8rem; border-radius: 50px; font-size: 0.75rem; font-weight: bold; margin-bottom: 1rem; display: inline-block; }

.faq { max-width: 800px; }
details { border-bottom: 1px solid rgba(128,128,128,0.2); padding: 1rem 0; }
summary { font-weight: 700; cursor: pointer; }
.cta { background: var(--s); color: white; text-align: center; }
.cta h2 { color: white; }
.cta p { margin-bottom: 2rem; }

form label { display: block; font-weight: 600; margin-top: 1rem; }
form input, form textarea { width: 100%; padding: 0.8rem; border-radius: var(--radius); border: 1px solid rgba(128,128,128,0.3); margin-top: 0.3rem; margin-bottom: 1rem; font: inherit; }
.map-embed, .booking-embed { border-radius: 12px; overflow: hidden; margin-top: 2rem; }
.booking-embed { background: white; box-shadow: 0 10px 40px rgba(0,0,0,0.1); }

#cart-float { position: fixed; bottom: 100px; right: 30px; background: var(--p); color: white; padding: 15px 20px; border-radius: 50px; z-index: 998; display: none; gap: 10px; cursor: pointer; border: none; font: inherit; }
#cart-modal { display: none; position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); background: var(--card); width: 90%; max-width: 450px; padding: 2rem; border-radius: 16px; z-index: 1001; box-shadow: 0 50px 100px rgba(0,0,0,0.5); border: 1px solid rgba(128,128,128,0.2); backdrop-filter: blur(20px); }
#cart-overlay { display: none; position: fixed; top: 0; left: 0; width: 100%; height: 100%; background: rgba(0,0,0,0.5); z-index: 1000; }
.cart-line { display: flex; justify-content: space-between; padding: 0.5rem 0; border-bottom: 1px solid #eee; }
.cart-remove { color: red; cursor: pointer; margin-left: 10px; background: none; border: none; }
.wa-float { position: fixed; bottom: 30px; right: 30px; background: #25d366; color: white; width: 56px; height: 56px; border-radius: 50%; display: flex; align-items: center; justify-content: center; z-index: 999; box-shadow: 0 10px 25px rgba(0,0,0,0.2); }

footer { background: var(--p); padding: 4rem 0; color: white; margin-top: auto; }
footer h3, footer h4 { color: white; }
.footer-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 3rem; }
footer a { color: rgba(255,255,255,0.7); text-decoration: none; display: block; margin-bottom: 0.5rem; }
.copyright { margin-top: 3rem; text-align: center; opacity: 0.6; font-size: 0.8rem; }

section { padding: clamp(3rem, 5vw, 5rem) 0; }
"#;

const RESPONSIVE_CSS: &str = r#"@media (max-width: 768px) {
  .hero { min-height: 70vh; }
  .nav-links { position: fixed; top: 70px; left: -100%; width: 100%; height: 100vh; background: var(--bg); display: flex; flex-direction: column; padding: 2rem; align-items: flex-start; transition: 0.3s; border-top: 1px solid rgba(0,0,0,0.1); }
  .nav-links a { margin: 0 0 1rem; }
  .nav-links.active { left: 0; }
  .mobile-menu { display: block; }
  .about-grid, .contact-grid { grid-template-columns: 1fr; gap: 2rem; }
  .detail-view { grid-template-columns: 1fr; }
}
"#;
