//! Template engine for rendering site pages.

use minijinja::Environment;
use serde::Serialize;

use crate::config::SiteConfig;

/// A navigation link.
#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
    /// Whether this link points at the page being rendered
    pub active: bool,
}

/// A feature card with its icon and body already rendered.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureView {
    pub icon: String,
    pub title: String,
    pub body: String,
}

/// Context for rendering a page template.
///
/// Fields documented as HTML are inserted unescaped; everything else,
/// including all of `site`, is escaped by the templates.
#[derive(Debug, Clone, Serialize)]
pub struct Context<'a> {
    /// Page title
    pub title: String,
    /// Output file name of the page
    pub page: &'static str,
    pub site: &'a SiteConfig,
    pub nav: Vec<NavLink>,
    pub fonts_url: String,
    pub icon: Option<&'a str>,
    /// Messaging number, digits only
    pub whatsapp: String,
    /// JSON-LD block (HTML)
    pub structured_data: String,
    /// Runtime configuration block (HTML)
    pub runtime_config: String,
    /// Additional script URLs loaded after the runtime
    pub extra_scripts: Vec<String>,
    pub features: Vec<FeatureView>,
    /// About summary for the home page (HTML)
    pub about_summary: String,
    /// Main body of prose pages (HTML)
    pub body: String,
    /// Render target the runtime fills from a feed (HTML)
    pub target: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        for (name, source) in TEMPLATES {
            env.add_template_owned(name.to_string(), source.to_string())?;
        }

        Ok(Self { env })
    }

    /// Render a page using the specified template.
    pub fn render_page(&self, template: &str, context: &Context) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;
        tmpl.render(context)
    }
}

const TEMPLATES: [(&str, &str); 23] = [
    ("base.html", BASE_TEMPLATE),
    ("nav.html", NAV_TEMPLATE),
    ("footer.html", FOOTER_TEMPLATE),
    ("widgets.html", WIDGETS_TEMPLATE),
    ("home.html", HOME_TEMPLATE),
    ("about.html", PROSE_TEMPLATE),
    ("legal.html", PROSE_TEMPLATE),
    ("contact.html", CONTACT_TEMPLATE),
    ("booking.html", BOOKING_TEMPLATE),
    ("product.html", PRODUCT_TEMPLATE),
    ("blog.html", BLOG_TEMPLATE),
    ("post.html", POST_TEMPLATE),
    ("sections/inner_hero.html", INNER_HERO_SECTION),
    ("sections/hero.html", HERO_SECTION),
    ("sections/stats.html", STATS_SECTION),
    ("sections/features.html", FEATURES_SECTION),
    ("sections/pricing.html", PRICING_SECTION),
    ("sections/store.html", STORE_SECTION),
    ("sections/about.html", ABOUT_SECTION),
    ("sections/testimonials.html", TESTIMONIALS_SECTION),
    ("sections/faq.html", FAQ_SECTION),
    ("sections/cta.html", CTA_SECTION),
    ("sections/booking_fallback.html", BOOKING_FALLBACK_SECTION),
];

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} | {{ site.identity.name }}</title>
  <meta name="description" content="{{ site.identity.description }}">
  <meta name="keywords" content="{{ site.seo.keywords }}">
  {% if site.seo.google_verification %}<meta name="google-site-verification" content="{{ site.seo.google_verification }}">
  {% endif %}<meta property="og:title" content="{{ title }} | {{ site.identity.name }}">
  <meta property="og:description" content="{{ site.identity.description }}">
  {% if site.seo.og_image %}<meta property="og:image" content="{{ site.seo.og_image }}">
  {% endif %}<link rel="manifest" href="manifest.json">
  <meta name="theme-color" content="{{ site.theme.primary }}">
  {% if icon %}<link rel="icon" href="{{ icon }}">
  {% endif %}{{ structured_data | safe }}
  <link rel="preconnect" href="https://fonts.googleapis.com">
  <link href="{{ fonts_url }}" rel="stylesheet">
  <link rel="stylesheet" href="assets/theme.css">
</head>
<body>
  {% include "nav.html" %}
  <main>
  {% block content %}{% endblock %}
  </main>
  {% include "footer.html" %}
  {% include "widgets.html" %}
  {{ runtime_config | safe }}
  <script src="assets/storefront.js" defer></script>
  {% for src in extra_scripts %}<script src="{{ src }}"></script>
  {% endfor %}
</body>
</html>"##;

const NAV_TEMPLATE: &str = r##"<nav>
  <div class="container nav-flex">
    <a href="index.html" class="nav-logo">{% if site.identity.logo %}<img src="{{ site.identity.logo }}" alt="">{% endif %}<span>{{ site.identity.name }}</span></a>
    <div class="nav-links">
      {% for link in nav %}<a href="{{ link.href }}"{% if link.active %} class="active"{% endif %}>{{ link.title }}</a>{% endfor %}
      {% if site.social.translations %}<button type="button" class="lang-toggle" data-lang-toggle>Language</button>{% endif %}
    </div>
    <button type="button" class="mobile-menu" data-menu-toggle aria-label="Menu">&#9776;</button>
  </div>
</nav>"##;

const FOOTER_TEMPLATE: &str = r##"<footer>
  <div class="container">
    <div class="footer-grid">
      <div>
        <h3>{{ site.identity.name }}</h3>
        <p>{{ site.identity.address }}</p>
      </div>
      <div>
        <h4>Links</h4>
        <a href="index.html">Home</a>
        {% if site.modules.blog %}<a href="blog.html">Blog</a>{% endif %}
        <a href="privacy.html">Privacy</a>
        <a href="terms.html">Terms</a>
      </div>
      <div>
        <h4>Contact</h4>
        <a href="tel:{{ site.identity.phone }}">{{ site.identity.phone }}</a>
        <a href="mailto:{{ site.identity.email }}">{{ site.identity.email }}</a>
        {% if site.social.facebook %}<a href="{{ site.social.facebook }}" target="_blank" rel="noopener">Facebook</a>{% endif %}
        {% if site.social.twitter %}<a href="{{ site.social.twitter }}" target="_blank" rel="noopener">Twitter</a>{% endif %}
      </div>
    </div>
    <div class="copyright">&copy; {{ site.identity.name }}</div>
  </div>
</footer>"##;

const WIDGETS_TEMPLATE: &str = r##"{% if whatsapp %}<a href="https://wa.me/{{ whatsapp }}" class="wa-float" target="_blank" rel="noopener" aria-label="Chat on WhatsApp"><svg viewBox="0 0 24 24" width="28" height="28" fill="currentColor" aria-hidden="true"><path d="M12 2a10 10 0 0 0-8.6 15.1L2 22l5-1.3A10 10 0 1 0 12 2zm5.2 14.1c-.2.6-1.3 1.2-1.8 1.2-.5.1-1 .1-3.3-.8-2.8-1.1-4.6-4-4.7-4.2-.1-.2-1.1-1.5-1.1-2.9s.7-2 1-2.3c.2-.3.5-.3.7-.3h.5c.2 0 .4 0 .6.5l.8 2c.1.1.1.3 0 .5l-.3.5-.4.4c-.1.1-.3.3-.1.6.2.3.8 1.3 1.7 2.1 1.2 1 2.1 1.3 2.4 1.5.3.1.5.1.6-.1l.9-1c.2-.3.4-.2.6-.1l1.9.9c.3.1.5.2.5.3.1.1.1.6-.1 1.2z"/></svg></a>
{% endif %}<button type="button" id="cart-float" data-cart-toggle aria-label="Open cart">Cart <span id="cart-count">0</span></button>
<div id="cart-overlay" data-cart-toggle></div>
<div id="cart-modal" role="dialog" aria-label="Cart">
  <h3>Your Cart</h3>
  <div id="cart-items"></div>
  <p><strong>Total: <span id="cart-total">0.00</span></strong></p>
  <button type="button" class="btn btn-primary btn-block" data-cart-checkout>Checkout on WhatsApp</button>
  <button type="button" class="btn btn-accent btn-block" data-cart-toggle>Close</button>
</div>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
{% if site.modules.hero %}{% include "sections/hero.html" %}{% endif %}
{% if site.modules.stats and site.stats %}{% include "sections/stats.html" %}{% endif %}
{% if site.modules.features and features %}{% include "sections/features.html" %}{% endif %}
{% if site.modules.pricing %}{% include "sections/pricing.html" %}{% endif %}
{% if site.modules.store %}{% include "sections/store.html" %}{% endif %}
{% if site.modules.about %}{% include "sections/about.html" %}{% endif %}
{% if site.modules.testimonials and site.testimonials %}{% include "sections/testimonials.html" %}{% endif %}
{% if site.modules.faq and site.faq %}{% include "sections/faq.html" %}{% endif %}
{% if site.modules.cta %}{% include "sections/cta.html" %}{% endif %}
{% endblock %}"##;

const PROSE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
{% include "sections/inner_hero.html" %}
<div class="container prose">{{ body | safe }}</div>
{% endblock %}"##;

const CONTACT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
{% include "sections/inner_hero.html" %}
<section>
  <div class="container">
    <div class="contact-grid">
      <div class="card">
        <h3>Get In Touch</h3>
        <p>{{ site.identity.address }}</p>
        <p><a href="tel:{{ site.identity.phone }}">{{ site.identity.phone }}</a></p>
        <p><a href="mailto:{{ site.identity.email }}">{{ site.identity.email }}</a></p>
      </div>
      <div class="card">
        <h3>Send Message</h3>
        <form action="https://formsubmit.co/{{ site.identity.email }}" method="POST">
          <label for="contact-name">Name</label>
          <input id="contact-name" type="text" name="name" required>
          <label for="contact-email">Email</label>
          <input id="contact-email" type="email" name="email" required>
          <label for="contact-msg">Message</label>
          <textarea id="contact-msg" name="msg" rows="4" required></textarea>
          <button class="btn btn-primary" type="submit">Send</button>
        </form>
      </div>
    </div>
    {% if site.identity.map_embed %}<div class="map-embed">{{ site.identity.map_embed | safe }}</div>{% endif %}
  </div>
</section>
{% endblock %}"##;

const BOOKING_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<section class="hero hero-inner">
  <div class="container hero-content">
    <h1 id="booking-title">{{ site.booking.title }}</h1>
    <p id="booking-sub">{{ site.booking.subtext }}</p>
  </div>
</section>
<section>
  <div class="container">
    {% if site.booking.embed %}<div class="booking-embed">{{ site.booking.embed | safe }}</div>{% else %}{% include "sections/booking_fallback.html" %}{% endif %}
  </div>
</section>
{% endblock %}"##;

const PRODUCT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<section>
  <div class="container">{{ target | safe }}</div>
</section>
{% endblock %}"##;

const BLOG_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<section class="hero hero-inner hero-blog"{% if site.hero.slides %} style="background-image: linear-gradient(rgba(0,0,0,0.6), rgba(0,0,0,0.6)), url('{{ site.hero.slides[0] }}')"{% endif %}>
  <div class="container hero-content">
    <h1 id="blog-title">{{ site.blog.title }}</h1>
    <p id="blog-sub">{{ site.blog.subtext }}</p>
  </div>
</section>
<section>
  <div class="container">{{ target | safe }}</div>
</section>
{% endblock %}"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
{{ target | safe }}
{% endblock %}"##;

const INNER_HERO_SECTION: &str = r##"<section class="hero hero-inner">
  <div class="container hero-content"><h1>{{ title }}</h1></div>
</section>"##;

const HERO_SECTION: &str = r##"<section class="hero">
  <div class="hero-overlay"></div>
  {% for slide in site.hero.slides %}<div class="carousel-slide{% if loop.first %} active{% endif %}" style="background-image: url('{{ slide }}')"></div>
  {% endfor %}<div class="container hero-content">
    <h1 id="hero-title">{{ site.hero.headline }}</h1>
    <p id="hero-sub">{{ site.hero.subtext }}</p>
    <div class="hero-actions">
      {% if site.modules.pricing %}<a href="#pricing" class="btn btn-accent">Calculate Savings</a>{% endif %}
      <a href="contact.html" class="btn btn-glass">Get Free Audit</a>
    </div>
  </div>
</section>"##;

const STATS_SECTION: &str = r##"<div class="stats">
  <div class="container grid-3">
    {% for stat in site.stats %}<div class="reveal"><h3>{{ stat.value }}</h3><p>{{ stat.label }}</p></div>
    {% endfor %}
  </div>
</div>"##;

const FEATURES_SECTION: &str = r##"<section id="features">
  <div class="container">
    <div class="section-head reveal"><h2>{{ site.features.title }}</h2></div>
    <div class="grid-3">
      {% for feature in features %}<div class="card reveal"><div class="feature-icon">{{ feature.icon | safe }}</div><h3>{{ feature.title }}</h3><div>{{ feature.body | safe }}</div></div>
      {% endfor %}
    </div>
  </div>
</section>"##;

const PRICING_SECTION: &str = r##"<section id="pricing">
  <div class="container">
    <div class="section-head reveal"><h2>Cost Comparison</h2></div>
    <div class="pricing-wrapper reveal">
      <table class="pricing-table">
        <thead><tr><th>Expense</th><th class="ours">{{ site.identity.name }}</th><th>{{ site.pricing.competitor }}</th></tr></thead>
        <tbody>
          <tr><td>Setup</td><td><strong>{{ site.pricing.price }}</strong></td><td>$0</td></tr>
          <tr><td>Monthly</td><td><strong>{{ site.pricing.monthly }}</strong></td><td>{{ site.pricing.competitor_monthly }}</td></tr>
          <tr><td><strong>Savings</strong></td><td class="savings">You Save {{ site.pricing.savings }}</td><td>$0</td></tr>
        </tbody>
      </table>
    </div>
  </div>
</section>"##;

const STORE_SECTION: &str = r##"<section id="inventory" class="store">
  <div class="container">
    <div class="section-head reveal"><h2>Store</h2></div>
    {{ target | safe }}
  </div>
</section>"##;

const ABOUT_SECTION: &str = r##"<section id="about">
  <div class="container">
    <div class="about-grid">
      <div class="reveal">
        <h2 id="about-title">{{ site.about.title }}</h2>
        <div>{{ about_summary | safe }}</div>
        <a href="about.html" class="btn btn-primary">Read More</a>
      </div>
      <img src="{{ site.about.image }}" class="reveal" loading="lazy" alt="{{ site.about.title }}">
    </div>
  </div>
</section>"##;

const TESTIMONIALS_SECTION: &str = r##"<section id="testimonials">
  <div class="container">
    <div class="section-head reveal"><h2>Client Stories</h2></div>
    <div class="grid-3">
      {% for t in site.testimonials %}<div class="card reveal testimonial"><i>"{{ t.quote }}"</i><br><b>- {{ t.name }}</b></div>
      {% endfor %}
    </div>
  </div>
</section>"##;

const FAQ_SECTION: &str = r##"<section id="faq">
  <div class="container faq">
    <div class="section-head reveal"><h2>FAQ</h2></div>
    {% for entry in site.faq %}<details class="reveal"><summary>{{ entry.question }}</summary><p>{{ entry.answer }}</p></details>
    {% endfor %}
  </div>
</section>"##;

const CTA_SECTION: &str = r##"<section class="cta">
  <div class="container reveal">
    <h2>{{ site.cta.title }}</h2>
    <p>{{ site.cta.subtext }}</p>
    <a href="contact.html" class="btn btn-light">{{ site.cta.button }}</a>
  </div>
</section>"##;

const BOOKING_FALLBACK_SECTION: &str = r##"<div class="card">
  <p>Online booking is not available yet. Reach us directly:</p>
  <p><a href="tel:{{ site.identity.phone }}">{{ site.identity.phone }}</a></p>
  {% if whatsapp %}<a href="https://wa.me/{{ whatsapp }}" class="btn btn-primary" target="_blank" rel="noopener">Message us</a>{% endif %}
</div>"##;
