//! Client runtime shipped with every generated site.
//!
//! The runtime is one static script (`assets/storefront.js`). Pages configure
//! it with a JSON block and mark their render targets with `data-render`, so
//! no page carries generated code of its own.
//!
//! The script mirrors the Rust side and must stay in step with it:
//! `parseFeed` follows [`storefront_feed::parse_table`], the card and detail
//! renderers follow [`crate::card`], and the cart follows [`crate::cart`]
//! (corrupt storage reads as empty, checkout clears). The tests below pin
//! those behaviours to the functions that carry them.

use serde::Serialize;
use storefront_feed::{PostColumns, ProductColumns};

use crate::cart::CART_STORAGE_KEY;

/// Element id of the JSON configuration block.
pub const CONFIG_ELEMENT_ID: &str = "storefront-config";

/// Path of the runtime script inside a built site.
pub const RUNTIME_PATH: &str = "assets/storefront.js";

/// Settings read by the runtime at page load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub store_feed: Option<String>,
    pub blog_feed: Option<String>,
    pub translations_feed: Option<String>,
    pub fallback_image: String,
    pub product_columns: ProductColumns,
    pub post_columns: PostColumns,
    /// Messaging number, digits only
    pub whatsapp: String,
    pub upi: Option<String>,
    pub paypal: Option<String>,
    pub cart_key: String,
    /// Detail pages show the first entry when no id is given
    pub preview: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            store_feed: None,
            blog_feed: None,
            translations_feed: None,
            fallback_image: String::new(),
            product_columns: ProductColumns::default(),
            post_columns: PostColumns::default(),
            whatsapp: String::new(),
            upi: None,
            paypal: None,
            cart_key: CART_STORAGE_KEY.to_string(),
            preview: false,
        }
    }
}

impl RuntimeConfig {
    /// Serialize as an inline JSON `<script>` block.
    pub fn to_script_tag(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?.replace("</", "<\\/");
        Ok(format!(
            r#"<script type="application/json" id="{}">{}</script>"#,
            CONFIG_ELEMENT_ID, json
        ))
    }
}

/// The runtime script source.
pub fn runtime_script() -> &'static str {
    RUNTIME_SCRIPT
}

const RUNTIME_SCRIPT: &str = r##"// Storefront runtime: feed rendering, cart, checkout and page behaviour.
(function () {
  'use strict';

  var configEl = document.getElementById('storefront-config');
  var config = {};
  try {
    config = configEl ? JSON.parse(configEl.textContent) : {};
  } catch (e) {
    console.warn('[storefront] unreadable config', e);
  }
  var cartKey = config.cartKey || 'storefront.cart';

  // ---- text helpers ----

  function escapeHtml(text) {
    return String(text == null ? '' : text)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;')
      .replace(/"/g, '&quot;')
      .replace(/'/g, '&#39;');
  }

  function inlineMarkup(text) {
    var html = escapeHtml(String(text || '').replace(/\r\n/g, '\n')).replace(/\n/g, '<br><br>');
    return html.replace(/\*\*([\s\S]*?)\*\*/g, '<strong>$1</strong>');
  }

  function queryValue(text) {
    return encodeURIComponent(text).replace(/%20/g, '+');
  }

  // ---- delimited feed parsing ----

  function parseFeed(text) {
    text = text.replace(/^\uFEFF/, '');
    var rows = [], row = [], cur = '', inQuote = false;
    for (var i = 0; i < text.length; i++) {
      var c = text[i], next = text[i + 1];
      if (c === '"') {
        if (inQuote && next === '"') { cur += '"'; i++; } else { inQuote = !inQuote; }
      } else if (c === ',' && !inQuote) {
        row.push(cur.trim()); cur = '';
      } else if ((c === '\n' || (c === '\r' && next === '\n')) && !inQuote) {
        row.push(cur.trim()); rows.push(row); row = []; cur = '';
        if (c === '\r') i++;
      } else {
        cur += c;
      }
    }
    if (cur || row.length) { row.push(cur.trim()); rows.push(row); }
    return rows;
  }

  function parseLine(line) {
    var fields = [], cur = '', inQuote = false;
    for (var i = 0; i < line.length; i++) {
      var c = line[i];
      if (c === '"') {
        if (inQuote && line[i + 1] === '"') { cur += '"'; i++; } else { inQuote = !inQuote; }
      } else if (c === ',' && !inQuote) {
        fields.push(cur.trim()); cur = '';
      } else {
        cur += c;
      }
    }
    fields.push(cur.trim());
    return fields;
  }

  function field(row, index) {
    return row[index] == null ? '' : row[index];
  }

  function isBlank(row) {
    return row.every(function (f) { return f === ''; });
  }

  function usableImage(url, fallback) {
    return url && url.length > 5 ? url : fallback;
  }

  // ---- schemas ----

  function toProduct(row) {
    var cols = config.productColumns;
    if (row.length < Math.max(cols.name, cols.price) + 1 || isBlank(row)) return null;
    var link = field(row, cols.payment_link);
    return {
      name: field(row, cols.name),
      price: field(row, cols.price),
      description: field(row, cols.description),
      images: field(row, cols.images).split('|')
        .map(function (s) { return s.trim(); })
        .filter(Boolean),
      paymentLink: link.indexOf('http') !== -1 ? link : ''
    };
  }

  function toPost(row) {
    var cols = config.postColumns;
    var min = Math.max(cols.slug, cols.title, cols.category, cols.summary) + 1;
    if (row.length < min || isBlank(row)) return null;
    return {
      slug: field(row, cols.slug),
      title: field(row, cols.title),
      date: field(row, cols.date),
      category: field(row, cols.category),
      summary: field(row, cols.summary),
      image: field(row, cols.image),
      body: field(row, cols.body)
    };
  }

  function collect(rows, convert) {
    return rows.slice(1).map(convert).filter(Boolean);
  }

  // ---- markup ----

  function productAction(p) {
    if (p.paymentLink) {
      return '<a href="' + escapeHtml(p.paymentLink) + '" class="btn btn-primary btn-block" target="_blank" rel="noopener">Buy Now</a>';
    }
    return '<button type="button" class="btn btn-primary btn-block" data-cart-add data-name="' +
      escapeHtml(p.name) + '" data-price="' + escapeHtml(p.price) + '">Add to Cart</button>';
  }

  function productCard(p) {
    var name = escapeHtml(p.name);
    return '<div class="card reveal"><img src="' + escapeHtml(usableImage(p.images[0], config.fallbackImage)) +
      '" class="prod-img" loading="lazy" alt="' + name + '"><div><h3><a href="product.html?item=' +
      queryValue(p.name) + '">' + name + '</a></h3><p class="price">' + escapeHtml(p.price) +
      '</p><p class="desc">' + escapeHtml(p.description) + '</p>' + productAction(p) + '</div></div>';
  }

  function productDetail(p) {
    var name = escapeHtml(p.name);
    var thumbs = p.images.slice(1).map(function (src) {
      return '<img src="' + escapeHtml(src) + '" class="thumb" loading="lazy" alt="">';
    }).join('');
    return '<div class="detail-view"><div class="gallery"><img src="' +
      escapeHtml(usableImage(p.images[0], config.fallbackImage)) + '" class="detail-img" alt="' + name +
      '"><div class="thumbs">' + thumbs + '</div></div><div><h1>' + name + '</h1><p class="price">' +
      escapeHtml(p.price) + '</p><p>' + escapeHtml(p.description) + '</p>' + productAction(p) + '</div></div>';
  }

  function postCard(p) {
    var title = escapeHtml(p.title);
    return '<div class="card reveal"><img src="' + escapeHtml(usableImage(p.image, config.fallbackImage)) +
      '" class="prod-img" loading="lazy" alt="' + title + '"><div><span class="blog-badge">' +
      escapeHtml(p.category) + '</span><h3><a href="post.html?id=' + queryValue(p.slug) + '">' + title +
      '</a></h3><p class="desc">' + escapeHtml(p.summary) + '</p></div></div>';
  }

  function postDetail(p) {
    var title = escapeHtml(p.title);
    var date = p.date ? '<p class="post-date">' + escapeHtml(p.date) + '</p>' : '';
    return '<div class="post-hero"><div class="container"><h1>' + title + '</h1><span class="blog-badge">' +
      escapeHtml(p.category) + '</span>' + date + '</div></div><div class="container post-body"><img src="' +
      escapeHtml(usableImage(p.image, config.fallbackImage)) + '" class="post-img" alt="' + title +
      '"><div class="post-content">' + inlineMarkup(p.body) + '</div></div>';
  }

  function notFound(text) {
    return '<p class="placeholder">' + escapeHtml(text) + '</p>';
  }

  function selected(items, key, param) {
    var wanted = new URLSearchParams(window.location.search).get(param);
    if (wanted === null) return config.preview ? items[0] || null : null;
    return items.filter(function (item) { return item[key] === wanted; })[0] || null;
  }

  var bindings = {
    'product-cards': {
      feed: 'storeFeed',
      render: function (rows) { return collect(rows, toProduct).map(productCard).join(''); }
    },
    'product-detail': {
      feed: 'storeFeed',
      render: function (rows) {
        var p = selected(collect(rows, toProduct), 'name', 'item');
        return p ? productDetail(p) : notFound('Product not found.');
      }
    },
    'post-cards': {
      feed: 'blogFeed',
      render: function (rows) { return collect(rows, toPost).map(postCard).join(''); }
    },
    'post-detail': {
      feed: 'blogFeed',
      render: function (rows) {
        var p = selected(collect(rows, toPost), 'slug', 'id');
        return p ? postDetail(p) : notFound('Post not found.');
      }
    }
  };

  async function loadTarget(el) {
    var binding = bindings[el.getAttribute('data-render')];
    var url = binding && config[binding.feed];
    if (!url) return;
    try {
      var res = await fetch(url);
      if (!res.ok) throw new Error('feed returned ' + res.status);
      var html = binding.render(parseFeed(await res.text()));
      el.innerHTML = html;
      revealVisible();
    } catch (e) {
      console.warn('[storefront] failed to load #' + el.id, e);
    }
  }

  // ---- cart ----

  function readCart() {
    try {
      var parsed = JSON.parse(localStorage.getItem(cartKey) || '[]');
      return Array.isArray(parsed) ? parsed : [];
    } catch (e) {
      console.warn('[storefront] discarding unreadable cart', e);
      return [];
    }
  }

  var cart = readCart();

  function saveCart() {
    localStorage.setItem(cartKey, JSON.stringify(cart));
    updateCartCount();
  }

  function parsePrice(price) {
    return parseFloat(String(price).replace(/[^0-9.]/g, '')) || 0;
  }

  function cartTotal() {
    return cart.reduce(function (sum, item) { return sum + parsePrice(item.price); }, 0);
  }

  function updateCartCount() {
    var count = document.getElementById('cart-count');
    if (count) count.textContent = cart.length;
    var float = document.getElementById('cart-float');
    if (float) float.style.display = cart.length > 0 ? 'flex' : 'none';
  }

  function addToCart(name, price) {
    cart.push({ name: name, price: price });
    saveCart();
    alert(name + ' added!');
  }

  function removeFromCart(index) {
    if (index < 0 || index >= cart.length) return;
    cart.splice(index, 1);
    saveCart();
    renderCartItems();
  }

  function renderCartItems() {
    var box = document.getElementById('cart-items');
    if (!box) return;
    box.innerHTML = cart.map(function (item, i) {
      return '<div class="cart-line"><span>' + escapeHtml(item.name) + '</span><span>' +
        escapeHtml(item.price) + ' <button type="button" class="cart-remove" data-cart-remove="' + i +
        '" aria-label="Remove">x</button></span></div>';
    }).join('');
    var total = document.getElementById('cart-total');
    if (total) total.textContent = cartTotal().toFixed(2);
  }

  function toggleCart(open) {
    var modal = document.getElementById('cart-modal');
    var overlay = document.getElementById('cart-overlay');
    if (!modal || !overlay) return;
    var show = typeof open === 'boolean' ? open : modal.style.display !== 'block';
    modal.style.display = show ? 'block' : 'none';
    overlay.style.display = show ? 'block' : 'none';
    if (show) renderCartItems();
  }

  function orderMessage() {
    var lines = cart.map(function (item) { return '- ' + item.name + ' (' + item.price + ')'; });
    var message = 'New Order:\n' + lines.join('\n') + (lines.length ? '\n' : '') +
      '\nTotal: ' + cartTotal().toFixed(2);
    var payment = [];
    if (config.upi) payment.push('UPI ' + config.upi);
    if (config.paypal) payment.push('PayPal ' + config.paypal);
    if (payment.length) message += '\n\nPayment: ' + payment.join(' | ');
    return message;
  }

  function checkout() {
    if (!cart.length || !config.whatsapp) return;
    var url = 'https://wa.me/' + config.whatsapp + '?text=' + queryValue(orderMessage());
    window.open(url, '_blank');
    cart = [];
    saveCart();
    toggleCart(false);
  }

  // ---- translations ----

  async function applyTranslations() {
    if (!config.translationsFeed) return;
    try {
      var res = await fetch(config.translationsFeed);
      var text = await res.text();
      text.split(/\r\n|\n/).forEach(function (line) {
        var cols = parseLine(line);
        if (cols.length < 2 || !cols[0]) return;
        var el = document.getElementById(cols[0]);
        if (el) el.textContent = cols[1];
      });
    } catch (e) {
      console.warn('[storefront] failed to load translations', e);
    }
  }

  // ---- page behaviour ----

  function revealVisible() {
    document.querySelectorAll('.reveal').forEach(function (el) {
      if (el.getBoundingClientRect().top < window.innerHeight - 80) el.classList.add('active');
    });
  }

  function startCarousel() {
    var slides = document.querySelectorAll('.carousel-slide');
    if (slides.length < 2) return;
    var current = 0;
    setInterval(function () {
      slides[current].classList.remove('active');
      current = (current + 1) % slides.length;
      slides[current].classList.add('active');
    }, 4000);
  }

  document.addEventListener('click', function (event) {
    var el = event.target.closest('[data-cart-add],[data-cart-remove],[data-cart-toggle],[data-cart-checkout],[data-menu-toggle],[data-lang-toggle]');
    if (!el) return;
    if (el.hasAttribute('data-cart-add')) {
      addToCart(el.getAttribute('data-name'), el.getAttribute('data-price'));
    } else if (el.hasAttribute('data-cart-remove')) {
      removeFromCart(parseInt(el.getAttribute('data-cart-remove'), 10));
    } else if (el.hasAttribute('data-cart-toggle')) {
      toggleCart();
    } else if (el.hasAttribute('data-cart-checkout')) {
      checkout();
    } else if (el.hasAttribute('data-menu-toggle')) {
      var links = document.querySelector('.nav-links');
      if (links) links.classList.toggle('active');
    } else if (el.hasAttribute('data-lang-toggle')) {
      applyTranslations();
    }
  });

  window.addEventListener('scroll', revealVisible, { passive: true });

  function init() {
    updateCartCount();
    revealVisible();
    startCarousel();
    document.querySelectorAll('[data-render]').forEach(loadTarget);
    if (!config.preview && 'serviceWorker' in navigator && location.protocol.indexOf('http') === 0) {
      navigator.serviceWorker.register('service-worker.js').catch(function (e) {
        console.warn('[storefront] service worker registration failed', e);
      });
    }
  }

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', init);
  } else {
    init();
  }
})();
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_serializes_camel_case() {
        let config = RuntimeConfig {
            store_feed: Some("https://example.com/store.csv".to_string()),
            whatsapp: "966572562151".to_string(),
            ..Default::default()
        };

        let tag = config.to_script_tag().unwrap();

        assert!(tag.starts_with(r#"<script type="application/json" id="storefront-config">"#));
        assert!(tag.contains(r#""storeFeed":"https://example.com/store.csv""#));
        assert!(tag.contains(r#""cartKey":"storefront.cart""#));
        assert!(tag.contains(r#""payment_link":4"#));
    }

    #[test]
    fn config_cannot_close_its_script_tag() {
        let config = RuntimeConfig {
            fallback_image: "</script><script>alert(1)".to_string(),
            ..Default::default()
        };

        let tag = config.to_script_tag().unwrap();

        assert_eq!(tag.matches("</script>").count(), 1);
        assert!(tag.ends_with("</script>"));
    }

    #[test]
    fn runtime_covers_all_bindings() {
        let js = runtime_script();

        for binding in [
            crate::Binding::ProductCards,
            crate::Binding::ProductDetail,
            crate::Binding::PostCards,
            crate::Binding::PostDetail,
        ] {
            assert!(js.contains(&format!("'{}'", binding.as_str())));
        }
        assert!(js.contains(CONFIG_ELEMENT_ID));
        assert!(js.contains(CART_STORAGE_KEY));
        assert!(js.contains("https://wa.me/"));
    }

    /// Source of one top-level runtime function.
    fn function_body<'a>(js: &'a str, name: &str) -> &'a str {
        let start = js
            .find(&format!("function {}(", name))
            .unwrap_or_else(|| panic!("runtime has no function {}", name));
        let end = js[start..].find("\n  }\n").map_or(js.len(), |i| start + i);
        &js[start..end]
    }

    #[test]
    fn feed_parser_matches_rust_rules() {
        let parse = function_body(runtime_script(), "parseFeed");

        assert!(parse.contains("text.replace(/^\\uFEFF/, '')"));
        assert!(parse.contains("inQuote && next === '\"'"));
        assert!(parse.contains("c === '\\r' && next === '\\n'"));
        assert!(parse.contains("if (cur || row.length)"));
    }

    #[test]
    fn corrupt_cart_reads_as_empty() {
        let read = function_body(runtime_script(), "readCart");

        let guarded = read.find("try {").unwrap();
        let parsed = read.find("JSON.parse").unwrap();
        assert!(guarded < parsed);
        assert!(read.contains("catch (e)"));
        assert!(read.contains("Array.isArray(parsed) ? parsed : []"));
    }

    #[test]
    fn checkout_clears_cart_after_opening_link() {
        let checkout = function_body(runtime_script(), "checkout");

        let opened = checkout.find("window.open(url").unwrap();
        let cleared = checkout.find("cart = [];").unwrap();
        let saved = checkout.find("saveCart();").unwrap();
        assert!(opened < cleared && cleared < saved);
        assert!(checkout.contains("if (!cart.length || !config.whatsapp) return;"));
    }

    #[test]
    fn detail_bindings_fall_back_to_not_found() {
        let js = runtime_script();

        assert!(js.contains(&format!("notFound('{}')", crate::PRODUCT_NOT_FOUND)));
        assert!(js.contains(&format!("notFound('{}')", crate::POST_NOT_FOUND)));
        assert!(!function_body(js, "loadTarget").contains("html !== null"));
    }
}
