//! Locally persisted cart and messaging checkout.
//!
//! Mirrors the cart kept by the runtime script in `localStorage`: an ordered,
//! append-only list of `{name, price}` pairs serialized as JSON under one key.
//! Checkout hands the order to a chat app through a deep link and then clears
//! the cart.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "storefront.cart";

/// Base of the messaging deep link.
pub const WHATSAPP_BASE: &str = "https://wa.me/";

/// One entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    pub price: String,
}

impl CartItem {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
        }
    }
}

/// String key-value storage backing the cart.
pub trait CartStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: String);
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Errors that can occur when composing a checkout.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("No messaging number configured")]
    MissingPhone,

    #[error("Invalid checkout link: {0}")]
    InvalidLink(#[from] url::ParseError),
}

/// Seller details used in the order message.
#[derive(Debug, Clone, Default)]
pub struct CheckoutDetails {
    /// Messaging number; anything other than digits is dropped
    pub phone: String,
    pub upi: Option<String>,
    pub paypal: Option<String>,
}

/// Cart state over a [`CartStore`].
#[derive(Debug)]
pub struct Cart<S: CartStore> {
    store: S,
    items: Vec<CartItem>,
}

impl<S: CartStore> Cart<S> {
    /// Load the cart persisted in `store`.
    ///
    /// A missing key is an empty cart. An unreadable payload is logged and
    /// discarded rather than failing the load.
    pub fn load(store: S) -> Self {
        let items = match store.read(CART_STORAGE_KEY) {
            None => Vec::new(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable cart payload: {}", e);
                Vec::new()
            }),
        };

        Self { store, items }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item and persist.
    pub fn add(&mut self, item: CartItem) {
        self.items.push(item);
        self.persist();
    }

    /// Remove the item at `index` and persist. Out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<CartItem> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.persist();
        Some(removed)
    }

    /// Sum of item prices, reading each price leniently.
    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| parse_price(&i.price)).sum()
    }

    /// Compose the checkout deep link and clear the cart.
    pub fn checkout(&mut self, details: &CheckoutDetails) -> Result<Url, CheckoutError> {
        if self.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let link = whatsapp_link(&details.phone, &order_message(&self.items, details))?;
        self.items.clear();
        self.persist();

        Ok(link)
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.items) {
            Ok(json) => self.store.write(CART_STORAGE_KEY, json),
            Err(e) => tracing::warn!("Failed to serialize cart: {}", e),
        }
    }
}

/// Read a display price as a number.
///
/// Everything except digits and dots is dropped, then the longest leading
/// decimal number is read. Unreadable prices count as zero.
pub fn parse_price(price: &str) -> f64 {
    let cleaned: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut seen_dot = false;
    let end = cleaned
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' {
                if seen_dot {
                    return true;
                }
                seen_dot = true;
            }
            false
        })
        .map(|(i, _)| i)
        .unwrap_or(cleaned.len());

    cleaned[..end].parse().unwrap_or(0.0)
}

/// Plain-text order summary sent through the messaging app.
pub fn order_message(items: &[CartItem], details: &CheckoutDetails) -> String {
    let mut message = String::from("New Order:\n");
    let mut total = 0.0;

    for item in items {
        message.push_str(&format!("- {} ({})\n", item.name, item.price));
        total += parse_price(&item.price);
    }

    message.push_str(&format!("\nTotal: {:.2}", total));

    let payment: Vec<String> = [
        details.upi.as_deref().map(|upi| format!("UPI {}", upi)),
        details.paypal.as_deref().map(|paypal| format!("PayPal {}", paypal)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !payment.is_empty() {
        message.push_str(&format!("\n\nPayment: {}", payment.join(" | ")));
    }

    message
}

/// Keep only the digits of a phone number.
pub fn clean_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Build a `wa.me` link carrying `text`.
pub fn whatsapp_link(phone: &str, text: &str) -> Result<Url, CheckoutError> {
    let digits = clean_phone(phone);
    if digits.is_empty() {
        return Err(CheckoutError::MissingPhone);
    }

    let mut url = Url::parse(WHATSAPP_BASE)?.join(&digits)?;
    if !text.is_empty() {
        url.query_pairs_mut().append_pair("text", text);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            phone: "+966 57 256 2151".to_string(),
            upi: Some("shop@upi".to_string()),
            paypal: None,
        }
    }

    #[test]
    fn round_trips_through_store() {
        let mut cart = Cart::load(MemoryStore::new());
        cart.add(CartItem::new("Widget", "9.99"));
        cart.add(CartItem::new("Gadget", "$19.99"));

        let reloaded = Cart::load(cart.into_store());

        assert_eq!(
            reloaded.items(),
            &[CartItem::new("Widget", "9.99"), CartItem::new("Gadget", "$19.99")]
        );
    }

    #[test]
    fn remove_shifts_later_items() {
        let mut cart = Cart::load(MemoryStore::new());
        for name in ["a", "b", "c", "d"] {
            cart.add(CartItem::new(name, "1"));
        }

        let removed = cart.remove(1);

        assert_eq!(removed, Some(CartItem::new("b", "1")));
        assert_eq!(cart.len(), 3);
        let names: Vec<&str> = cart.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "d"]);
        assert_eq!(Cart::load(cart.into_store()).len(), 3);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut cart = Cart::load(MemoryStore::new());
        cart.add(CartItem::new("a", "1"));

        assert_eq!(cart.remove(5), None);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn corrupt_payload_starts_empty() {
        let mut store = MemoryStore::new();
        store.write(CART_STORAGE_KEY, "{not json".to_string());

        let cart = Cart::load(store);

        assert!(cart.is_empty());
    }

    #[test]
    fn parses_prices_leniently() {
        assert_eq!(parse_price("$1,299.50"), 1299.5);
        assert_eq!(parse_price("9.99 USD"), 9.99);
        assert_eq!(parse_price("1.2.3"), 1.2);
        assert_eq!(parse_price("free"), 0.0);
    }

    #[test]
    fn composes_order_message() {
        let items = vec![CartItem::new("Widget", "9.99"), CartItem::new("Gadget", "$5")];

        let message = order_message(&items, &details());

        assert_eq!(
            message,
            "New Order:\n- Widget (9.99)\n- Gadget ($5)\n\nTotal: 14.99\n\nPayment: UPI shop@upi"
        );
    }

    #[test]
    fn checkout_links_and_clears() {
        let mut cart = Cart::load(MemoryStore::new());
        cart.add(CartItem::new("Widget", "9.99"));

        let link = cart.checkout(&details()).unwrap();

        assert!(link.as_str().starts_with("https://wa.me/966572562151?text="));
        let text: String = link
            .query_pairs()
            .find(|(k, _)| k == "text")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(text.contains("- Widget (9.99)"));
        assert!(cart.is_empty());
        assert!(Cart::load(cart.into_store()).is_empty());
    }

    #[test]
    fn checkout_requires_items_and_phone() {
        let mut cart = Cart::load(MemoryStore::new());
        assert!(matches!(cart.checkout(&details()), Err(CheckoutError::EmptyCart)));

        cart.add(CartItem::new("Widget", "9.99"));
        let no_phone = CheckoutDetails::default();
        assert!(matches!(cart.checkout(&no_phone), Err(CheckoutError::MissingPhone)));
        assert_eq!(cart.len(), 1);
    }
}
