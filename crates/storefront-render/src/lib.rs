//! Rendering and cart state for storefront sites.
//!
//! Turns feed rows into card and detail markup, loads feeds into page render
//! targets, keeps the persisted cart and composes the messaging checkout link.
//! The same behaviour ships to the browser as a single runtime script.

pub mod card;
pub mod cart;
pub mod loader;
pub mod script;
pub mod target;

pub use card::{
    render_post_detail, render_product_detail, render_rows, CardAction, CardRule, Header, PostCard,
    ProductCard,
};
pub use cart::{Cart, CartItem, CartStore, CheckoutDetails, CheckoutError, MemoryStore};
pub use loader::{load_into, LoadOutcome};
pub use script::{runtime_script, RuntimeConfig, CONFIG_ELEMENT_ID, RUNTIME_PATH};
pub use target::{Binding, RenderTarget, PLACEHOLDER, POST_NOT_FOUND, PRODUCT_NOT_FOUND};
