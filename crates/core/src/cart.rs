//! Cart
//!
//! The cart manager owns every mutation of the persisted cart. Each mutation reloads the cart
//! from the store, applies the change, persists, re-renders and tells the donor what happened.
//! Totals are always recomputed from the stored items and never cached.

use std::{fmt::Write as _, sync::Arc};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    html::escape_html,
    items::CartItem,
    money::{self, format_currency, parse_price},
    notify::Notifier,
    page::{ElementId, Page},
    prompt::Prompt,
    store::Store,
};

/// Title used for catalog items that arrive without one.
pub const DEFAULT_TITLE: &str = "Donation";

/// Title given to donor-chosen amounts.
pub const CUSTOM_DONATION_TITLE: &str = "Custom Donation";

/// Question asked before the cart is cleared.
pub const CLEAR_QUESTION: &str = "Clear all items from cart?";

/// Placeholder shown instead of the line list when the cart is empty.
pub const EMPTY_CART_HTML: &str = r#"<div class="small cart-empty">Your cart is empty.</div>"#;

/// Errors from cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A custom amount was below the minimum donation.
    #[error("custom amount {amount} is below the minimum of {minimum}")]
    AmountBelowMinimum {
        /// Parsed amount.
        amount: Decimal,

        /// Smallest accepted amount.
        minimum: Decimal,
    },
}

/// Owns the in-memory view of the persisted cart.
#[derive(Debug, Clone)]
pub struct CartManager {
    store: Store,
    notifier: Arc<dyn Notifier>,
    page: Arc<Page>,
}

impl CartManager {
    /// Smallest amount accepted for a custom donation.
    pub const MINIMUM_CUSTOM_AMOUNT: Decimal = Decimal::ONE;

    /// Create a manager over the given store, notifying through `notifier` and rendering into `page`.
    pub fn new(store: Store, notifier: Arc<dyn Notifier>, page: Arc<Page>) -> Self {
        Self {
            store,
            notifier,
            page,
        }
    }

    /// The current cart contents.
    pub fn items(&self) -> Vec<CartItem> {
        self.store.load_cart()
    }

    /// Number of items in the cart.
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Sum of item prices.
    pub fn total(&self) -> Decimal {
        total(&self.items())
    }

    /// Add an item, parsing `price_raw` leniently.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountBelowMinimum`] for a custom item under the minimum amount; the
    /// donor is notified and the cart is left unchanged.
    pub fn add_item(
        &self,
        title: &str,
        price_raw: &str,
        custom: bool,
    ) -> Result<CartItem, CartError> {
        let price = parse_price(price_raw);

        if custom && price < Self::MINIMUM_CUSTOM_AMOUNT {
            self.notifier.notify("Enter a valid amount (minimum $1)");

            return Err(CartError::AmountBelowMinimum {
                amount: price,
                minimum: Self::MINIMUM_CUSTOM_AMOUNT,
            });
        }

        let title = match title.trim() {
            "" => DEFAULT_TITLE,
            trimmed => trimmed,
        };

        let item = if custom {
            CartItem::custom(title, price)
        } else {
            CartItem::new(title, price)
        };

        self.push(item.clone());
        self.notifier.notify(&format!("Added to cart: {title}"));

        Ok(item)
    }

    /// Add a donor-chosen amount from the custom donation field.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountBelowMinimum`] when the amount is under the minimum.
    pub fn add_custom_amount(&self, raw: &str) -> Result<CartItem, CartError> {
        let price = parse_price(raw);

        if price < Self::MINIMUM_CUSTOM_AMOUNT {
            self.notifier.notify("Enter a valid amount (minimum $1)");

            return Err(CartError::AmountBelowMinimum {
                amount: price,
                minimum: Self::MINIMUM_CUSTOM_AMOUNT,
            });
        }

        let item = CartItem::custom(CUSTOM_DONATION_TITLE, price);

        self.push(item.clone());
        self.notifier.notify("Custom donation added");

        Ok(item)
    }

    /// Whether the custom donation button should be enabled for the field's current value.
    pub fn custom_amount_enabled(raw: &str) -> bool {
        parse_price(raw) >= Self::MINIMUM_CUSTOM_AMOUNT
    }

    /// Remove the item currently at `index`.
    ///
    /// An index outside the cart (a stale row after another view changed the cart) is ignored.
    pub fn remove_at(&self, index: usize) -> Option<CartItem> {
        let mut items = self.store.load_cart();

        if index >= items.len() {
            warn!(index, len = items.len(), "remove-item: index out of range");

            return None;
        }

        let removed = items.remove(index);

        self.store.save_cart(&items);
        self.render_items(&items);
        self.notifier.notify("Item removed");

        Some(removed)
    }

    /// Empty the cart after the donor confirms. Returns whether the cart was cleared.
    pub fn clear(&self, prompt: &dyn Prompt) -> bool {
        if !prompt.confirm(CLEAR_QUESTION) {
            debug!("clear cancelled");

            return false;
        }

        self.empty();
        self.notifier.notify("Cart cleared");

        true
    }

    fn empty(&self) {
        self.store.save_cart(&[]);
        self.render_items(&[]);
    }

    /// Remove the items a finished checkout paid for, keeping anything added since.
    pub(crate) fn remove_checked_out(&self, checked_out: &[CartItem]) {
        let mut remaining = self.store.load_cart();

        for item in checked_out {
            if let Some(position) = remaining.iter().position(|candidate| candidate == item) {
                remaining.remove(position);
            }
        }

        self.store.save_cart(&remaining);
        self.render_items(&remaining);
    }

    /// Rebuild the line list, total and count from the persisted cart.
    pub fn render(&self) {
        self.render_items(&self.store.load_cart());
    }

    fn push(&self, item: CartItem) {
        let mut items = self.store.load_cart();

        items.push(item);

        self.store.save_cart(&items);
        self.render_items(&items);
    }

    fn render_items(&self, items: &[CartItem]) {
        let total = total(items);

        self.page.set(ElementId::CartItems, render_lines(items));
        self.page.set(ElementId::CartTotal, format_currency(total));
        self.page.set(ElementId::CartCount, items.len().to_string());

        debug!(count = items.len(), %total, "rendered cart");
    }
}

/// Sum of item prices.
pub fn total(items: &[CartItem]) -> Decimal {
    money::sum(items.iter().map(CartItem::price))
}

/// Markup for the cart line list. Titles are escaped.
pub fn render_lines(items: &[CartItem]) -> String {
    if items.is_empty() {
        return EMPTY_CART_HTML.to_string();
    }

    items
        .iter()
        .enumerate()
        .fold(String::new(), |mut html, (index, item)| {
            let note = if item.is_custom() {
                "Custom donation"
            } else {
                ""
            };

            // Writing to a String cannot fail.
            _ = write!(
                html,
                r#"<div class="cart-item"><div class="meta"><div class="cart-item-title">{title}</div><div class="small">{note}</div></div><div class="cart-item-side"><div class="cart-item-price">{price}</div><button data-idx="{index}" class="small remove-item">Remove</button></div></div>"#,
                title = escape_html(item.title()),
                price = format_currency(item.price()),
            );

            html
        })
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        notify::ToastStack, prompt::MockPrompt, settings::CartKey, storage::MemoryStorage,
    };

    struct Fixture {
        cart: CartManager,
        toasts: ToastStack,
        page: Arc<Page>,
    }

    fn fixture() -> Fixture {
        let store = Store::new(Arc::new(MemoryStorage::new()), CartKey::V2);
        let toasts = ToastStack::default();
        let page = Arc::new(Page::full());
        let cart = CartManager::new(store, Arc::new(toasts.clone()), page.clone());

        Fixture { cart, toasts, page }
    }

    #[test]
    fn add_item_appends_persists_renders_and_notifies() -> Result<(), CartError> {
        let f = fixture();

        f.cart.add_item("Meals", "$25", false)?;
        f.cart.add_item("  Blankets ", "10.50", false)?;

        let titles: Vec<String> = f
            .cart
            .items()
            .iter()
            .map(|item| item.title().to_string())
            .collect();

        assert_eq!(titles, vec!["Meals", "Blankets"]);
        assert_eq!(f.cart.total(), Decimal::new(3550, 2));
        assert_eq!(f.page.content(ElementId::CartTotal).as_deref(), Some("$35.50"));
        assert_eq!(f.page.content(ElementId::CartCount).as_deref(), Some("2"));
        assert_eq!(
            f.toasts.history(),
            vec!["Added to cart: Meals", "Added to cart: Blankets"]
        );

        Ok(())
    }

    #[test]
    fn blank_title_falls_back_to_default() -> Result<(), CartError> {
        let f = fixture();

        let item = f.cart.add_item("   ", "5", false)?;

        assert_eq!(item.title(), DEFAULT_TITLE);

        Ok(())
    }

    #[test]
    fn custom_item_below_minimum_is_rejected() {
        let f = fixture();

        let result = f.cart.add_item("Custom Donation", "0.50", true);

        assert_eq!(
            result,
            Err(CartError::AmountBelowMinimum {
                amount: Decimal::new(50, 2),
                minimum: Decimal::ONE,
            })
        );
        assert!(f.cart.is_empty());
        assert_eq!(f.toasts.history(), vec!["Enter a valid amount (minimum $1)"]);
    }

    #[test]
    fn catalog_item_may_be_free() -> Result<(), CartError> {
        let f = fixture();

        f.cart.add_item("Volunteer sign-up", "free", false)?;

        assert_eq!(f.cart.len(), 1);
        assert_eq!(f.cart.total(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn add_custom_amount_uses_custom_title() -> Result<(), CartError> {
        let f = fixture();

        let item = f.cart.add_custom_amount("15")?;

        assert!(item.is_custom());
        assert_eq!(item.title(), CUSTOM_DONATION_TITLE);
        assert_eq!(f.toasts.history(), vec!["Custom donation added"]);
        assert!(
            f.page
                .content(ElementId::CartItems)
                .is_some_and(|html| html.contains("Custom donation"))
        );

        Ok(())
    }

    #[test]
    fn custom_amount_enabled_requires_one_dollar() {
        assert!(CartManager::custom_amount_enabled("1"));
        assert!(CartManager::custom_amount_enabled("$20"));
        assert!(!CartManager::custom_amount_enabled("0.99"));
        assert!(!CartManager::custom_amount_enabled(""));
    }

    #[test]
    fn remove_at_removes_position() -> Result<(), CartError> {
        let f = fixture();
        f.cart.add_item("A", "1", false)?;
        f.cart.add_item("B", "2", false)?;
        f.cart.add_item("C", "3", false)?;

        let removed = f.cart.remove_at(1);

        assert_eq!(removed.map(|item| item.title().to_string()).as_deref(), Some("B"));
        assert_eq!(f.cart.total(), Decimal::from(4));
        assert_eq!(f.toasts.history().last().map(String::as_str), Some("Item removed"));

        Ok(())
    }

    #[test]
    fn remove_at_out_of_range_leaves_cart_unchanged() -> Result<(), CartError> {
        let f = fixture();
        f.cart.add_item("A", "1", false)?;
        let before = f.cart.items();
        let notified = f.toasts.history().len();

        assert_eq!(f.cart.remove_at(1), None);
        assert_eq!(f.cart.remove_at(usize::MAX), None);
        assert_eq!(f.cart.items(), before);
        assert_eq!(f.toasts.history().len(), notified);

        Ok(())
    }

    #[test]
    fn clear_requires_confirmation() -> Result<(), CartError> {
        let f = fixture();
        f.cart.add_item("A", "1", false)?;

        let mut declined = MockPrompt::new();
        declined
            .expect_confirm()
            .with(eq(CLEAR_QUESTION))
            .times(1)
            .return_const(false);

        assert!(!f.cart.clear(&declined));
        assert_eq!(f.cart.len(), 1);

        let mut accepted = MockPrompt::new();
        accepted.expect_confirm().times(1).return_const(true);

        assert!(f.cart.clear(&accepted));
        assert!(f.cart.is_empty());
        assert_eq!(
            f.page.content(ElementId::CartItems).as_deref(),
            Some(EMPTY_CART_HTML)
        );
        assert_eq!(f.toasts.history().last().map(String::as_str), Some("Cart cleared"));

        Ok(())
    }

    #[test]
    fn oversized_amounts_never_overflow_the_total() -> Result<(), CartError> {
        let f = fixture();

        f.cart.add_item("Big", "50000000000000000000000000000", false)?;
        f.cart.add_item("Big", "50000000000000000000000000000", false)?;
        f.cart.add_item("Max", "1000000000000", false)?;
        f.cart.add_item("Max", "1000000000000", false)?;

        assert_eq!(f.cart.total(), Decimal::from(2_000_000_000_000_i64));
        assert_eq!(
            f.page.content(ElementId::CartTotal).as_deref(),
            Some("$2,000,000,000,000.00")
        );
        assert!(f.cart.add_custom_amount("50000000000000000000000000000").is_err());

        Ok(())
    }

    #[test]
    fn render_escapes_titles() -> Result<(), CartError> {
        let f = fixture();
        f.cart.add_item("<b>Bold</b> & 'quoted'", "1", false)?;

        let html = f.page.content(ElementId::CartItems).unwrap_or_default();

        assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt; &amp; &#39;quoted&#39;"));
        assert!(!html.contains("<b>"));
        assert!(html.contains(r#"data-idx="0""#));

        Ok(())
    }

    #[test]
    fn render_reflects_changes_made_elsewhere() -> Result<(), CartError> {
        let f = fixture();
        f.cart.add_item("A", "1", false)?;

        let other_view = CartManager::new(
            f.cart.store.clone(),
            Arc::new(ToastStack::default()),
            Arc::new(Page::default()),
        );
        other_view.add_item("B", "2", false)?;

        f.cart.render();

        assert_eq!(f.page.content(ElementId::CartCount).as_deref(), Some("2"));
        assert_eq!(f.page.content(ElementId::CartTotal).as_deref(), Some("$3.00"));

        Ok(())
    }

    #[test]
    fn empty_page_renders_nothing() -> Result<(), CartError> {
        let store = Store::new(Arc::new(MemoryStorage::new()), CartKey::V1);
        let page = Arc::new(Page::default());
        let cart = CartManager::new(store, Arc::new(ToastStack::default()), page.clone());

        cart.add_item("A", "1", false)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(page.content(ElementId::CartItems), None);

        Ok(())
    }
}
