//! Settings

use std::time::Duration;

/// Storage key the cart is kept under.
///
/// The pages shipped two independent cart layouts; they are not migrated between.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CartKey {
    /// `qf_cart_v1`, used by the standalone cart page.
    V1,

    /// `qf_cart_v2`, used by the pages with checkout and invoices.
    #[default]
    V2,
}

impl CartKey {
    /// The storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "qf_cart_v1",
            Self::V2 => "qf_cart_v2",
        }
    }
}

/// Storage key of the last order record.
pub const LAST_ORDER_KEY: &str = "qf_last_order";

/// How checkout settles an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckoutMode {
    /// Payment is simulated and the order is paid as soon as processing finishes.
    #[default]
    Simulated,

    /// The order is left pending until the donor confirms payment.
    Manual,
}

/// Pages the flow may send the donor to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Thank-you page shown after checkout.
    ThankYou,

    /// Invoice for the last order.
    Invoice,
}

impl Navigation {
    /// Relative URL of the page.
    pub fn href(self) -> &'static str {
        match self {
            Self::ThankYou => "./thankyou.html",
            Self::Invoice => "./invoice.html",
        }
    }
}

/// A navigation to perform after a pause, so the donor can read the last notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Redirect {
    /// Destination page.
    pub to: Navigation,

    /// How long to wait before navigating.
    pub after: Duration,
}

/// Tunables shared by the cart and checkout components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Cart storage key.
    pub cart_key: CartKey,

    /// How long notifications stay visible.
    pub toast_duration: Duration,

    /// Simulated payment processing time.
    pub processing_delay: Duration,

    /// How checkout settles orders.
    pub checkout_mode: CheckoutMode,

    /// Where to go once checkout succeeds, if anywhere.
    pub success_redirect: Option<Navigation>,

    /// Pause before the post-checkout redirect.
    pub success_redirect_delay: Duration,

    /// Pause before moving to the invoice after confirming payment.
    pub confirmation_redirect_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cart_key: CartKey::default(),
            toast_duration: Duration::from_millis(2_000),
            processing_delay: Duration::from_millis(1_200),
            checkout_mode: CheckoutMode::default(),
            success_redirect: Some(Navigation::ThankYou),
            success_redirect_delay: Duration::from_millis(1_200),
            confirmation_redirect_delay: Duration::from_millis(700),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_redirect_to_thank_you_page() {
        let settings = Settings::default();

        assert_eq!(settings.cart_key.as_str(), "qf_cart_v2");
        assert_eq!(settings.success_redirect, Some(Navigation::ThankYou));
        assert_eq!(settings.processing_delay, Duration::from_millis(1_200));
    }

    #[test]
    fn navigation_targets_are_relative_pages() {
        assert_eq!(Navigation::ThankYou.href(), "./thankyou.html");
        assert_eq!(Navigation::Invoice.href(), "./invoice.html");
    }
}
