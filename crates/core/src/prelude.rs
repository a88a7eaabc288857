//! QuickFund prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    Decimal,
    cart::{CartError, CartManager},
    checkout::{
        CheckoutError, CheckoutFlow, CheckoutForm, CheckoutHandle, CheckoutReceipt, CheckoutState,
        Confirmation, PaymentMethod,
    },
    html::escape_html,
    invoice::TraceOutcome,
    items::CartItem,
    money::{format_currency, parse_price},
    notify::{Notifier, ToastStack},
    orders::{Donor, Order, OrderId, OrderStatus},
    page::{ElementId, Page},
    prompt::{FixedPrompt, Prompt},
    settings::{CartKey, CheckoutMode, Navigation, Redirect, Settings},
    storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError},
    store::{Store, StoreError},
};
