//! QuickFund
//!
//! QuickFund is the cart, checkout and order engine behind a small donation storefront. Donors
//! build a cart of catalog items and custom amounts, check out with their contact details, and
//! can later confirm a payment, trace their order or view its invoice.

pub mod cart;
pub mod checkout;
pub mod html;
pub mod invoice;
pub mod items;
pub mod money;
pub mod notify;
pub mod orders;
pub mod page;
pub mod prelude;
pub mod prompt;
pub mod settings;
pub mod storage;
pub mod store;

pub use rust_decimal::Decimal;
