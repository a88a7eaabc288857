//! Items

use jiff::Timestamp;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::money::MAX_AMOUNT;

/// A single donation line in the cart.
///
/// Items have no identity of their own; the cart addresses them by position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default)]
    title: String,

    #[serde(
        default,
        deserialize_with = "amount::deserialize",
        serialize_with = "rust_decimal::serde::arbitrary_precision::serialize"
    )]
    price: Decimal,

    #[serde(default, skip_serializing_if = "is_false")]
    custom: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    added_at: Option<Timestamp>,
}

impl CartItem {
    /// Creates a catalog item added now. The price is clamped to `0..=MAX_AMOUNT`.
    pub fn new(title: impl Into<String>, price: Decimal) -> Self {
        Self {
            title: title.into(),
            price: price.clamp(Decimal::ZERO, MAX_AMOUNT),
            custom: false,
            added_at: Some(Timestamp::now()),
        }
    }

    /// Creates a custom-amount donation added now.
    pub fn custom(title: impl Into<String>, price: Decimal) -> Self {
        Self {
            custom: true,
            ..Self::new(title, price)
        }
    }

    /// Returns the item title as entered, unescaped.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the item price.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Whether the amount was chosen by the donor.
    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// When the item was added, if recorded.
    pub fn added_at(&self) -> Option<Timestamp> {
        self.added_at
    }
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde skip_serializing_if passes fields by reference."
)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Lenient amount decoding shared by cart items and orders.
pub(crate) mod amount {
    use super::{Decimal, Deserialize, Deserializer, FromPrimitive, Value};

    /// Decodes an amount, falling back to zero for anything missing, negative or non-numeric.
    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;

        Ok(value
            .as_ref()
            .and_then(from_value)
            .unwrap_or(Decimal::ZERO))
    }

    fn from_value(value: &Value) -> Option<Decimal> {
        let amount = match value {
            Value::Number(number) => number
                .to_string()
                .parse::<Decimal>()
                .ok()
                .or_else(|| number.as_f64().and_then(Decimal::from_f64)),
            Value::String(text) => text.trim().parse::<Decimal>().ok(),
            _ => None,
        }?;

        (amount >= Decimal::ZERO).then_some(amount)
    }
}
