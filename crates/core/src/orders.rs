//! Orders
//!
//! An order is a frozen snapshot of the cart plus the donor's details, created when checkout is
//! submitted. Only the most recent order is ever kept.

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{items::CartItem, money};

const ORDER_ID_PREFIX: &str = "QF-";
const REFERENCE_LEN: usize = 7;

/// Generates a random uppercase base-36 reference of the given length.
pub fn random_reference<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .filter_map(|_| char::from_digit(rng.gen_range(0..36), 36))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Order identifier, `QF-` followed by seven uppercase base-36 characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Generates a fresh identifier.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(format!(
            "{ORDER_ID_PREFIX}{}",
            random_reference(rng, REFERENCE_LEN)
        ))
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Payment status of an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Payment received or confirmed.
    Paid,

    /// Awaiting manual confirmation.
    Pending,

    /// No payment recorded. Unrecognised stored statuses read as this.
    #[default]
    #[serde(other)]
    Unpaid,
}

impl OrderStatus {
    /// Lowercase status as stored and shown in trace results.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::Pending => "pending",
        }
    }

    /// Human readable badge label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
            Self::Pending => "Pending",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// The person making the donation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    /// Full name.
    #[serde(default)]
    pub name: String,

    /// Contact email.
    #[serde(default)]
    pub email: String,

    /// Optional phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A completed (or awaiting confirmation) checkout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,

    #[serde(default)]
    items: Vec<CartItem>,

    #[serde(default)]
    donor: Donor,

    #[serde(
        default,
        deserialize_with = "crate::items::amount::deserialize",
        serialize_with = "rust_decimal::serde::arbitrary_precision::serialize"
    )]
    total: Decimal,

    #[serde(default)]
    status: OrderStatus,

    created_at: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    paid_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    tx_id: Option<String>,
}

impl Order {
    /// Creates an order from a snapshot of cart items. The total is computed from the snapshot.
    pub fn new(id: OrderId, items: Vec<CartItem>, donor: Donor, status: OrderStatus) -> Self {
        let total = money::sum(items.iter().map(CartItem::price));
        let created_at = Timestamp::now();

        Self {
            id,
            items,
            donor,
            total,
            status,
            created_at,
            paid_at: (status == OrderStatus::Paid).then_some(created_at),
            tx_id: None,
        }
    }

    /// Marks the order as paid now, recording the transaction reference.
    pub fn mark_paid(&mut self, tx_id: impl Into<String>) {
        self.status = OrderStatus::Paid;
        self.paid_at = Some(Timestamp::now());
        self.tx_id = Some(tx_id.into());
    }

    /// Whether a trace query identifies this order.
    ///
    /// Matches the exact order id, the donor email ignoring case, or the exact donor phone.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return false;
        }

        query == self.id.as_str()
            || query.to_lowercase() == self.donor.email.to_lowercase()
            || self.donor.phone.as_deref() == Some(query)
    }

    /// Order identifier.
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Items as they were at checkout.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Donor details.
    pub fn donor(&self) -> &Donor {
        &self.donor
    }

    /// Total at checkout.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Current payment status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// When the order was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When payment was recorded, if it has been.
    pub fn paid_at(&self) -> Option<Timestamp> {
        self.paid_at
    }

    /// Transaction reference supplied on confirmation.
    pub fn tx_id(&self) -> Option<&str> {
        self.tx_id.as_deref()
    }
}
