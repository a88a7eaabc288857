//! Invoice and trace markup
//!
//! Renders the last order for the invoice page and the outcome of a trace lookup. Every value
//! that came from the donor or the catalog is escaped.

use std::fmt::Write as _;

use crate::{
    html::escape_html,
    money::format_currency,
    orders::Order,
    settings::Navigation,
};

/// Shown on the invoice page when there is no order on record.
pub const NO_INVOICE_HTML: &str =
    r#"<p class="small">No invoice found. Complete a donation to generate an invoice.</p>"#;

/// Result of looking up the last order.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceOutcome {
    /// Nothing was entered.
    EmptyQuery,

    /// There is no order on record at all.
    NoOrders,

    /// An order exists but the query doesn't identify it.
    NotFound,

    /// The query identifies the last order.
    Found(Box<Order>),
}

impl TraceOutcome {
    /// Whether the lookup found the order.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Invoice markup for `order`, or the "no invoice" placeholder.
pub fn render_invoice(order: Option<&Order>) -> String {
    let Some(order) = order else {
        return NO_INVOICE_HTML.to_string();
    };

    let donor = order.donor();
    let status = order.status();

    let mut details = String::new();

    if let Some(tx_id) = order.tx_id().filter(|tx_id| !tx_id.is_empty()) {
        _ = write!(
            details,
            r#"<div class="small">Transaction ID: <strong>{}</strong></div>"#,
            escape_html(tx_id)
        );
    }

    if let Some(paid_at) = order.paid_at() {
        _ = write!(
            details,
            r#"<div class="small">Paid at: {}</div>"#,
            paid_at.strftime("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    let lines = order
        .items()
        .iter()
        .fold(String::new(), |mut lines, item| {
            _ = write!(
                lines,
                r#"<div class="invoice-line"><div>{}</div><div>{}</div></div>"#,
                escape_html(item.title()),
                format_currency(item.price())
            );

            lines
        });

    format!(
        r#"<div class="invoice-header"><div><div><strong>Order ID:</strong> {id}</div><div class="small">Donor: {name} • {email}</div>{details}</div><div class="invoice-summary"><div class="invoice-total">{total}</div><span class="badge badge-{status}">{label}</span></div></div><div class="invoice-lines">{lines}</div>"#,
        id = escape_html(order.id().as_str()),
        name = escape_html(&donor.name),
        email = escape_html(&donor.email),
        total = format_currency(order.total()),
        status = status.as_str(),
        label = status.label(),
    )
}

/// Markup for a trace lookup result.
pub fn render_trace(outcome: &TraceOutcome) -> String {
    match outcome {
        TraceOutcome::EmptyQuery => {
            r#"<div class="small">Enter order id, email or phone</div>"#.to_string()
        }
        TraceOutcome::NoOrders => r#"<div class="small">No orders found.</div>"#.to_string(),
        TraceOutcome::NotFound => {
            r#"<div class="small">No matching order found.</div>"#.to_string()
        }
        TraceOutcome::Found(order) => {
            let donor = order.donor();

            format!(
                r#"<div><strong>Status:</strong> {status}</div><div class="small">Order ID: {id}</div><div class="small">Donor: {name} • {phone}</div><div><a class="full-btn" href="{href}">View Invoice</a></div>"#,
                status = order.status(),
                id = escape_html(order.id().as_str()),
                name = escape_html(&donor.name),
                phone = escape_html(donor.phone.as_deref().unwrap_or_default()),
                href = Navigation::Invoice.href(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        items::CartItem,
        orders::{Donor, OrderId, OrderStatus},
    };

    fn order(status: OrderStatus) -> Order {
        Order::new(
            OrderId::from("QF-INV0001"),
            vec![
                CartItem::new("Meals <3", Decimal::from(25)),
                CartItem::new("Water", Decimal::new(750, 2)),
            ],
            Donor {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                phone: None,
            },
            status,
        )
    }

    #[test]
    fn no_order_renders_placeholder() {
        assert_eq!(render_invoice(None), NO_INVOICE_HTML);
    }

    #[test]
    fn paid_invoice_shows_badge_total_and_lines() {
        let html = render_invoice(Some(&order(OrderStatus::Paid)));

        assert!(html.contains("QF-INV0001"));
        assert!(html.contains(r#"<span class="badge badge-paid">Paid</span>"#));
        assert!(html.contains("$32.50"));
        assert!(html.contains("Meals &lt;3"));
        assert!(html.contains("$7.50"));
        assert!(html.contains("Paid at:"));
    }

    #[test]
    fn pending_invoice_has_no_paid_at() {
        let html = render_invoice(Some(&order(OrderStatus::Pending)));

        assert!(html.contains(r#"<span class="badge badge-pending">Pending</span>"#));
        assert!(!html.contains("Paid at:"));
    }

    #[test]
    fn transaction_id_is_shown_only_when_present() {
        let mut confirmed = order(OrderStatus::Pending);
        confirmed.mark_paid("TX<1>");

        let mut blank = order(OrderStatus::Pending);
        blank.mark_paid("");

        assert!(render_invoice(Some(&confirmed)).contains("Transaction ID: <strong>TX&lt;1&gt;</strong>"));
        assert!(!render_invoice(Some(&blank)).contains("Transaction ID"));
    }

    #[test]
    fn trace_found_links_to_invoice() {
        let html = render_trace(&TraceOutcome::Found(Box::new(order(OrderStatus::Paid))));

        assert!(html.contains("<strong>Status:</strong> paid"));
        assert!(html.contains("./invoice.html"));
    }

    #[test]
    fn trace_misses_render_messages() {
        assert!(render_trace(&TraceOutcome::EmptyQuery).contains("Enter order id"));
        assert!(render_trace(&TraceOutcome::NoOrders).contains("No orders found"));
        assert!(render_trace(&TraceOutcome::NotFound).contains("No matching order"));
    }
}
