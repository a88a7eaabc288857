//! Page bindings
//!
//! A [`Page`] knows which of the elements the cart and checkout components write to are present.
//! Writes to absent elements are skipped and logged, so a component can run on any page without
//! checking for its markup first.

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter, Result as FmtResult},
    sync::{Mutex, MutexGuard, PoisonError},
};

use tracing::debug;

/// Elements the components render into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    /// Cart line list.
    CartItems,

    /// Cart total display.
    CartTotal,

    /// Cart item count badge.
    CartCount,

    /// Checkout processing/success panel.
    CheckoutStatus,

    /// Payment method details panel.
    PaymentDetails,

    /// Invoice body.
    InvoiceContent,

    /// Trace lookup output.
    TraceResult,
}

impl ElementId {
    /// Every element, for pages that carry the full set.
    pub const ALL: [Self; 7] = [
        Self::CartItems,
        Self::CartTotal,
        Self::CartCount,
        Self::CheckoutStatus,
        Self::PaymentDetails,
        Self::InvoiceContent,
        Self::TraceResult,
    ];

    /// The DOM id of the element.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CartItems => "cart-items",
            Self::CartTotal => "cart-total",
            Self::CartCount => "cart-count",
            Self::CheckoutStatus => "checkout-status",
            Self::PaymentDetails => "payment-details",
            Self::InvoiceContent => "invoice-content",
            Self::TraceResult => "trace-result",
        }
    }
}

impl Display for ElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// The bound elements of one page and their current content.
#[derive(Debug, Default)]
pub struct Page {
    elements: Mutex<BTreeMap<ElementId, String>>,
}

impl Page {
    /// A page carrying the given elements, all initially empty.
    pub fn with_elements(elements: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            elements: Mutex::new(
                elements
                    .into_iter()
                    .map(|element| (element, String::new()))
                    .collect(),
            ),
        }
    }

    /// A page carrying every element.
    pub fn full() -> Self {
        Self::with_elements(ElementId::ALL)
    }

    /// Whether the element is present.
    pub fn has(&self, element: ElementId) -> bool {
        self.lock().contains_key(&element)
    }

    /// Replace an element's content. Returns `false`, doing nothing, if the element is absent.
    pub fn set(&self, element: ElementId, content: impl Into<String>) -> bool {
        match self.lock().get_mut(&element) {
            Some(slot) => {
                *slot = content.into();

                true
            }
            None => {
                debug!(%element, "element not on page; skipping render");

                false
            }
        }
    }

    /// Current content of an element, if present.
    pub fn content(&self, element: ElementId) -> Option<String> {
        self.lock().get(&element).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ElementId, String>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_on_present_element_updates_content() {
        let page = Page::with_elements([ElementId::CartTotal]);

        assert!(page.set(ElementId::CartTotal, "$1.00"));
        assert_eq!(page.content(ElementId::CartTotal).as_deref(), Some("$1.00"));
    }

    #[test]
    fn set_on_absent_element_is_a_no_op() {
        let page = Page::with_elements([ElementId::CartTotal]);

        assert!(!page.set(ElementId::TraceResult, "found"));
        assert!(!page.has(ElementId::TraceResult));
        assert_eq!(page.content(ElementId::TraceResult), None);
    }

    #[test]
    fn full_page_has_every_element() {
        let page = Page::full();

        assert!(ElementId::ALL.iter().all(|element| page.has(*element)));
    }
}
