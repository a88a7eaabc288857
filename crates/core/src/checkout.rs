//! Checkout
//!
//! Each checkout attempt runs `Idle -> Form -> Processing -> Paid`. Opening checkout needs a
//! non-empty cart; submitting needs a name and email. Payment processing is simulated by a
//! fixed delay on a detached task: once submitted, an attempt always completes, even if the
//! donor closes the form or drops the returned handle.
//!
//! The flow also owns the operations on the last recorded order: manual payment confirmation,
//! trace lookups and the invoice page.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use thiserror::Error;
use tokio::{
    runtime::Handle,
    task::{JoinError, JoinHandle},
};
use tracing::{debug, info, warn};

use crate::{
    cart::CartManager,
    html::escape_html,
    invoice::{TraceOutcome, render_invoice, render_trace},
    notify::Notifier,
    orders::{Donor, Order, OrderId, OrderStatus, random_reference},
    page::{ElementId, Page},
    prompt::Prompt,
    settings::{CheckoutMode, Navigation, Redirect, Settings},
    store::{Store, StoreError},
};

/// Question asked when confirming a manual payment.
pub const CONFIRM_QUESTION: &str = "Enter transaction/reference ID (copy from your payment receipt). Leave blank to confirm without ID.";

const PROCESSING_HTML: &str = r#"<div class="small">Processing payment…</div>"#;
const SUCCESS_HTML: &str = r#"<div class="success">Payment successful. Thank you.</div>"#;

/// Where the current checkout attempt is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// No checkout open.
    #[default]
    Idle,

    /// Donor details form is showing.
    Form,

    /// Payment is being processed.
    Processing,

    /// The attempt finished and the order is recorded.
    Paid,
}

impl Display for CheckoutState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Form => "form",
            Self::Processing => "processing",
            Self::Paid => "paid",
        })
    }
}

/// Errors from checkout and order operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout needs at least one item.
    #[error("cart is empty")]
    EmptyCart,

    /// Name or email was blank.
    #[error("name and email are required")]
    MissingDonorDetails,

    /// The action isn't valid in the current state.
    #[error("cannot {action} while checkout is {state}")]
    InvalidTransition {
        /// State the flow was in.
        state: CheckoutState,

        /// What was attempted.
        action: &'static str,
    },

    /// Payment processing needs a tokio runtime to schedule on.
    #[error("no async runtime available to process payment")]
    NoRuntime,

    /// There is no order on record.
    #[error("no order on record")]
    NoOrder,

    /// The donor dismissed the prompt.
    #[error("prompt dismissed")]
    Dismissed,

    /// The order could not be saved.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The payment task stopped before finishing.
    #[error("payment processing was interrupted")]
    Interrupted(#[source] JoinError),
}

/// How the donor intends to pay. Only changes which details panel is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Card number entry.
    Card,

    /// Bank transfer with a reference.
    Bank,

    /// Mobile wallet.
    Mobile,
}

/// Unrecognised payment method name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "bank" => Ok(Self::Bank),
            "mobile" => Ok(Self::Mobile),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Raw values from the checkout form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Payer name.
    pub name: String,

    /// Payer email.
    pub email: String,

    /// Optional payer phone.
    pub phone: Option<String>,
}

impl CheckoutForm {
    fn into_donor(self) -> Option<Donor> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();

        if name.is_empty() || email.is_empty() {
            return None;
        }

        let phone = self
            .phone
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());

        Some(Donor { name, email, phone })
    }
}

/// A finished checkout attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutReceipt {
    /// The recorded order.
    pub order: Order,

    /// Where to send the donor next, if anywhere.
    pub redirect: Option<Redirect>,
}

/// A confirmed manual payment.
#[derive(Clone, Debug, PartialEq)]
pub struct Confirmation {
    /// The order as now recorded.
    pub order: Order,

    /// Move to the invoice page.
    pub redirect: Redirect,
}

/// A submitted checkout whose payment is being processed.
///
/// Dropping the handle does not stop processing.
#[derive(Debug)]
pub struct CheckoutHandle {
    order_id: OrderId,
    task: JoinHandle<CheckoutReceipt>,
}

impl CheckoutHandle {
    /// The id of the order being processed.
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Wait for processing to finish.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Interrupted`] if the processing task panicked or its runtime
    /// shut down first.
    pub async fn wait(self) -> Result<CheckoutReceipt, CheckoutError> {
        self.task.await.map_err(CheckoutError::Interrupted)
    }
}

/// Checkout state machine and last-order operations.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    cart: CartManager,
    store: Store,
    notifier: Arc<dyn Notifier>,
    page: Arc<Page>,
    settings: Arc<Settings>,
    state: Arc<Mutex<CheckoutState>>,
    payment_method: Arc<Mutex<Option<PaymentMethod>>>,
}

impl CheckoutFlow {
    /// Create a flow over the given cart and store.
    pub fn new(
        cart: CartManager,
        store: Store,
        notifier: Arc<dyn Notifier>,
        page: Arc<Page>,
        settings: Settings,
    ) -> Self {
        Self {
            cart,
            store,
            notifier,
            page,
            settings: Arc::new(settings),
            state: Arc::default(),
            payment_method: Arc::default(),
        }
    }

    /// Current state of the checkout attempt.
    pub fn state(&self) -> CheckoutState {
        *lock(&self.state)
    }

    /// The payment details panel currently shown, if one was picked.
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        *lock(&self.payment_method)
    }

    /// Open the checkout form.
    ///
    /// Opening after a finished attempt starts a new one.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart is empty; the donor is notified and the flow stays idle.
    /// - [`CheckoutError::InvalidTransition`]: a payment is still processing.
    pub fn open(&self) -> Result<(), CheckoutError> {
        let mut state = lock(&self.state);

        match *state {
            CheckoutState::Processing => {
                return Err(CheckoutError::InvalidTransition {
                    state: *state,
                    action: "open checkout",
                });
            }
            CheckoutState::Form => return Ok(()),
            CheckoutState::Idle | CheckoutState::Paid => {}
        }

        if self.cart.is_empty() {
            *state = CheckoutState::Idle;
            drop(state);

            self.notifier.notify("Your cart is empty");

            return Err(CheckoutError::EmptyCart);
        }

        *state = CheckoutState::Form;

        debug!("checkout opened");

        Ok(())
    }

    /// Close the checkout form. Returns whether the form was open.
    ///
    /// Closing while a payment is processing hides nothing and stops nothing.
    pub fn cancel(&self) -> bool {
        let mut state = lock(&self.state);

        match *state {
            CheckoutState::Form => {
                *state = CheckoutState::Idle;

                true
            }
            CheckoutState::Processing => {
                debug!("checkout closed during processing; payment will still complete");

                false
            }
            CheckoutState::Idle | CheckoutState::Paid => false,
        }
    }

    /// Swap the payment details panel. Does not affect submission.
    pub fn select_payment_method(&self, method: PaymentMethod) {
        *lock(&self.payment_method) = Some(method);

        self.page
            .set(ElementId::PaymentDetails, payment_details_html(method));
    }

    /// Submit the checkout form and start processing payment.
    ///
    /// The order is a snapshot of the cart at submission. After the processing delay it is
    /// saved as the last order and its items leave the cart; anything added meanwhile stays.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidTransition`]: the form isn't open.
    /// - [`CheckoutError::MissingDonorDetails`]: name or email is blank; the form stays open.
    /// - [`CheckoutError::EmptyCart`]: the cart was emptied since the form opened.
    /// - [`CheckoutError::NoRuntime`]: not called from within a tokio runtime.
    pub fn submit(&self, form: CheckoutForm) -> Result<CheckoutHandle, CheckoutError> {
        let runtime = Handle::try_current().map_err(|error| {
            warn!(%error, "checkout submitted outside a runtime");

            CheckoutError::NoRuntime
        })?;

        let mut state = lock(&self.state);

        if *state != CheckoutState::Form {
            return Err(CheckoutError::InvalidTransition {
                state: *state,
                action: "submit checkout",
            });
        }

        let Some(donor) = form.into_donor() else {
            drop(state);

            self.notifier.notify("Please provide name and email");

            return Err(CheckoutError::MissingDonorDetails);
        };

        let items = self.cart.items();

        if items.is_empty() {
            *state = CheckoutState::Idle;
            drop(state);

            self.notifier.notify("Your cart is empty");

            return Err(CheckoutError::EmptyCart);
        }

        let status = match self.settings.checkout_mode {
            CheckoutMode::Simulated => OrderStatus::Paid,
            CheckoutMode::Manual => OrderStatus::Pending,
        };
        let order = Order::new(
            OrderId::generate(&mut rand::thread_rng()),
            items,
            donor,
            status,
        );
        let order_id = order.id().clone();

        *state = CheckoutState::Processing;
        drop(state);

        self.page.set(ElementId::CheckoutStatus, PROCESSING_HTML);

        info!(order_id = %order_id, total = %order.total(), "processing payment");

        let flow = self.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(flow.settings.processing_delay).await;

            flow.complete(order)
        });

        Ok(CheckoutHandle { order_id, task })
    }

    fn complete(&self, order: Order) -> CheckoutReceipt {
        self.store.save_last_order(&order);
        self.cart.remove_checked_out(order.items());

        match order.status() {
            OrderStatus::Paid => {
                self.page.set(ElementId::CheckoutStatus, SUCCESS_HTML);
                self.notifier
                    .notify("Payment completed. Receipt saved locally.");
            }
            OrderStatus::Pending | OrderStatus::Unpaid => {
                self.page.set(
                    ElementId::CheckoutStatus,
                    format!(
                        r#"<div class="small">Order {} recorded. Confirm your payment to complete it.</div>"#,
                        escape_html(order.id().as_str())
                    ),
                );
                self.notifier
                    .notify("Order recorded. Confirm your payment once sent.");
            }
        }

        *lock(&self.state) = CheckoutState::Paid;

        info!(order_id = %order.id(), status = %order.status(), "checkout complete");

        CheckoutReceipt {
            redirect: self.settings.success_redirect.map(|to| Redirect {
                to,
                after: self.settings.success_redirect_delay,
            }),
            order,
        }
    }

    /// Mark the last order as paid, asking the donor for a transaction reference.
    ///
    /// A blank reference is accepted and stored as an empty string.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NoOrder`]: nothing to confirm; the donor is notified.
    /// - [`CheckoutError::Dismissed`]: the donor dismissed the prompt; nothing changes.
    /// - [`CheckoutError::Store`]: the confirmed order couldn't be saved; the donor is notified.
    pub fn confirm_payment(&self, prompt: &dyn Prompt) -> Result<Confirmation, CheckoutError> {
        let Some(mut order) = self.store.load_last_order() else {
            self.notifier.notify("No order found to confirm");

            return Err(CheckoutError::NoOrder);
        };

        let Some(reference) = prompt.ask(CONFIRM_QUESTION) else {
            debug!(order_id = %order.id(), "confirmation dismissed");

            return Err(CheckoutError::Dismissed);
        };

        order.mark_paid(reference.trim());

        if let Err(error) = self.store.try_save_last_order(&order) {
            warn!(order_id = %order.id(), %error, "failed to save confirmation");
            self.notifier.notify("Could not save confirmation");

            return Err(error.into());
        }

        info!(order_id = %order.id(), "payment confirmed");
        self.notifier.notify("Payment confirmed. Thank you.");

        Ok(Confirmation {
            order,
            redirect: Redirect {
                to: Navigation::Invoice,
                after: self.settings.confirmation_redirect_delay,
            },
        })
    }

    /// Look up the last order by id, email or phone and render the result.
    pub fn trace(&self, query: &str) -> TraceOutcome {
        let query = query.trim();

        let outcome = if query.is_empty() {
            TraceOutcome::EmptyQuery
        } else {
            match self.store.load_last_order() {
                None => TraceOutcome::NoOrders,
                Some(order) if order.matches_query(query) => TraceOutcome::Found(Box::new(order)),
                Some(_) => TraceOutcome::NotFound,
            }
        };

        self.page.set(ElementId::TraceResult, render_trace(&outcome));

        outcome
    }

    /// Render the last order onto the invoice page.
    pub fn render_invoice(&self) -> Option<Order> {
        let order = self.store.load_last_order();

        self.page
            .set(ElementId::InvoiceContent, render_invoice(order.as_ref()));

        order
    }
}

/// Details panel markup for a payment method.
pub fn payment_details_html(method: PaymentMethod) -> String {
    match method {
        PaymentMethod::Card => r#"<div class="form-row single"><label class="small" for="card-number">Card number</label><input id="card-number" name="card" type="text" inputmode="numeric" placeholder="4242 4242 4242 4242" /></div>"#.to_string(),
        PaymentMethod::Bank => format!(
            r#"<div class="form-row single"><label class="small">Bank transfer instructions</label><div class="small">Use reference: <strong>{}</strong></div></div>"#,
            random_reference(&mut rand::thread_rng(), 7)
        ),
        PaymentMethod::Mobile => r#"<div class="form-row single"><label class="small">Mobile wallet</label><div class="small">Enter mobile number at payment step</div></div>"#.to_string(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
