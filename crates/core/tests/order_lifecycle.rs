//! Integration tests for a donor's cart, checkout and order lookups.

use std::{sync::Arc, time::Duration};

use testresult::TestResult;

use quickfund::prelude::*;

struct Storefront {
    cart: CartManager,
    checkout: CheckoutFlow,
    store: Store,
    toasts: ToastStack,
    page: Arc<Page>,
}

fn storefront(storage: Arc<dyn KeyValueStorage>, settings: Settings) -> Storefront {
    let store = Store::new(storage, settings.cart_key);
    let toasts = ToastStack::new(settings.toast_duration);
    let notifier: Arc<dyn Notifier> = Arc::new(toasts.clone());
    let page = Arc::new(Page::full());
    let cart = CartManager::new(store.clone(), notifier.clone(), page.clone());
    let checkout = CheckoutFlow::new(
        cart.clone(),
        store.clone(),
        notifier,
        page.clone(),
        settings,
    );

    Storefront {
        cart,
        checkout,
        store,
        toasts,
        page,
    }
}

fn donor() -> CheckoutForm {
    CheckoutForm {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: Some(" 555-0100 ".to_string()),
    }
}

#[tokio::test(start_paused = true)]
async fn donation_from_cart_to_invoice() -> TestResult {
    let shop = storefront(Arc::new(MemoryStorage::new()), Settings::default());

    shop.cart.add_item("Meals", "$25", false)?;
    shop.cart.add_custom_amount("10")?;

    assert_eq!(
        shop.page.content(ElementId::CartTotal).as_deref(),
        Some("$35.00")
    );

    shop.checkout.open()?;
    let receipt = shop.checkout.submit(donor())?.wait().await?;

    assert_eq!(receipt.order.status(), OrderStatus::Paid);
    assert_eq!(receipt.order.total(), Decimal::from(35));
    assert!(receipt.order.id().as_str().starts_with("QF-"));
    assert!(shop.cart.is_empty());
    assert_eq!(
        shop.page.content(ElementId::CartCount).as_deref(),
        Some("0")
    );

    let traced = shop.checkout.trace("555-0100");
    assert!(traced.is_match());

    let invoice = shop.checkout.render_invoice().ok_or("no invoice")?;
    assert_eq!(invoice.id(), receipt.order.id());
    assert!(
        shop.page
            .content(ElementId::InvoiceContent)
            .is_some_and(|html| html.contains("$35.00") && html.contains("badge-paid"))
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn manual_checkout_then_confirmation() -> TestResult {
    let shop = storefront(
        Arc::new(MemoryStorage::new()),
        Settings {
            checkout_mode: CheckoutMode::Manual,
            ..Settings::default()
        },
    );

    shop.cart.add_item("Blankets", "40", false)?;
    shop.checkout.open()?;
    let receipt = shop.checkout.submit(donor())?.wait().await?;

    assert_eq!(receipt.order.status(), OrderStatus::Pending);

    let confirmation = shop
        .checkout
        .confirm_payment(&FixedPrompt::accept(" BANK-REF-9 "))?;

    assert_eq!(confirmation.order.id(), receipt.order.id());
    assert_eq!(confirmation.order.tx_id(), Some("BANK-REF-9"));
    assert_eq!(confirmation.redirect.to, Navigation::Invoice);

    let stored = shop.store.load_last_order().ok_or("order missing")?;
    assert_eq!(stored.status(), OrderStatus::Paid);
    assert!(stored.paid_at().is_some());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn second_checkout_replaces_last_order() -> TestResult {
    let shop = storefront(Arc::new(MemoryStorage::new()), Settings::default());

    shop.cart.add_item("Meals", "25", false)?;
    shop.checkout.open()?;
    let first = shop.checkout.submit(donor())?.wait().await?;

    shop.cart.add_item("Water", "5", false)?;
    shop.checkout.open()?;
    let second = shop.checkout.submit(donor())?.wait().await?;

    let stored = shop.store.load_last_order().ok_or("order missing")?;

    assert_eq!(stored.id(), second.order.id());
    assert_ne!(first.order.id(), second.order.id());
    assert_eq!(
        shop.checkout.trace(first.order.id().as_str()),
        TraceOutcome::NotFound
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn toasts_expire_while_history_remains() -> TestResult {
    let shop = storefront(
        Arc::new(MemoryStorage::new()),
        Settings {
            toast_duration: Duration::from_millis(300),
            ..Settings::default()
        },
    );

    shop.cart.add_item("Meals", "25", false)?;
    shop.cart.add_item("Meals", "25", false)?;

    assert_eq!(shop.toasts.messages().len(), 2);

    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(shop.toasts.messages().is_empty());
    assert_eq!(
        shop.toasts.history(),
        vec!["Added to cart: Meals", "Added to cart: Meals"]
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cart_and_orders_survive_restart_on_disk() -> TestResult {
    let dir = tempfile::tempdir()?;

    {
        let shop = storefront(
            Arc::new(FileStorage::new(dir.path())),
            Settings::default(),
        );

        shop.cart.add_item("Meals", "25", false)?;
        shop.checkout.open()?;
        shop.checkout.submit(donor())?.wait().await?;
        shop.cart.add_item("Water", "5", false)?;
    }

    let reopened = storefront(
        Arc::new(FileStorage::new(dir.path())),
        Settings::default(),
    );

    assert_eq!(reopened.cart.len(), 1);
    assert_eq!(reopened.cart.total(), Decimal::from(5));
    assert!(reopened.checkout.trace("JANE@x.com").is_match());

    Ok(())
}

#[test]
fn unavailable_storage_degrades_to_empty_state() -> TestResult {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_disabled(true);

    let shop = storefront(storage, Settings::default());

    shop.cart.add_item("Meals", "25", false)?;

    assert!(shop.cart.is_empty());
    assert_eq!(shop.checkout.trace("anything"), TraceOutcome::NoOrders);
    assert!(shop.checkout.render_invoice().is_none());
    assert!(matches!(
        shop.checkout.open(),
        Err(CheckoutError::EmptyCart)
    ));

    Ok(())
}
