//! App Context

use std::sync::Arc;

use quickfund::prelude::*;

use crate::config::StorefrontConfig;

/// The storefront components one command works with.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub cart: CartManager,
    pub checkout: CheckoutFlow,
    pub toasts: ToastStack,
    pub page: Arc<Page>,
}

impl AppContext {
    /// Build the components over the configured data directory.
    pub(crate) fn from_config(config: &StorefrontConfig) -> Self {
        Self::with_storage(
            Arc::new(FileStorage::new(config.data_dir.clone())),
            config.settings(),
        )
    }

    /// Build the components over any storage backend.
    pub(crate) fn with_storage(storage: Arc<dyn KeyValueStorage>, settings: Settings) -> Self {
        let store = Store::new(storage, settings.cart_key);
        let toasts = ToastStack::new(settings.toast_duration);
        let notifier: Arc<dyn Notifier> = Arc::new(toasts.clone());
        let page = Arc::new(Page::full());
        let cart = CartManager::new(store.clone(), notifier.clone(), page.clone());
        let checkout = CheckoutFlow::new(cart.clone(), store, notifier, page.clone(), settings);

        Self {
            cart,
            checkout,
            toasts,
            page,
        }
    }
}
