//! CLI configuration

use std::{path::PathBuf, time::Duration};

use clap::Args;
use quickfund::settings::{CartKey, CheckoutMode, Settings};

pub(crate) mod observability;

pub(crate) use observability::{LogFormat, LoggingConfig};

/// Cart layout to read and write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum CartKeyArg {
    /// `qf_cart_v1`
    V1,

    /// `qf_cart_v2`
    #[default]
    V2,
}

impl From<CartKeyArg> for CartKey {
    fn from(value: CartKeyArg) -> Self {
        match value {
            CartKeyArg::V1 => Self::V1,
            CartKeyArg::V2 => Self::V2,
        }
    }
}

/// How checkout settles orders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum CheckoutModeArg {
    /// Orders are paid once processing finishes.
    #[default]
    Simulated,

    /// Orders stay pending until `confirm` is run.
    Manual,
}

impl From<CheckoutModeArg> for CheckoutMode {
    fn from(value: CheckoutModeArg) -> Self {
        match value {
            CheckoutModeArg::Simulated => Self::Simulated,
            CheckoutModeArg::Manual => Self::Manual,
        }
    }
}

/// Storefront settings.
#[derive(Debug, Args)]
pub(crate) struct StorefrontConfig {
    /// Directory the cart and last order are kept in
    #[arg(long, env = "QF_DATA_DIR", default_value = ".quickfund")]
    pub data_dir: PathBuf,

    /// Cart layout (v1, v2)
    #[arg(long, env = "QF_CART_KEY", value_enum, default_value_t = CartKeyArg::V2)]
    pub cart_key: CartKeyArg,

    /// Checkout mode (simulated, manual)
    #[arg(long, env = "QF_CHECKOUT_MODE", value_enum, default_value_t = CheckoutModeArg::Simulated)]
    pub checkout_mode: CheckoutModeArg,

    /// Simulated payment processing time in milliseconds
    #[arg(long, env = "QF_PROCESSING_DELAY_MS", default_value_t = 1_200_u64)]
    pub processing_delay_ms: u64,

    /// How long notifications stay visible in milliseconds
    #[arg(long, env = "QF_TOAST_DURATION_MS", default_value_t = 2_000_u64)]
    pub toast_duration_ms: u64,
}

impl StorefrontConfig {
    /// Component settings for this configuration.
    pub(crate) fn settings(&self) -> Settings {
        Settings {
            cart_key: self.cart_key.into(),
            checkout_mode: self.checkout_mode.into(),
            processing_delay: Duration::from_millis(self.processing_delay_ms),
            toast_duration: Duration::from_millis(self.toast_duration_ms),
            ..Settings::default()
        }
    }
}
