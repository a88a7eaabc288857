use clap::{Parser, Subcommand};
use quickfund::{cart::CartError, checkout::CheckoutError};
use thiserror::Error;

use crate::{
    config::{LoggingConfig, StorefrontConfig},
    context::AppContext,
};

mod cart;
mod checkout;
mod orders;

#[derive(Debug, Parser)]
#[command(name = "quickfund", about = "QuickFund donation cart", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub storefront: StorefrontConfig,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect or change the cart
    Cart(cart::CartCommand),

    /// Check out the cart
    Checkout(checkout::CheckoutArgs),

    /// Show the details panel for a payment method
    PayMethod(checkout::PayMethodArgs),

    /// Confirm payment of the last order
    Confirm(orders::ConfirmArgs),

    /// Look up the last order by id, email or phone
    Trace(orders::TraceArgs),

    /// Show the invoice for the last order
    Invoice(orders::InvoiceArgs),
}

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("no cart item at index {0}")]
    NoSuchItem(usize),

    #[error("no matching order found")]
    OrderNotFound,
}

impl Cli {
    /// Load configuration from `.env`, the environment and arguments.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), CliError> {
        let context = AppContext::from_config(&self.storefront);

        let result = match self.command {
            Commands::Cart(command) => cart::run(&context, command),
            Commands::Checkout(args) => checkout::run(&context, args).await,
            Commands::PayMethod(args) => {
                checkout::pay_method(&context, &args);

                Ok(())
            }
            Commands::Confirm(args) => orders::confirm(&context, args),
            Commands::Trace(args) => orders::trace(&context, &args),
            Commands::Invoice(args) => orders::invoice(&context, &args),
        };

        for message in context.toasts.take_history() {
            println!("* {message}");
        }

        result
    }
}
