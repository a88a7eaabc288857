use clap::Args;
use quickfund::{
    checkout::{CheckoutForm, PaymentMethod, payment_details_html},
    money::format_currency,
};

use crate::{cli::CliError, context::AppContext};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Payer name
    #[arg(long)]
    name: String,

    /// Payer email
    #[arg(long)]
    email: String,

    /// Payer phone
    #[arg(long)]
    phone: Option<String>,

    /// Payment method (card, bank, mobile)
    #[arg(long)]
    method: Option<PaymentMethod>,
}

#[derive(Debug, Args)]
pub(crate) struct PayMethodArgs {
    /// Payment method (card, bank, mobile)
    method: PaymentMethod,
}

pub(crate) async fn run(context: &AppContext, args: CheckoutArgs) -> Result<(), CliError> {
    if let Some(method) = args.method {
        context.checkout.select_payment_method(method);
    }

    context.checkout.open()?;

    let handle = context.checkout.submit(CheckoutForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
    })?;

    println!("processing order {}", handle.order_id());

    let receipt = handle.wait().await?;
    let order = &receipt.order;

    println!("order_id: {}", order.id());
    println!("status: {}", order.status());
    println!("total: {}", format_currency(order.total()));

    if let Some(redirect) = receipt.redirect {
        println!("next: {}", redirect.to.href());
    }

    Ok(())
}

pub(crate) fn pay_method(context: &AppContext, args: &PayMethodArgs) {
    context.checkout.select_payment_method(args.method);

    println!("{}", payment_details_html(args.method));
}
