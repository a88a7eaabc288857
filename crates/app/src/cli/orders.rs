use clap::Args;
use quickfund::{
    invoice::TraceOutcome,
    money::format_currency,
    page::ElementId,
    prompt::{FixedPrompt, Prompt},
};

use crate::{cli::CliError, context::AppContext, prompt::LinePrompt};

#[derive(Debug, Args)]
pub(crate) struct ConfirmArgs {
    /// Transaction/reference id; asked for when omitted
    #[arg(long)]
    tx: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct TraceArgs {
    /// Order id, email or phone
    query: String,

    /// Print the rendered trace markup
    #[arg(long)]
    html: bool,
}

#[derive(Debug, Args)]
pub(crate) struct InvoiceArgs {
    /// Print the rendered invoice markup
    #[arg(long)]
    html: bool,
}

pub(crate) fn confirm(context: &AppContext, args: ConfirmArgs) -> Result<(), CliError> {
    let prompt: Box<dyn Prompt> = match args.tx {
        Some(tx) => Box::new(FixedPrompt::accept(tx)),
        None => Box::new(LinePrompt::terminal()),
    };

    let confirmation = context.checkout.confirm_payment(prompt.as_ref())?;

    println!("order_id: {}", confirmation.order.id());
    println!("status: {}", confirmation.order.status());
    println!("next: {}", confirmation.redirect.to.href());

    Ok(())
}

pub(crate) fn trace(context: &AppContext, args: &TraceArgs) -> Result<(), CliError> {
    let outcome = context.checkout.trace(&args.query);

    if args.html {
        println!(
            "{}",
            context
                .page
                .content(ElementId::TraceResult)
                .unwrap_or_default()
        );
    }

    match outcome {
        TraceOutcome::Found(order) => {
            if !args.html {
                println!("status: {}", order.status());
                println!("order_id: {}", order.id());
                println!("donor: {}", order.donor().name);
            }

            Ok(())
        }
        TraceOutcome::EmptyQuery | TraceOutcome::NoOrders | TraceOutcome::NotFound => {
            Err(CliError::OrderNotFound)
        }
    }
}

pub(crate) fn invoice(context: &AppContext, args: &InvoiceArgs) -> Result<(), CliError> {
    let order = context.checkout.render_invoice();

    if args.html {
        println!(
            "{}",
            context
                .page
                .content(ElementId::InvoiceContent)
                .unwrap_or_default()
        );

        return Ok(());
    }

    let Some(order) = order else {
        return Err(CliError::OrderNotFound);
    };

    println!("order_id: {}", order.id());
    println!("donor: {} <{}>", order.donor().name, order.donor().email);
    println!("status: {}", order.status().label());

    if let Some(tx_id) = order.tx_id().filter(|tx_id| !tx_id.is_empty()) {
        println!("tx_id: {tx_id}");
    }

    if let Some(paid_at) = order.paid_at() {
        println!("paid_at: {paid_at}");
    }

    for item in order.items() {
        println!("  {}  {}", item.title(), format_currency(item.price()));
    }

    println!("total: {}", format_currency(order.total()));

    Ok(())
}
