use clap::{Args, Subcommand};
use quickfund::{money::format_currency, page::ElementId, prompt::FixedPrompt};

use crate::{cli::CliError, context::AppContext, prompt::LinePrompt};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// List the cart
    Show(ShowArgs),

    /// Add a catalog item
    Add(AddArgs),

    /// Add a custom donation amount
    Custom(CustomArgs),

    /// Remove the item at an index
    Remove(RemoveArgs),

    /// Remove every item
    Clear(ClearArgs),
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Print the rendered cart markup instead of a list
    #[arg(long)]
    html: bool,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Item title
    title: String,

    /// Price as shown in the catalog, e.g. "$25"
    price: String,

    /// Treat the price as a donor-chosen amount
    #[arg(long)]
    custom: bool,
}

#[derive(Debug, Args)]
struct CustomArgs {
    /// Amount to donate
    amount: String,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Position of the item, as listed by `cart show`
    index: usize,
}

#[derive(Debug, Args)]
struct ClearArgs {
    /// Clear without asking
    #[arg(long, short)]
    yes: bool,
}

pub(crate) fn run(context: &AppContext, command: CartCommand) -> Result<(), CliError> {
    match command.command {
        CartSubcommand::Show(args) => {
            show(context, &args);

            Ok(())
        }
        CartSubcommand::Add(args) => {
            context.cart.add_item(&args.title, &args.price, args.custom)?;

            Ok(())
        }
        CartSubcommand::Custom(args) => {
            context.cart.add_custom_amount(&args.amount)?;

            Ok(())
        }
        CartSubcommand::Remove(args) => context
            .cart
            .remove_at(args.index)
            .map(|_| ())
            .ok_or(CliError::NoSuchItem(args.index)),
        CartSubcommand::Clear(args) => {
            let cleared = if args.yes {
                context.cart.clear(&FixedPrompt::accept(""))
            } else {
                context.cart.clear(&LinePrompt::terminal())
            };

            if !cleared {
                println!("cart left unchanged");
            }

            Ok(())
        }
    }
}

fn show(context: &AppContext, args: &ShowArgs) {
    if args.html {
        context.cart.render();

        for element in [ElementId::CartItems, ElementId::CartTotal, ElementId::CartCount] {
            println!(
                "{element}: {}",
                context.page.content(element).unwrap_or_default()
            );
        }

        return;
    }

    let items = context.cart.items();

    if items.is_empty() {
        println!("cart is empty");

        return;
    }

    for (index, item) in items.iter().enumerate() {
        let note = if item.is_custom() { " (custom)" } else { "" };

        println!(
            "[{index}] {}{note}  {}",
            item.title(),
            format_currency(item.price())
        );
    }

    println!("total: {}", format_currency(quickfund::cart::total(&items)));
}
