//! # Tally Register Entry Point
//!
//! Line-oriented terminal front end over the register commands.
//!
//! ## Usage
//! ```bash
//! tally-register --db ./tally.db --no-viewer
//!
//! > login 1111
//! > add p2 size=large extras=shot
//! > qty 0 2
//! > submit
//! > report
//! > logout
//! > quit
//! ```
//!
//! ## Startup Sequence
//! 1. Parse flags (flags override `TALLY_*` environment variables)
//! 2. Initialize tracing (stderr)
//! 3. Open the store & build the print pipeline
//! 4. Read commands from stdin until `quit` or end of input

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tally_core::{AddonSelection, Order};
use tally_receipt::PrintOutcome;
use tally_register::commands::{auth, catalog, order, report, settings, OrderResponse};
use tally_register::error::ApiError;
use tally_register::state::ConfigState;
use tally_register::{init_tracing, Register};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "tally-register", version, about = "Tally POS register")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "TALLY_DB_PATH")]
    db: Option<PathBuf>,

    /// Directory documents are written to before opening the viewer
    #[arg(long, env = "TALLY_SPOOL_DIR")]
    spool_dir: Option<PathBuf>,

    /// Save printed documents without opening the system viewer
    #[arg(long)]
    no_viewer: bool,
}

const HELP: &str = "\
Commands:
  staff                       staff on the login screen
  login <code>                log in with a 4-digit access code
  as <staff-id>               log in as a listed staff member
  menu                        products and addon choices
  add <product-id> [cat=opt]  add a product with addon choices
  qty <line> <n>              set the quantity of an order line
  rm <line>                   remove an order line
  show                        current order
  submit                      submit (and auto-print) the order
  print                       print the current order
  report                      sales report
  print-report                print the sales report
  orders                      submitted orders, newest first
  admin <code>                unlock admin commands
  clear-orders                empty the order ledger (admin)
  logout                      end the session, dropping unsubmitted items
  quit";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ConfigState::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(spool_dir) = cli.spool_dir {
        config.spool_dir = spool_dir;
    }
    if cli.no_viewer {
        config.open_viewer = false;
    }

    let register = match Register::open(config).await {
        Ok(register) => register,
        Err(e) => {
            error!(error = %e, "Failed to open register");
            eprintln!("Failed to open database: {}", e.message);
            return ExitCode::FAILURE;
        }
    };

    let shop = settings::get_settings(&register.store).await.shop_name;
    println!("{} register. Type `help` for commands.", shop);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Failed to read input");
                break;
            }
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            continue;
        };
        if command == "quit" || command == "exit" {
            break;
        }

        if let Err(e) = run_command(&register, command, args).await {
            println!("error: {}", e.message);
        }
    }

    register.shutdown().await;
    ExitCode::SUCCESS
}

async fn run_command(reg: &Register, command: &str, args: &[&str]) -> Result<(), ApiError> {
    let symbol = settings::get_settings(&reg.store).await.currency_symbol;

    match command {
        "help" => println!("{}", HELP),
        "staff" => {
            for staff in auth::login_candidates(&reg.store).await {
                println!("  {:<8} {}", staff.id, staff.name);
            }
        }
        "login" => {
            let response = auth::login_with_code(&reg.store, &reg.session, arg(args, 0)?).await?;
            show_order(&response, &symbol);
        }
        "as" => {
            let response = auth::login_as(&reg.store, &reg.session, arg(args, 0)?).await?;
            show_order(&response, &symbol);
        }
        "menu" => {
            for product in catalog::list_products(&reg.store).await {
                println!(
                    "  {:<8} {:<20} {}",
                    product.id,
                    product.name,
                    product.price.format_with_symbol(&symbol)
                );
                for category in &product.addon_categories {
                    let options: Vec<String> = category
                        .options
                        .iter()
                        .map(|o| format!("{}={} (+{})", category.id, o.id, o.price_adjustment))
                        .collect();
                    let kind = if category.is_single_select { "pick one" } else { "any" };
                    println!("           {} [{}]: {}", category.name, kind, options.join(", "));
                }
            }
        }
        "add" => {
            let selections = args
                .get(1..)
                .unwrap_or_default()
                .iter()
                .map(|s| parse_selection(s))
                .collect::<Result<Vec<_>, _>>()?;
            let response = order::add_to_order(&reg.store, &reg.session, arg(args, 0)?, &selections).await?;
            show_order(&response, &symbol);
        }
        "qty" => {
            let index = parse_number(arg(args, 0)?)?;
            let quantity = parse_number(arg(args, 1)?)?;
            let response = order::update_item_quantity(&reg.session, index, quantity)?;
            show_order(&response, &symbol);
        }
        "rm" => {
            let response = order::remove_item(&reg.session, parse_number(arg(args, 0)?)?)?;
            show_order(&response, &symbol);
        }
        "show" => show_order(&order::get_order(&reg.session), &symbol),
        "submit" => {
            let submitted = order::submit_order(&reg.store, &reg.session, &reg.printer).await?;
            println!(
                "Order #{} submitted: {}",
                submitted.order.number(),
                submitted.order.total_amount.format_with_symbol(&symbol)
            );
            if !submitted.persisted {
                println!("warning: the order could not be saved");
            }
            if let Some(outcome) = &submitted.print {
                show_print(outcome);
            }
        }
        "print" => {
            let outcome = order::print_current_order(&reg.store, &reg.session, &reg.printer).await?;
            show_print(&outcome);
        }
        "report" => {
            let report = report::daily_report(&reg.store).await;
            for sales in &report.staff_sales {
                println!(
                    "  {:<16} {:>3} orders  {}",
                    sales.staff_name,
                    sales.order_count,
                    sales.total_amount.format_with_symbol(&symbol)
                );
            }
            println!(
                "  {:<16} {:>3} orders  {}",
                "TOTAL",
                report.order_count,
                report.total_amount.format_with_symbol(&symbol)
            );
        }
        "print-report" => show_print(&report::print_daily_report(&reg.store, &reg.printer).await),
        "orders" => {
            for order in report::list_orders(&reg.store).await {
                show_order_line(&order, &symbol);
            }
        }
        "admin" => {
            auth::unlock_admin(&reg.store, &reg.admin, arg(args, 0)?).await?;
            println!("Admin unlocked");
        }
        "clear-orders" => {
            report::clear_orders(&reg.store, &reg.admin).await?;
            println!("Orders cleared");
        }
        "logout" => {
            auth::logout(&reg.session, &reg.admin);
            println!("Logged out");
        }
        other => println!("Unknown command `{}`. Type `help`.", other),
    }

    Ok(())
}

fn arg<'a>(args: &[&'a str], index: usize) -> Result<&'a str, ApiError> {
    args.get(index)
        .copied()
        .ok_or_else(|| ApiError::validation("Missing argument; type `help`"))
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation(format!("Not a number: {}", raw)))
}

fn parse_selection(raw: &str) -> Result<AddonSelection, ApiError> {
    raw.split_once('=')
        .map(|(category, option)| AddonSelection::new(category, option))
        .ok_or_else(|| ApiError::validation(format!("Expected category=option, got {}", raw)))
}

fn show_order(response: &OrderResponse, symbol: &str) {
    let (Some(staff), Some(order)) = (&response.staff, &response.order) else {
        println!("Nobody logged in");
        return;
    };

    println!("Order #{} for {}", order.number(), staff.name);
    for (index, item) in order.items.iter().enumerate() {
        println!(
            "  [{}] {:<20} x{:<3} {}",
            index,
            item.product_name,
            item.quantity,
            item.total_price.format_with_symbol(symbol)
        );
        for addon in &item.selected_addons {
            println!("        + {}: {}", addon.category_name, addon.option_name);
        }
    }
    println!("  Total: {}", order.total_amount.format_with_symbol(symbol));
}

fn show_order_line(order: &Order, symbol: &str) {
    println!(
        "  #{:<14} {:<12} {:>3} items  {}",
        order.number(),
        order.staff_name,
        order.total_quantity(),
        order.total_amount.format_with_symbol(symbol)
    );
}

fn show_print(outcome: &PrintOutcome) {
    match outcome {
        PrintOutcome::Displayed { path } => println!("Printed: {}", path.display()),
        PrintOutcome::Downloaded { path } => println!("Saved for printing: {}", path.display()),
        PrintOutcome::Failed { reason } => println!("Print failed: {}", reason),
    }
}
