//! Gursha CLI - Exercise the client layer against a real or local backend.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (session persists under ~/.gursha/session.json)
//! gursha login -e sara@example.com -p hunter2
//!
//! # Browse
//! gursha restaurants
//! gursha menu rest_1
//! gursha menu rest_1 --refresh
//! gursha search "doro wat"
//!
//! # Cart
//! gursha cart show rest_1 -i itm_1:2 -i itm_2:4
//! gursha cart checkout rest_1 -i itm_1:2 -a addr_1 -p pm_1 --tip 5.00
//!
//! # Orders
//! gursha orders
//! gursha track ord_1
//! gursha track ord_1 --simulate
//! ```
//!
//! # Environment Variables
//!
//! - `GURSHA_ENV` / `GURSHA_API_URL` - Backend selection (see `gursha-client`)
//! - `GURSHA_SESSION_FILE` - Override the session file location

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gursha")]
#[command(author, version, about = "Gursha client-layer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and persist the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and clear the persisted session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List restaurants
    Restaurants,
    /// Show a restaurant's menu
    Menu {
        /// Restaurant id
        restaurant_id: String,

        /// Bypass the cached copy and refetch
        #[arg(long)]
        refresh: bool,
    },
    /// Search restaurants by name or cuisine
    Search {
        /// Search query
        query: String,
    },
    /// Build a cart from a restaurant's menu
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// List your orders
    Orders,
    /// Follow an order until it reaches a terminal state
    Track {
        /// Order id
        order_id: String,

        /// Drive the status forward on a local timer instead of polling
        #[arg(long)]
        simulate: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Price the cart without placing an order
    Show {
        /// Restaurant id
        restaurant_id: String,

        /// Menu item as <menu-item-id>:<quantity>; repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,
    },
    /// Place the cart as an order
    Checkout {
        /// Restaurant id
        restaurant_id: String,

        /// Menu item as <menu-item-id>:<quantity>; repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Delivery address id
        #[arg(short, long)]
        address: String,

        /// Payment method id
        #[arg(short, long)]
        payment: String,

        /// Tip amount in ETB, e.g. 5.00
        #[arg(long)]
        tip: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&email, &password).await?,
        Commands::Logout => commands::auth::logout().await?,
        Commands::Whoami => commands::auth::whoami().await?,
        Commands::Restaurants => commands::browse::restaurants().await?,
        Commands::Menu {
            restaurant_id,
            refresh,
        } => commands::browse::menu(&restaurant_id, refresh).await?,
        Commands::Search { query } => commands::browse::search(&query).await?,
        Commands::Cart { action } => match action {
            CartAction::Show {
                restaurant_id,
                items,
            } => commands::cart::show(&restaurant_id, &items).await?,
            CartAction::Checkout {
                restaurant_id,
                items,
                address,
                payment,
                tip,
            } => {
                commands::cart::checkout(&restaurant_id, &items, &address, &payment, tip.as_deref())
                    .await?;
            }
        },
        Commands::Orders => commands::orders::list().await?,
        Commands::Track { order_id, simulate } => {
            commands::orders::track(&order_id, simulate).await?;
        }
    }
    Ok(())
}
