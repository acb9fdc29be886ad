//! Valoisa CLI - drive the storefront cart from a terminal.
//!
//! Each invocation behaves like a page load: the cart is restored from the
//! file-backed mirror, one action is applied, and the resulting cart is
//! printed.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart (with in-person pickup, no shipping fee)
//! valoisa show --pickup
//!
//! # Add the featured product, three units
//! valoisa add --quantity 3
//!
//! # Adjust a line
//! valoisa inc 1
//! valoisa dec 1
//!
//! # Check out and wait for confirmation
//! valoisa checkout
//!
//! # Wipe the stored cart
//! valoisa reset
//! ```
//!
//! Configuration comes from `STOREFRONT_*` environment variables (see
//! `valoisa_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use valoisa_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "valoisa")]
#[command(author, version, about = "Valoisa storefront cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart and its totals
    Show {
        /// Pick the order up at the event (no shipping fee)
        #[arg(long)]
        pickup: bool,

        /// Print the cart as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add the featured product to the cart
    Add {
        /// Number of units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Add one unit to a line
    Inc {
        /// Product id of the line
        id: ProductId,
    },
    /// Remove one unit from a line (drops the line at zero)
    Dec {
        /// Product id of the line
        id: ProductId,
    },
    /// Check out the cart
    Checkout {
        /// Pick the order up at the event (no shipping fee)
        #[arg(long)]
        pickup: bool,
    },
    /// Delete the stored cart
    Reset,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "valoisa_storefront=info,valoisa_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::cart::CommandError> {
    let config = valoisa_storefront::StorefrontConfig::from_env()?;
    let mut session = commands::cart::Session::open(&config)?;

    match cli.command {
        Commands::Show { pickup, json } => session.show(pickup, json)?,
        Commands::Add { quantity } => session.add(quantity)?,
        Commands::Inc { id } => session.increment(id)?,
        Commands::Dec { id } => session.decrement(id)?,
        Commands::Checkout { pickup } => session.checkout(pickup).await?,
        Commands::Reset => session.reset()?,
    }
    Ok(())
}
