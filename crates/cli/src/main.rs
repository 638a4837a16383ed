//! MediShop CLI - the storefront in a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (prompts for the password when --password is omitted)
//! medishop login abc
//!
//! # Browse, search and filter the catalog
//! medishop products
//! medishop products --search dolo
//! medishop products --category tablets
//!
//! # Buy things
//! medishop add-to-cart 7
//! medishop buy 7
//!
//! # Manage the cart
//! medishop cart
//! medishop cart order 7
//! medishop cart remove 7
//!
//! # Past orders
//! medishop orders
//! ```
//!
//! # Environment Variables
//!
//! - `MEDISHOP_API_URL` - backend base URL
//! - `MEDISHOP_SESSION_FILE` - where the login session is kept
//! - `MEDISHOP_REQUEST_TIMEOUT_SECS` - optional request timeout
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - optional error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use medishop_client::config::ClientConfig;
use medishop_client::state::AppState;
use medishop_core::{Category, ProductId};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "medishop")]
#[command(author, version, about = "MediShop storefront in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the storefront
    Login {
        /// Username
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out and clear the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Browse the product catalog
    Products {
        /// Search products by name
        #[arg(short, long, conflicts_with = "category")]
        search: Option<String>,

        /// Show one category (tablets, patanjali, tonic, cardiac, vitamins)
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Add a product to the cart
    AddToCart {
        /// Product ID
        product_id: ProductId,
    },
    /// Order a product right away
    Buy {
        /// Product ID
        product_id: ProductId,
    },
    /// Show and manage the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Show past orders
    Orders,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart (default)
    Show,
    /// Order a product from the cart
    Order {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed for Sentry, which must start before tracing
    let config = ClientConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "medishop_client=info,medishop_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config)?;
    let mut out = std::io::stdout();

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&state, &username, password, &mut out).await?;
        }
        Commands::Logout => commands::auth::logout(&state, &mut out)?,
        Commands::Whoami => commands::auth::whoami(&state, &mut out)?,
        Commands::Products { search, category } => {
            commands::catalog::products(&state, search.as_deref(), category, &mut out).await?;
        }
        Commands::AddToCart { product_id } => {
            commands::catalog::add_to_cart(&state, product_id, &mut out).await?;
        }
        Commands::Buy { product_id } => {
            commands::catalog::buy(&state, product_id, &mut out).await?;
        }
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::cart::show(&state, &mut out).await?,
            CartAction::Order { product_id } => {
                commands::cart::order(&state, product_id, &mut out).await?;
            }
            CartAction::Remove { product_id } => {
                commands::cart::remove(&state, product_id, &mut out).await?;
            }
        },
        Commands::Orders => commands::orders::list(&state, &mut out).await?,
    }
    Ok(())
}
