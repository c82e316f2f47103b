//! Code Burger CLI - admin client for the product API.
//!
//! # Usage
//!
//! ```bash
//! # Sign in as an admin (stores the session record locally)
//! cb-cli session login --identity admin@codeburger.com --admin --token <token>
//!
//! # Check what a page would do for the current session
//! cb-cli gate /novo-produto
//!
//! # Create a product
//! cb-cli products create --name "X-Bacon" --price 32.50 --category 1 --file bacon.png
//! ```
//!
//! # Commands
//!
//! - `session` - Sign in, sign out, inspect the stored session
//! - `gate` - Evaluate the access gate for a route
//! - `categories` - List selectable categories
//! - `products` - List or create products
//!
//! # Environment Variables
//!
//! - `CODEBURGER_API_URL` - Product API base URL
//! - `CODEBURGER_SESSION_FILE` - Where the session record is kept
//! - `CODEBURGER_REQUEST_TIMEOUT_SECS` - HTTP timeout
//! - `LOG_FORMAT=json` - Structured log output
//! - `RUST_LOG` - Log filter

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use codeburger_admin::{AdminConfig, AppError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cb-cli")]
#[command(author, version, about = "Code Burger admin client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Evaluate the access gate for a route path
    Gate {
        /// Route path, e.g. `/novo-produto`
        path: String,
    },
    /// List product categories
    Categories,
    /// List or create products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Store a session record (sign in)
    Login {
        /// Identity shown for the signed-in user
        #[arg(short, long)]
        identity: String,

        /// Mark the user as an administrator
        #[arg(long)]
        admin: bool,

        /// API token returned at login
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Remove the stored session (sign out)
    Logout,
    /// Print the stored session
    Show,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List existing products
    List,
    /// Create a product through the new-product form flow
    Create {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Product price
        #[arg(short, long)]
        price: String,

        /// Category id (see `cb-cli categories`)
        #[arg(short, long)]
        category: i32,

        /// Image file (png or jpeg); only the first one is uploaded
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(e.exit_code());
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "codeburger_admin=info,cb_cli=info".into());

    // Logs go to stderr so command output on stdout stays pipeable
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = AdminConfig::from_env()?;

    match cli.command {
        Commands::Session { action } => match action {
            SessionAction::Login {
                identity,
                admin,
                token,
            } => commands::session::login(&config, identity, admin, token)?,
            SessionAction::Logout => commands::session::logout(&config)?,
            SessionAction::Show => commands::session::show(&config),
        },
        Commands::Gate { path } => commands::gate::check(&config, &path),
        Commands::Categories => commands::products::categories(&config).await?,
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&config).await?,
            ProductsAction::Create {
                name,
                price,
                category,
                files,
            } => commands::products::create(&config, name, price, category, &files).await?,
        },
    }
    Ok(())
}
