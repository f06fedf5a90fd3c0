//! Zhunan CRM CLI - account and sample-data tools.
//!
//! # Usage
//!
//! ```bash
//! # Add an account to the credential file
//! crm-cli users add -e manager@example.com -n "店長" -p Manager123 -r admin
//!
//! # List accounts
//! crm-cli users list --file users.json
//!
//! # Change a password
//! crm-cli users passwd -e bacon@example.com --current Bacon123 --new Bacon456
//!
//! # Write 33 sample customers to a file
//! crm-cli seed customers --count 33 --output customers.json
//! ```
//!
//! # Commands
//!
//! - `users` - Manage the JSON credential file
//! - `seed customers` - Generate sample customer records

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "crm-cli")]
#[command(author, version, about = "Zhunan CRM CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage accounts in the credential file
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Generate sample data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// Add an account
    Add {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Role (`admin`, `user`)
        #[arg(short, long, default_value = "user")]
        role: String,

        /// Credential file
        #[arg(long, env = "CRM_CREDENTIALS_FILE", default_value = "users.json")]
        file: PathBuf,
    },
    /// List accounts
    List {
        /// Credential file
        #[arg(long, env = "CRM_CREDENTIALS_FILE", default_value = "users.json")]
        file: PathBuf,
    },
    /// Change an account's password
    Passwd {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Current password
        #[arg(long)]
        current: String,

        /// New password
        #[arg(long)]
        new: String,

        /// Credential file
        #[arg(long, env = "CRM_CREDENTIALS_FILE", default_value = "users.json")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Generate sample customers as JSON
    Customers {
        /// Number of customers
        #[arg(short, long, default_value_t = 33)]
        count: usize,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    // Load .env so CRM_CREDENTIALS_FILE can come from it
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Users { action } => match action {
            UsersAction::Add {
                email,
                name,
                password,
                role,
                file,
            } => commands::users::add(&file, &email, &name, &password, &role)?,
            UsersAction::List { file } => {
                commands::users::list(&file, &mut std::io::stdout().lock())?;
            }
            UsersAction::Passwd {
                email,
                current,
                new,
                file,
            } => commands::users::passwd(&file, &email, &current, &new)?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Customers {
                count,
                output,
                seed,
            } => commands::seed::customers(
                count,
                seed,
                output.as_deref(),
                &mut std::io::stdout().lock(),
            )?,
        },
    }
    Ok(())
}
