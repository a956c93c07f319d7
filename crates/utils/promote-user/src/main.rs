//! # Promote User Utility
//!
//! Grants the `ADMIN` role to an existing account, for operators with direct
//! access to the database.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package promote-user --bin promote_user -- ana@example.com
//! cargo run --package promote-user --bin promote_user -- ana@example.com --yes
//! ```
//!
//! The program will:
//! 1. Load `.env` and connect to `DATABASE_URL`
//! 2. Look up the account by (normalized) email
//! 3. Ask for confirmation unless `--yes` is given
//! 4. Promote the account and print its new role

use std::io::{self, Write};

use anyhow::bail;
use clap::Parser;
use lib_core::{create_pool, init_schema, Config, SessionService};

#[derive(Parser, Debug)]
#[command(name = "promote_user")]
#[command(version, about = "Grant the ADMIN role to an existing account", long_about = None)]
struct Args {
    /// Email of the account to promote
    email: String,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long = "yes")]
    assume_yes: bool,
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} (yes/no): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "yes" || answer == "y")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("============================================");
    println!("  Promote User Utility");
    println!("============================================");
    println!();

    let config = Config::from_env()?;
    config.validate()?;

    println!("Connecting to database...");
    let pool = create_pool(&config.database_url).await?;
    init_schema(&pool).await?;
    let sessions = SessionService::new(pool, &config)?;

    let Some(account) = sessions.account_by_email(&args.email).await? else {
        bail!("No account found for {}", args.email.trim());
    };

    println!("Found account #{} ({}) with role {}.", account.id, account.email, account.role);
    if account.is_admin() {
        println!("Account is already an admin. Nothing to do.");
        return Ok(());
    }

    if !args.assume_yes && !confirm("Grant ADMIN to this account?")? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let promoted = sessions.promote(account.id).await?;
    println!("Account {} is now {}.", promoted.email, promoted.role);

    Ok(())
}
