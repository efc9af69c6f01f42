use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::macros::date;

use money_mentor::{
    BudgetStore, CategoryName, InvestmentStore, Money, NewInvestment, NewTransaction, PasswordHash,
    SQLiteBudgetStore, SQLiteInvestmentStore, SQLiteTransactionStore, TransactionStore,
    ValidatedPassword, create_user, initialize_db,
};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demo-password-for-manual-testing";

/// A utility for creating a test database for the REST API server of money_mentor.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {DEMO_EMAIL} with the password {DEMO_PASSWORD:?}...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(DEMO_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(EmailAddress::from_str(DEMO_EMAIL)?, password_hash, &conn)?;

    let conn = Arc::new(Mutex::new(conn));
    let transactions = SQLiteTransactionStore::new(conn.clone());
    let budgets = SQLiteBudgetStore::new(conn.clone());
    let investments = SQLiteInvestmentStore::new(conn);

    println!("Creating transactions...");

    for (description, cents, category, date) in [
        ("Weekly groceries", 12_050, "Food", date!(2025 - 10 - 01)),
        ("Train pass", 6_500, "Transport", date!(2025 - 10 - 02)),
        ("Coffee", 575, "Food", date!(2025 - 10 - 03)),
        ("Movie night", 3_200, "Entertainment", date!(2025 - 10 - 04)),
        ("Power bill", 14_000, "Utilities", date!(2025 - 10 - 06)),
    ] {
        transactions.create(
            user.id,
            NewTransaction {
                description: description.to_owned(),
                amount: Money::from_cents(cents),
                category: CategoryName::new(category)?,
                date,
            },
        )?;
    }

    println!("Creating budget goals...");

    for (category, cents) in [
        ("Food", 40_000),
        ("Transport", 10_000),
        ("Entertainment", 5_000),
        ("Utilities", 15_000),
    ] {
        budgets.set_goal(user.id, CategoryName::new(category)?, Money::from_cents(cents))?;
    }

    println!("Creating investments...");

    investments.create(
        user.id,
        NewInvestment {
            name: "Index fund".to_owned(),
            value: Money::from_cents(500_000),
        },
    )?;

    println!("Success!");

    Ok(())
}
