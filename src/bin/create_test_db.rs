use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::datetime;

use coffer::{NewTransaction, TransactionType, create_account, create_transaction, initialize_db};

/// A utility for creating a test database for the coffer server.
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
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test accounts...");
    let card = create_account("Карта", &conn)?;
    let cash = create_account("Наличные", &conn)?;
    create_account("Копилка", &conn)?;

    println!("Creating test transactions...");
    let transactions = [
        (TransactionType::Income, "Зарплата", 85_000.0, card.id, datetime!(2024-03-01 09:00)),
        (TransactionType::Expense, "Продукты", 3_420.5, card.id, datetime!(2024-03-02 18:45)),
        (TransactionType::Expense, "Кофе", 250.0, cash.id, datetime!(2024-03-03 08:15)),
        (TransactionType::Income, "Возврат долга", 1_500.0, cash.id, datetime!(2024-03-04 20:30)),
        (TransactionType::Expense, "Такси", 640.0, card.id, datetime!(2024-03-05 23:05)),
    ];

    for (type_, name, sum, account_id, created_at) in transactions {
        let new_transaction = NewTransaction {
            type_,
            name: name.to_owned(),
            sum,
            account_id,
        };
        create_transaction(&new_transaction, created_at, &conn)?;
    }

    println!("Success!");

    Ok(())
}
