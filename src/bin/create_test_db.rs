use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, macros::date};

use expense_tracker::{NewExpense, add_expense, initialize_db};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const SAMPLE_EXPENSES: [(&str, f64, &str, Date); 8] = [
    ("Rent", 1200.0, "Housing", date!(2024 - 02 - 01)),
    ("Groceries", 84.35, "Food", date!(2024 - 02 - 03)),
    ("Bus pass", 45.0, "Transport", date!(2024 - 02 - 10)),
    ("Coffee", 4.5, "Food", date!(2024 - 02 - 14)),
    ("Rent", 1200.0, "Housing", date!(2024 - 03 - 01)),
    ("Groceries", 91.2, "Food", date!(2024 - 03 - 02)),
    ("Movie tickets", 32.0, "Entertainment", date!(2024 - 03 - 08)),
    ("Coffee", 4.5, "Food", date!(2024 - 03 - 09)),
];

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

    println!("Creating {} sample expenses...", SAMPLE_EXPENSES.len());

    for (title, amount, category, date) in SAMPLE_EXPENSES {
        add_expense(
            &NewExpense {
                title: title.to_owned(),
                amount,
                category: category.to_owned(),
                date,
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
