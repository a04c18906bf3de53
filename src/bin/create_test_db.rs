use std::{error::Error, path::PathBuf, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    CategoryName, NewExpense, PasswordHash, Username, ValidatedPassword, create_category,
    create_expense, create_user, get_all_categories, initialize_db,
};

/// Create a database full of made-up expenses for trying out the expense tracker.
///
/// Log in as "test" with the password "test".
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Where to create the SQLite database. The file must not exist yet.
    #[arg(long, short)]
    output_path: PathBuf,
}

/// Days of expenses to generate, counting back from today.
const DAYS_OF_EXPENSES: i64 = 120;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if args.output_path.exists() {
        eprintln!("{} already exists.", args.output_path.display());
        exit(1);
    }

    let connection = Connection::open(&args.output_path)?;
    initialize_db(&connection)?;

    // The password skips the strength check so it is easy to type.
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(Username::new("test")?, password_hash, &connection)?;

    create_category(CategoryName::new("Travel")?, &connection)?;
    let categories = get_all_categories(&connection)?;

    let today = OffsetDateTime::now_utc().date();
    let mut expense_count = 0;

    for days_ago in 0..DAYS_OF_EXPENSES {
        // Zero, one or two expenses a day, rotating through the categories.
        for nth in 0..days_ago % 3 {
            let seed = (days_ago + nth) as usize;

            create_expense(
                NewExpense {
                    date: today - Duration::days(days_ago),
                    amount: ((seed * 37) % 9000) as f64 / 100.0 + 1.0,
                    category_id: categories[seed % categories.len()].id,
                },
                user.id,
                &connection,
            )?;
            expense_count += 1;
        }
    }

    println!(
        "Created {} with {expense_count} expenses for user \"test\" (password \"test\").",
        args.output_path.display()
    );

    Ok(())
}
