use std::{error::Error, io, path::PathBuf, process::exit};

use clap::Parser;
use rusqlite::Connection;

use expense_tracker::{PasswordHash, ValidatedPassword, get_user_by_username, update_password};

/// Set a new password for an existing expense tracker user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The expense tracker's SQLite database file.
    #[arg(long)]
    db_path: PathBuf,

    #[arg(long, short)]
    username: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if !args.db_path.is_file() {
        fail(format!("No database at {}", args.db_path.display()));
    }

    let connection = Connection::open(&args.db_path)?;
    let user = get_user_by_username(&args.username, &connection)
        .unwrap_or_else(|error| fail(format!("Could not load user {:?}: {error}", args.username)));

    println!("Choose a new password for {}.", user.username);

    let Some(password_hash) = ask_for_new_password(user.username.as_ref()) else {
        println!("Password left unchanged.");
        return Ok(());
    };

    update_password(user.id, &password_hash, &connection)?;
    println!("Password updated.");

    Ok(())
}

/// Keep asking until the user enters a strong password twice.
///
/// Returns `None` if stdin is closed before that happens.
fn ask_for_new_password(username: &str) -> Option<PasswordHash> {
    loop {
        let password = prompt("New password: ")?;

        let validated = match ValidatedPassword::new(&password, &[username]) {
            Ok(validated) => validated,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        if prompt("Repeat the new password: ")? != password {
            print_error("The passwords do not match.");
            continue;
        }

        match PasswordHash::new(validated, PasswordHash::DEFAULT_COST) {
            Ok(hash) => return Some(hash),
            Err(error) => print_error(format!("Could not hash the password: {error}")),
        }
    }
}

fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(password) => Some(password),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => fail(format!("Could not read from stdin: {error}")),
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string());
}

fn fail(message: String) -> ! {
    print_error(message);
    exit(1)
}
