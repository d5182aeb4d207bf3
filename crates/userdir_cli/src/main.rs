//! CLI inspection entry point.
//!
//! # Responsibility
//! - Verify `userdir_core` linkage without a host application.
//! - Optionally print the user count and first page of a database file.
//!
//! Usage: `userdir_cli [DB_PATH]`

use std::error::Error;
use std::ffi::OsStr;
use std::process::ExitCode;
use userdir_core::db::open_db;
use userdir_core::{QueryParam, SqliteUserRepository, UserRepository};

const FIRST_PAGE_SIZE: i64 = 10;

fn main() -> ExitCode {
    println!("userdir_core ping={}", userdir_core::ping());
    println!("userdir_core version={}", userdir_core::core_version());

    let Some(path) = std::env::args_os().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match print_first_page(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_first_page(path: &OsStr) -> Result<(), Box<dyn Error>> {
    let conn = open_db(path)?;
    let repo = SqliteUserRepository::try_new(&conn)?;

    println!("users total={}", repo.count()?);
    let page = QueryParam::new(0, FIRST_PAGE_SIZE)?;
    for user in repo.find(&page)? {
        println!(
            "{}\t{}\t{}",
            user.id.unwrap_or_default(),
            user.name,
            user.email
        );
    }
    Ok(())
}
