//! gitlint binary entry point
//!
//! The exit status is the number of issues detected, so the tool can gate
//! automation directly: 0 means a clean history. Fatal configuration or
//! source errors exit with status 2 after printing the error to stderr.

fn main() {
    match gitlint::cli::run() {
        Ok(count) => std::process::exit(count),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}
