//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use eyre::WrapErr;

fn main() -> eyre::Result<()> {
    stammtisch_cli::init_logging();
    stammtisch_cli::run().wrap_err("stammtisch failed")
}
