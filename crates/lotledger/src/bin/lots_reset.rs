//! `lots-reset`: reverse a previous cost-of-sales calculation.

use std::process::ExitCode;

fn main() -> ExitCode {
    lotledger::cmd::reset::main()
}
