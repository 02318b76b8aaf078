//! `lots-calc`: compute cost of goods sold for one tracked good.

use std::process::ExitCode;

fn main() -> ExitCode {
    lotledger::cmd::calc::main()
}
