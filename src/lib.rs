//! Fleet Monitor
//!
//! Terminal monitor for a warehouse robot fleet. The heavy lifting lives in
//! the workspace crates; this crate wires them into the `fleetmon` binary and
//! adds the headless NDJSON runner.

pub mod headless;

pub use headless::runner::run_headless;
