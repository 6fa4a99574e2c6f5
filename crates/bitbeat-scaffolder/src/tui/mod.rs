//! Interactive create flow built on cliclack prompts
//!
//! Only compiled with the `tui` feature; the engine and writer are usable
//! without it.

mod prompts;

pub use prompts::{run, CreateArgs};
