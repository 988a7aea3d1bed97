//! Dataflow primitives shared by long-running loops.

pub mod relay;

pub use relay::{Relay, RelayError, relay};
