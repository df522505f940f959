//! CLI command handlers
//!
//! Environment resolution (bucket, repo URL, tokens) happens here via clap's
//! `env` attributes; the library below this layer only sees explicit values.

mod promote;

pub use promote::{cmd_promote, PromoteArgs};
