//! saferoute CLI library.
//!
//! Output formatting shared by the `saferoute` subcommands.

pub mod output;
