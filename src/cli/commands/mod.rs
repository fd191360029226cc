//! Subcommands of the `gridnav` binary

pub mod inspect;
pub mod run;
