//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.  Simple subcommands are
//! dispatched directly from `main.rs`.

pub mod mkdsk;
pub mod put;
pub mod get;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Item type is unknown")]
    UnknownItemType,
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("One of the parameters was out of range")]
    OutOfRange
}
