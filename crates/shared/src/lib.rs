//! Wire types and domain enums shared by the chat client crates.

pub mod domain;
pub mod error;
pub mod protocol;
