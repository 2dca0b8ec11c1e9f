//! CLI sub-commands

pub mod check;
pub mod list;
