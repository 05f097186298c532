//! Shared helpers for the exercise bank workspace: logging setup,
//! startup environment checks and small wire types.

pub mod types;
pub mod utils;
pub mod env;
