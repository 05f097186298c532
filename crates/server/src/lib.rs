pub mod routes;
pub mod startup;
pub mod errors;
pub mod charset;

pub use startup::{run, RunOptions};
