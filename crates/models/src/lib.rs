//! Typed data model for question banks and the state persisted in the
//! key-value store.

pub mod errors;
pub mod bank;
pub mod state;

pub use bank::{BankCollection, QuestionBank, QuestionRecord};
pub use state::PersistedState;
