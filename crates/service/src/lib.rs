//! Service layer: key-value store implementations and the question bank seeder.
//! - `storage` provides the store capability and its file/in-memory backends.
//! - `seeder` writes the default banks and reads them back as typed state.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod seeder;
