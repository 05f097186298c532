//! Question bank seeder
//!
//! Writes the default bank collection and the active bank name into a
//! key-value store, and reads them back as typed state.

use models::{
    bank::{BankCollection, DEFAULT_BANK_NAME},
    state::{PersistedState, CURRENT_BANK_KEY, QUESTION_BANKS_KEY},
};
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::KeyValueStore;

/// Completion notice logged after both writes succeed.
pub const SEED_NOTICE: &str = "测试题库已设置到存储";

/// Overwrite `questionBanks` with the default collection, then point
/// `currentBank` at it. The first failing write aborts; nothing is retried.
pub async fn seed(store: &dyn KeyValueStore) -> Result<(), ServiceError> {
    let banks = BankCollection::default_banks();
    store.set(QUESTION_BANKS_KEY, &banks.to_json()?).await?;
    store.set(CURRENT_BANK_KEY, DEFAULT_BANK_NAME).await?;
    info!(current_bank = DEFAULT_BANK_NAME, banks = banks.len(), "{}", SEED_NOTICE);
    Ok(())
}

/// Read the seeded state. `None` when either key has never been written.
pub async fn load_state(store: &dyn KeyValueStore) -> Result<Option<PersistedState>, ServiceError> {
    let Some(raw_banks) = store.get(QUESTION_BANKS_KEY).await? else { return Ok(None) };
    let Some(current) = store.get(CURRENT_BANK_KEY).await? else { return Ok(None) };
    let state = PersistedState::from_raw(&raw_banks, &current).map_err(|e| match e {
        models::errors::ModelError::Validation(msg) => ServiceError::Validation(msg),
        other => ServiceError::Model(other),
    })?;
    Ok(Some(state))
}
