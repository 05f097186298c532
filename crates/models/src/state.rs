use serde::Serialize;

use crate::{bank::BankCollection, errors::ModelError};

/// Store key holding the encoded [`BankCollection`].
pub const QUESTION_BANKS_KEY: &str = "questionBanks";
/// Store key holding the active bank name.
pub const CURRENT_BANK_KEY: &str = "currentBank";

/// Decoded view of the two store entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub current_bank: String,
    pub question_banks: BankCollection,
}

impl PersistedState {
    /// Build from the raw store values; `current_bank` must name a bank in the collection.
    pub fn from_raw(question_banks: &str, current_bank: &str) -> Result<Self, ModelError> {
        let question_banks = BankCollection::from_json(question_banks)?;
        let state = Self { current_bank: current_bank.to_string(), question_banks };
        state.validate()?;
        Ok(state)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.question_banks.contains(&self.current_bank) {
            return Err(ModelError::Validation(format!(
                "current bank '{}' is not present in {}",
                self.current_bank, QUESTION_BANKS_KEY
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::DEFAULT_BANK_NAME;

    #[test]
    fn from_raw_accepts_seeded_values() -> anyhow::Result<()> {
        let raw = BankCollection::default_banks().to_json()?;
        let state = PersistedState::from_raw(&raw, DEFAULT_BANK_NAME)?;
        assert_eq!(state.current_bank, DEFAULT_BANK_NAME);
        assert_eq!(state.question_banks, BankCollection::default_banks());
        Ok(())
    }

    #[test]
    fn from_raw_rejects_dangling_current_bank() -> anyhow::Result<()> {
        let raw = BankCollection::default_banks().to_json()?;
        let err = PersistedState::from_raw(&raw, "不存在").unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
        Ok(())
    }

    #[test]
    fn serializes_with_store_key_names() -> anyhow::Result<()> {
        let state = PersistedState {
            current_bank: DEFAULT_BANK_NAME.into(),
            question_banks: BankCollection::default_banks(),
        };
        let value = serde_json::to_value(&state)?;
        assert_eq!(value["currentBank"], DEFAULT_BANK_NAME);
        assert_eq!(value["questionBanks"][DEFAULT_BANK_NAME][1]["correctSentence"], "I am fine, thank you.");
        Ok(())
    }
}
