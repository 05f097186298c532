use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Name of the bank written by the seeder.
pub const DEFAULT_BANK_NAME: &str = "默认题库";

/// One prompt/answer pair. Serialized as `{"hint":..,"correctSentence":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuestionRecord {
    hint: String,
    correct_sentence: String,
}

impl QuestionRecord {
    pub fn new(hint: impl Into<String>, correct_sentence: impl Into<String>) -> Self {
        Self { hint: hint.into(), correct_sentence: correct_sentence.into() }
    }

    pub fn hint(&self) -> &str { &self.hint }

    pub fn correct_sentence(&self) -> &str { &self.correct_sentence }
}

/// Ordered questions of a single bank; encoded as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank(Vec<QuestionRecord>);

impl QuestionBank {
    pub fn new(records: Vec<QuestionRecord>) -> Self { Self(records) }

    pub fn records(&self) -> &[QuestionRecord] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl FromIterator<QuestionRecord> for QuestionBank {
    fn from_iter<I: IntoIterator<Item = QuestionRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Bank name -> bank. Keys are kept sorted so encoding is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankCollection(BTreeMap<String, QuestionBank>);

impl BankCollection {
    pub fn new() -> Self { Self::default() }

    /// The hard-coded collection written by the seeder.
    pub fn default_banks() -> Self {
        let mut banks = Self::new();
        banks.insert(
            DEFAULT_BANK_NAME,
            QuestionBank::new(vec![
                QuestionRecord::new("你好吗？", "How are you?"),
                QuestionRecord::new("我很好，谢谢。", "I am fine, thank you."),
            ]),
        );
        banks
    }

    /// Insert or replace a bank, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, bank: QuestionBank) -> Option<QuestionBank> {
        self.0.insert(name.into(), bank)
    }

    pub fn get(&self, name: &str) -> Option<&QuestionBank> { self.0.get(name) }

    pub fn contains(&self, name: &str) -> bool { self.0.contains_key(name) }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Compact JSON text, as stored under `questionBanks`.
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(self).map_err(|e| ModelError::Encode(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        serde_json::from_str(text).map_err(|e| ModelError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_banks_contents() {
        let banks = BankCollection::default_banks();
        assert_eq!(banks.names().collect::<Vec<_>>(), vec![DEFAULT_BANK_NAME]);

        let bank = banks.get(DEFAULT_BANK_NAME).expect("default bank");
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.records()[0].hint(), "你好吗？");
        assert_eq!(bank.records()[0].correct_sentence(), "How are you?");
        assert_eq!(bank.records()[1].hint(), "我很好，谢谢。");
        assert_eq!(bank.records()[1].correct_sentence(), "I am fine, thank you.");
    }

    #[test]
    fn encodes_hint_before_correct_sentence() -> anyhow::Result<()> {
        let json = BankCollection::default_banks().to_json()?;
        assert_eq!(
            json,
            r#"{"默认题库":[{"hint":"你好吗？","correctSentence":"How are you?"},{"hint":"我很好，谢谢。","correctSentence":"I am fine, thank you."}]}"#
        );
        Ok(())
    }

    #[test]
    fn decode_restores_collection() -> anyhow::Result<()> {
        let banks = BankCollection::default_banks();
        let decoded = BankCollection::from_json(&banks.to_json()?)?;
        assert_eq!(decoded, banks);
        Ok(())
    }

    #[test]
    fn decode_keeps_record_order() -> anyhow::Result<()> {
        let decoded = BankCollection::from_json(
            r#"{"b":[{"hint":"2","correctSentence":"two"},{"hint":"1","correctSentence":"one"}],"a":[]}"#,
        )?;
        let hints: Vec<_> = decoded.get("b").unwrap().records().iter().map(|r| r.hint()).collect();
        assert_eq!(hints, vec!["2", "1"]);
        assert!(decoded.get("a").unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn decode_rejects_unexpected_shapes() {
        // 多余字段
        let extra = r#"{"x":[{"hint":"h","correctSentence":"c","answer":"a"}]}"#;
        assert!(matches!(BankCollection::from_json(extra), Err(ModelError::Decode(_))));
        // 缺少字段
        let missing = r#"{"x":[{"hint":"h"}]}"#;
        assert!(matches!(BankCollection::from_json(missing), Err(ModelError::Decode(_))));
        // 非对象
        assert!(BankCollection::from_json(r#"[]"#).is_err());
        assert!(BankCollection::from_json("not json").is_err());
    }
}
