use crate::error::ResultsError;
use crate::types::QuestionResult;
use std::collections::{btree_map, BTreeMap};

/// Answers keyed by question id. Recording a question again replaces its answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    results: BTreeMap<u32, QuestionResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result, returning the one it replaced.
    pub fn upsert(&mut self, result: QuestionResult) -> Option<QuestionResult> {
        let id = result.question_id;
        let previous = self.results.insert(id, result);
        if previous.is_some() {
            tracing::debug!(question_id = id, "replaced previous result");
        }
        previous
    }

    pub fn get(&self, question_id: u32) -> Option<&QuestionResult> {
        self.results.get(&question_id)
    }

    pub fn remove(&mut self, question_id: u32) -> Option<QuestionResult> {
        self.results.remove(&question_id)
    }

    pub fn contains(&self, question_id: u32) -> bool {
        self.results.contains_key(&question_id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results in ascending question id order.
    pub fn values(&self) -> btree_map::Values<'_, u32, QuestionResult> {
        self.results.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionResult> {
        self.values()
    }

    pub fn to_vec(&self) -> Vec<QuestionResult> {
        self.results.values().cloned().collect()
    }

    /// Parse a JSON array of result records. Later records win over earlier ones
    /// for the same question.
    pub fn from_json(json: &str) -> Result<Self, ResultsError> {
        let records: Vec<QuestionResult> = serde_json::from_str(json)?;
        Ok(records.into_iter().collect())
    }

    pub fn to_json(&self) -> Result<String, ResultsError> {
        let records: Vec<&QuestionResult> = self.iter().collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }
}

impl FromIterator<QuestionResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = QuestionResult>>(iter: I) -> Self {
        let mut set = Self::new();
        for result in iter {
            set.upsert(result);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a QuestionResult;
    type IntoIter = btree_map::Values<'a, u32, QuestionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.values()
    }
}
