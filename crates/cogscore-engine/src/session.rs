use crate::aggregate::aggregate;
use cogscore_core::questions::{self, Question};
use cogscore_core::{CompositeScore, QuestionResult, ResultSet, ScoringConfig, SessionError};

/// Walks a participant through the question sequence and keeps their answers.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    questions: &'static [Question],
    index: usize,
    results: ResultSet,
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self::with_questions(questions::catalog())
    }

    pub fn with_questions(questions: &'static [Question]) -> Self {
        Self {
            questions,
            index: 0,
            results: ResultSet::new(),
        }
    }

    /// The question being asked, or `None` for an empty question list.
    pub fn current(&self) -> Option<&'static Question> {
        self.questions.get(self.index)
    }

    /// Zero-based position in the sequence.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn advance(&mut self) -> Result<&'static Question, SessionError> {
        if self.index + 1 >= self.questions.len() {
            return Err(SessionError::AtLastQuestion);
        }
        self.index += 1;
        let question = &self.questions[self.index];
        tracing::debug!(question_id = question.id, "advanced to question");
        Ok(question)
    }

    pub fn go_back(&mut self) -> Result<&'static Question, SessionError> {
        if self.index == 0 {
            return Err(SessionError::AtFirstQuestion);
        }
        self.index -= 1;
        Ok(&self.questions[self.index])
    }

    /// Store an answer. Re-recording a question replaces the earlier answer,
    /// which is returned.
    pub fn record(
        &mut self,
        result: QuestionResult,
    ) -> Result<Option<QuestionResult>, SessionError> {
        if !self.questions.iter().any(|q| q.id == result.question_id) {
            return Err(SessionError::UnknownQuestion(result.question_id));
        }
        tracing::info!(question_id = result.question_id, "recorded answer");
        Ok(self.results.upsert(result))
    }

    pub fn answered_count(&self) -> usize {
        self.results.len()
    }

    pub fn is_complete(&self) -> bool {
        self.questions.iter().all(|q| self.results.contains(q.id))
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn into_results(self) -> ResultSet {
        self.results
    }

    pub fn score(&self, config: &ScoringConfig) -> CompositeScore {
        aggregate(&self.results, config)
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}
