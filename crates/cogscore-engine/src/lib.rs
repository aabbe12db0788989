pub mod aggregate;
pub mod breakdown;
pub mod session;

pub use aggregate::{aggregate, classify_risk};
pub use breakdown::{breakdown, score_question, QuestionScore};
pub use session::AssessmentSession;
