pub mod config;
pub mod error;
pub mod questions;
pub mod results;
pub mod types;

pub use config::{AppConfig, ScoringConfig};
pub use error::{AudioError, ConfigError, ExportError, ResultsError, SessionError};
pub use questions::Question;
pub use results::ResultSet;
pub use types::{
    AcousticFeatures, AudioBuffer, CompositeScore, LanguageAnalysis, QuestionResult,
    RiskCategory,
};
