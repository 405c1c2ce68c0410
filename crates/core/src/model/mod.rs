mod catalog;
mod ids;
mod question;
mod session;

pub use ids::{ParseIdError, QuestionId};

pub use catalog::{Catalog, CatalogError};
pub use question::{Difficulty, ParseDifficultyError, Question, QuestionDraft, QuestionError};
pub use session::{SessionSnapshot, SessionStats, SessionStatsError};
