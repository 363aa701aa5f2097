//! Data models for the vocabulary trainer.
//!
//! - `VocabularyEntry`, `Language`, `Annotation`: one dataset row and its fields
//! - `Category`: a manifest entry with its display title
//! - `Deck`: the entries under study in a learn or recall session
//! - Quiz types: `QuizQuestion`, `QuizSession`, `QuizResults`, `ResultTier`

pub mod category;
pub mod deck;
pub mod quiz;
pub mod vocabulary;

pub use category::{title_from_id, Category};
pub use deck::Deck;
pub use quiz::{
    generate_questions, Advance, AnswerOutcome, InsufficientData, QuizPrompt, QuizQuestion,
    QuizResults, QuizSession, ResultTier, MAX_DISTRACTORS, QUIZ_LENGTH,
};
pub use vocabulary::{Annotation, Language, LanguageParseError, VocabularyEntry, NOT_AVAILABLE};
