//! Multiple-choice quiz model: question generation, the per-question answer
//! cycle and scoring.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use super::{Language, VocabularyEntry};
use crate::utils::sample;

/// Questions per quiz. Also the minimum pool size for a quiz to start.
pub const QUIZ_LENGTH: usize = 10;

/// Wrong options offered next to the correct one.
pub const MAX_DISTRACTORS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPrompt {
    pub english: String,
    pub hindi: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: QuizPrompt,
    pub options: Vec<String>,
    pub correct: String,
}

impl QuizQuestion {
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("only {available} of the required {required} entries have a {language} answer")]
pub struct InsufficientData {
    pub language: Language,
    pub available: usize,
    pub required: usize,
}

/// Entries with a usable answer in `language`, paired with that answer.
pub fn answerable(entries: &[VocabularyEntry], language: Language) -> Vec<(&VocabularyEntry, &str)> {
    entries
        .iter()
        .filter_map(|entry| entry.answer_for(language).map(|answer| (entry, answer)))
        .collect()
}

/// Build a quiz of [`QUIZ_LENGTH`] questions from one category's entries.
///
/// Each question gets up to [`MAX_DISTRACTORS`] distinct wrong options drawn
/// from every other answer in the pool, so option texts never repeat.
pub fn generate_questions<R: Rng + ?Sized>(
    entries: &[VocabularyEntry],
    language: Language,
    rng: &mut R,
) -> Result<Vec<QuizQuestion>, InsufficientData> {
    let pool = answerable(entries, language);
    if pool.len() < QUIZ_LENGTH {
        return Err(InsufficientData {
            language,
            available: pool.len(),
            required: QUIZ_LENGTH,
        });
    }

    // Deduplicated in first-seen order
    let mut answers: Vec<&str> = Vec::new();
    for (_, answer) in &pool {
        if !answers.contains(answer) {
            answers.push(*answer);
        }
    }

    let mut questions = Vec::with_capacity(QUIZ_LENGTH);
    for (entry, correct) in sample(&pool, QUIZ_LENGTH, rng) {
        let wrong: Vec<&str> = answers.iter().copied().filter(|a| *a != correct).collect();

        let mut options: Vec<String> = sample(&wrong, MAX_DISTRACTORS, rng)
            .into_iter()
            .map(str::to_string)
            .collect();
        options.push(correct.to_string());
        options.shuffle(rng);

        questions.push(QuizQuestion {
            prompt: QuizPrompt {
                english: entry.english.clone(),
                hindi: entry.hindi.clone(),
            },
            options,
            correct: correct.to_string(),
        });
    }

    Ok(questions)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect { correct_index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The current question has not been answered yet.
    Locked,
    /// Moved on to the question at this index.
    Question(usize),
    Finished,
}

/// One run through a generated quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    language: Language,
    questions: Vec<QuizQuestion>,
    current_index: usize,
    score: u32,
    selected: Option<usize>,
}

impl QuizSession {
    pub fn start<R: Rng + ?Sized>(
        entries: &[VocabularyEntry],
        language: Language,
        rng: &mut R,
    ) -> Result<Self, InsufficientData> {
        let questions = generate_questions(entries, language, rng)?;
        Ok(Self {
            language,
            questions,
            current_index: 0,
            score: 0,
            selected: None,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Option chosen for the current question, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    /// Lock in an answer for the current question.
    ///
    /// Returns `None` if the question was already answered or `option` does
    /// not exist; in both cases nothing changes.
    pub fn answer(&mut self, option: usize) -> Option<AnswerOutcome> {
        if self.selected.is_some() {
            return None;
        }
        let question = self.questions.get(self.current_index)?;
        let chosen = question.options.get(option)?;

        let outcome = if *chosen == question.correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect {
                correct_index: question.correct_index()?,
            }
        };

        if outcome == AnswerOutcome::Correct {
            self.score += 1;
        }
        self.selected = Some(option);
        Some(outcome)
    }

    pub fn advance(&mut self) -> Advance {
        if self.selected.is_none() {
            return Advance::Locked;
        }
        if self.current_index + 1 >= self.questions.len() {
            return Advance::Finished;
        }
        self.current_index += 1;
        self.selected = None;
        Advance::Question(self.current_index)
    }

    pub fn results(&self) -> QuizResults {
        QuizResults {
            language: self.language,
            score: self.score,
            total: QUIZ_LENGTH as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResults {
    pub language: Language,
    pub score: u32,
    pub total: u32,
}

impl QuizResults {
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        self.score * 100 / self.total
    }

    pub fn tier(&self) -> ResultTier {
        ResultTier::from_percentage(self.percentage())
    }
}

/// Feedback band for a finished quiz. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTier {
    Mastery,
    Excellent,
    GoodEffort,
    KeepTrying,
}

impl ResultTier {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            100..=u32::MAX => ResultTier::Mastery,
            80..=99 => ResultTier::Excellent,
            50..=79 => ResultTier::GoodEffort,
            _ => ResultTier::KeepTrying,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ResultTier::Mastery => "Perfect! You're a master!",
            ResultTier::Excellent => "Excellent job! You really know your stuff.",
            ResultTier::GoodEffort => "Good effort! Keep practicing.",
            ResultTier::KeepTrying => "Don't give up! Keep learning and try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn garhwali_entries(count: usize) -> Vec<VocabularyEntry> {
        (0..count)
            .map(|i| {
                VocabularyEntry::new(format!("Word {}", i))
                    .with(Language::Hindi, format!("शब्द {}", i))
                    .with(Language::Garhwali, format!("गढ़ {}", i))
            })
            .collect()
    }

    fn answer_all(session: &mut QuizSession, correctly: bool) {
        loop {
            let question = session.current().unwrap().clone();
            let correct = question.correct_index().unwrap();
            let pick = if correctly { correct } else { (correct + 1) % question.options.len() };
            session.answer(pick).unwrap();
            if session.advance() == Advance::Finished {
                break;
            }
        }
    }

    #[test]
    fn test_generate_ten_questions_with_five_distinct_options() {
        let entries = garhwali_entries(12);
        let mut rng = StdRng::seed_from_u64(11);
        let questions = generate_questions(&entries, Language::Garhwali, &mut rng).unwrap();

        assert_eq!(questions.len(), QUIZ_LENGTH);
        let prompts: HashSet<&str> = questions.iter().map(|q| q.prompt.english.as_str()).collect();
        assert_eq!(prompts.len(), QUIZ_LENGTH);

        for question in &questions {
            assert_eq!(question.options.len(), 5);
            let unique: HashSet<&String> = question.options.iter().collect();
            assert_eq!(unique.len(), 5);
            assert!(question.options.contains(&question.correct));
            assert!(question.prompt.hindi.is_some());
        }
    }

    #[test]
    fn test_small_answer_pool_gives_fewer_options() {
        // Ten usable entries but only three distinct answers
        let entries: Vec<VocabularyEntry> = (0..10)
            .map(|i| VocabularyEntry::new(format!("Word {}", i)).with(Language::Kumaoni, format!("k{}", i % 3)))
            .collect();
        let mut rng = StdRng::seed_from_u64(5);
        let questions = generate_questions(&entries, Language::Kumaoni, &mut rng).unwrap();

        for question in &questions {
            assert_eq!(question.options.len(), 3);
            assert!(question.options.contains(&question.correct));
        }
    }

    #[test]
    fn test_insufficient_data_ignores_placeholders() {
        let mut entries = garhwali_entries(9);
        entries.push(VocabularyEntry::new("Blank").with(Language::Garhwali, "N/A"));
        entries.push(VocabularyEntry::new("Missing"));

        let mut rng = StdRng::seed_from_u64(2);
        let err = generate_questions(&entries, Language::Garhwali, &mut rng).unwrap_err();
        assert_eq!(err, InsufficientData { language: Language::Garhwali, available: 9, required: 10 });
    }

    #[test]
    fn test_all_correct_is_mastery() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut session = QuizSession::start(&garhwali_entries(15), Language::Garhwali, &mut rng).unwrap();
        answer_all(&mut session, true);

        let results = session.results();
        assert_eq!(results.score, 10);
        assert_eq!(results.percentage(), 100);
        assert_eq!(results.tier(), ResultTier::Mastery);
    }

    #[test]
    fn test_all_wrong_is_lowest_tier() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut session = QuizSession::start(&garhwali_entries(15), Language::Garhwali, &mut rng).unwrap();
        answer_all(&mut session, false);

        let results = session.results();
        assert_eq!(results.score, 0);
        assert_eq!(results.percentage(), 0);
        assert_eq!(results.tier(), ResultTier::KeepTrying);
    }

    #[test]
    fn test_answer_is_one_shot() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = QuizSession::start(&garhwali_entries(10), Language::Garhwali, &mut rng).unwrap();
        assert_eq!(session.advance(), Advance::Locked);

        let correct = session.current().unwrap().correct_index().unwrap();
        assert_eq!(session.answer(correct), Some(AnswerOutcome::Correct));
        assert_eq!(session.answer(correct), None);
        assert_eq!(session.score(), 1);
        assert_eq!(session.advance(), Advance::Question(1));
        assert!(!session.is_answered());
    }

    #[test]
    fn test_wrong_answer_reports_correct_index() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut session = QuizSession::start(&garhwali_entries(10), Language::Garhwali, &mut rng).unwrap();
        let correct = session.current().unwrap().correct_index().unwrap();
        let wrong = (correct + 1) % 5;

        assert_eq!(session.answer(wrong), Some(AnswerOutcome::Incorrect { correct_index: correct }));
        assert_eq!(session.selected(), Some(wrong));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_out_of_range_answer_is_ignored() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut session = QuizSession::start(&garhwali_entries(10), Language::Garhwali, &mut rng).unwrap();
        assert_eq!(session.answer(17), None);
        assert!(!session.is_answered());
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ResultTier::from_percentage(100), ResultTier::Mastery);
        assert_eq!(ResultTier::from_percentage(90), ResultTier::Excellent);
        assert_eq!(ResultTier::from_percentage(80), ResultTier::Excellent);
        assert_eq!(ResultTier::from_percentage(70), ResultTier::GoodEffort);
        assert_eq!(ResultTier::from_percentage(50), ResultTier::GoodEffort);
        assert_eq!(ResultTier::from_percentage(40), ResultTier::KeepTrying);
    }
}
