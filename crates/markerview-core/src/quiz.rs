//! Gallery trivia quiz
//!
//! Linear walk over a fixed list of multiple-choice questions. Each question
//! accepts one answer; the first answer wins and later selections are
//! ignored. Navigation is free in both directions and shows earlier results
//! again.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Questions shipped with the page
const BUILTIN_QUIZ: &str = include_str!("../data/quiz.toml");

/// Delay between answering and moving to the next question
pub const ADVANCE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Failed to parse quiz: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Quiz has no questions")]
    Empty,
    #[error("Question {0} has no options")]
    NoOptions(usize),
    #[error("Question {question} marks option {correct} as correct but has {options} options")]
    CorrectOutOfRange {
        question: usize,
        correct: usize,
        options: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    /// Zero-based index of the right option
    pub correct: usize,
}

#[derive(Debug, Deserialize)]
struct QuizFile {
    #[serde(default, rename = "question")]
    questions: Vec<Question>,
}

/// Recorded answer for one question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerRecord {
    pub selected: usize,
    pub correct: bool,
}

/// Result of a successful selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Present when another question follows; the caller should call
    /// [`QuizController::complete_advance`] after this delay
    pub advance_after: Option<Duration>,
}

/// How an option button should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    /// Question not answered yet, option selectable
    Available,
    /// The right answer, revealed after answering
    Correct,
    /// The user's wrong pick
    Incorrect,
    /// Neither picked nor right, input disabled
    Disabled,
}

pub struct QuizController {
    questions: Vec<Question>,
    current: usize,
    answers: HashMap<usize, AnswerRecord>,
    correct_count: usize,
    advance_delay: Duration,
}

impl QuizController {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        for (i, q) in questions.iter().enumerate() {
            if q.options.is_empty() {
                return Err(QuizError::NoOptions(i));
            }
            if q.correct >= q.options.len() {
                return Err(QuizError::CorrectOutOfRange {
                    question: i,
                    correct: q.correct,
                    options: q.options.len(),
                });
            }
        }
        Ok(Self {
            questions,
            current: 0,
            answers: HashMap::new(),
            correct_count: 0,
            advance_delay: ADVANCE_DELAY,
        })
    }

    pub fn builtin() -> Result<Self, QuizError> {
        Self::from_toml(BUILTIN_QUIZ)
    }

    pub fn from_toml(content: &str) -> Result<Self, QuizError> {
        let file: QuizFile = toml::from_str(content)?;
        Self::new(file.questions)
    }

    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    /// Answer the current question. Returns `None` if it was already
    /// answered or `option` does not exist.
    pub fn select_answer(&mut self, option: usize) -> Option<AnswerOutcome> {
        if self.answers.contains_key(&self.current) {
            return None;
        }
        let question = &self.questions[self.current];
        if option >= question.options.len() {
            tracing::warn!(question = self.current, option, "Ignoring out-of-range answer");
            return None;
        }

        let correct = option == question.correct;
        self.answers.insert(
            self.current,
            AnswerRecord {
                selected: option,
                correct,
            },
        );
        if correct {
            self.correct_count += 1;
        }
        tracing::debug!(question = self.current, option, correct, "Answer recorded");

        let advance_after = (self.current + 1 < self.questions.len()).then_some(self.advance_delay);
        Some(AnswerOutcome {
            correct,
            advance_after,
        })
    }

    /// Delayed advance after an answer. Does nothing if the user already
    /// navigated away from question `from`.
    pub fn complete_advance(&mut self, from: usize) -> bool {
        if self.current != from {
            return false;
        }
        self.next()
    }

    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn answer(&self, question: usize) -> Option<AnswerRecord> {
        self.answers.get(&question).copied()
    }

    pub fn is_answered(&self, question: usize) -> bool {
        self.answers.contains_key(&question)
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Drawing state for an option of the current question
    pub fn option_state(&self, option: usize) -> OptionState {
        let Some(record) = self.answer(self.current) else {
            return OptionState::Available;
        };
        if option == self.current_question().correct {
            OptionState::Correct
        } else if option == record.selected {
            OptionState::Incorrect
        } else {
            OptionState::Disabled
        }
    }

    /// e.g. "2/3 correctas"
    pub fn score_text(&self) -> String {
        format!("{}/{} correctas", self.correct_count, self.answered_count())
    }

    /// e.g. "1 / 5"
    pub fn progress_text(&self) -> String {
        format!("{} / {}", self.current + 1, self.questions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> Question {
        Question {
            text: "?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
        }
    }

    #[test]
    fn test_builtin_quiz() {
        let quiz = QuizController::builtin().unwrap();
        assert_eq!(quiz.len(), 5);
        assert_eq!(
            quiz.current_question().text,
            "¿Cuál es el diámetro oficial de un balón de fútbol profesional?"
        );
        assert_eq!(quiz.progress_text(), "1 / 5");
    }

    #[test]
    fn test_first_answer_wins() {
        let mut quiz = QuizController::new(vec![question(2), question(0)]).unwrap();

        let outcome = quiz.select_answer(2).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.advance_after, Some(ADVANCE_DELAY));
        assert_eq!(quiz.correct_count(), 1);
        assert!(quiz.is_answered(0));

        assert!(quiz.select_answer(2).is_none());
        assert!(quiz.select_answer(1).is_none());
        assert_eq!(quiz.correct_count(), 1);
        assert_eq!(quiz.answer(0), Some(AnswerRecord { selected: 2, correct: true }));
    }

    #[test]
    fn test_score_text() {
        let mut quiz = QuizController::new(vec![question(0), question(1), question(2), question(3)]).unwrap();
        quiz.select_answer(0);
        quiz.next();
        quiz.select_answer(1);
        quiz.next();
        quiz.select_answer(0);
        assert_eq!(quiz.score_text(), "2/3 correctas");
    }

    #[test]
    fn test_last_question_does_not_advance() {
        let mut quiz = QuizController::new(vec![question(0), question(1)]).unwrap();
        quiz.next();
        let outcome = quiz.select_answer(3).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.advance_after, None);
        assert_eq!(quiz.correct_count(), 0);
        assert_eq!(quiz.score_text(), "0/1 correctas");
    }

    #[test]
    fn test_delayed_advance() {
        let mut quiz = QuizController::new(vec![question(0), question(1), question(2)])
            .unwrap()
            .with_advance_delay(Duration::from_millis(10));
        let outcome = quiz.select_answer(0).unwrap();
        assert_eq!(outcome.advance_after, Some(Duration::from_millis(10)));

        assert!(quiz.complete_advance(0));
        assert_eq!(quiz.current_index(), 1);

        // User moved on before the timer fired
        quiz.select_answer(1);
        quiz.prev();
        assert!(!quiz.complete_advance(1));
        assert_eq!(quiz.current_index(), 0);
    }

    #[test]
    fn test_navigation_shows_previous_results() {
        let mut quiz = QuizController::new(vec![question(1), question(2)]).unwrap();
        assert!(!quiz.prev());

        quiz.select_answer(3);
        assert!(quiz.next());
        assert!(!quiz.next());
        assert_eq!(quiz.option_state(0), OptionState::Available);

        assert!(quiz.prev());
        assert_eq!(quiz.option_state(1), OptionState::Correct);
        assert_eq!(quiz.option_state(3), OptionState::Incorrect);
        assert_eq!(quiz.option_state(0), OptionState::Disabled);
    }

    #[test]
    fn test_out_of_range_answer_ignored() {
        let mut quiz = QuizController::new(vec![question(0)]).unwrap();
        assert!(quiz.select_answer(9).is_none());
        assert!(!quiz.is_answered(0));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(QuizController::new(vec![]), Err(QuizError::Empty)));

        let mut bad = question(0);
        bad.correct = 4;
        assert!(matches!(
            QuizController::new(vec![bad]),
            Err(QuizError::CorrectOutOfRange { question: 0, correct: 4, options: 4 })
        ));

        let toml = r#"
[[question]]
text = "Empty"
options = []
correct = 0
"#;
        assert!(matches!(QuizController::from_toml(toml), Err(QuizError::NoOptions(0))));
    }
}
