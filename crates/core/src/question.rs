//! Quiz Question Model and Response Parsing
//!
//! The completion service returns free text that is expected to be a JSON
//! array of question objects. This module turns that text into validated
//! `QuizQuestion` values, rejecting anything that does not match the
//! expected shape before it can reach the session or the presenter.

use serde::{Deserialize, Serialize};

/// Number of questions a generated quiz must contain.
pub const QUESTION_COUNT: usize = 10;
/// Number of answer options every question must carry.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question.
///
/// Values are only produced by [`parse_questions`] or [`QuizQuestion::new`],
/// both of which guarantee that `correct_answer` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
}

impl QuizQuestion {
    /// Builds a question, applying the same checks as the response parser.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, ParseError> {
        RawQuestion {
            question: question.into(),
            options,
            correct_answer: correct_answer as i64,
        }
        .validate(0)
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_answer
    }
}

/// Reasons a completion response is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("response does not contain a JSON array")]
    NoJsonArray,
    #[error("response is not valid question JSON: {0}")]
    InvalidJson(String),
    #[error("expected {expected} questions, got {actual}")]
    WrongQuestionCount { expected: usize, actual: usize },
    #[error("question {index} has empty text")]
    EmptyQuestion { index: usize },
    #[error("question {index} has {actual} options, expected {expected}")]
    WrongOptionCount {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("question {index} has an empty option at position {option}")]
    EmptyOption { index: usize, option: usize },
    #[error("question {index} marks option {correct_answer} as correct, which does not exist")]
    CorrectAnswerOutOfRange { index: usize, correct_answer: i64 },
}

/// Wire shape of a question before validation.
#[derive(Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: i64,
}

impl RawQuestion {
    fn validate(self, index: usize) -> Result<QuizQuestion, ParseError> {
        if self.question.trim().is_empty() {
            return Err(ParseError::EmptyQuestion { index });
        }
        if self.options.len() != OPTION_COUNT {
            return Err(ParseError::WrongOptionCount {
                index,
                expected: OPTION_COUNT,
                actual: self.options.len(),
            });
        }
        if let Some(option) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(ParseError::EmptyOption { index, option });
        }
        let correct_answer = usize::try_from(self.correct_answer)
            .ok()
            .filter(|&c| c < self.options.len())
            .ok_or(ParseError::CorrectAnswerOutOfRange {
                index,
                correct_answer: self.correct_answer,
            })?;

        Ok(QuizQuestion {
            question: self.question.trim().to_string(),
            options: self.options.into_iter().map(|o| o.trim().to_string()).collect(),
            correct_answer,
        })
    }
}

/// Finds the question array inside a completion.
///
/// Models often wrap the payload in a Markdown fence or in prose, and the
/// prose may carry brackets of its own (`[10]`, `Sources: [1]`). Every `[`
/// is tried in order and the first one that decodes as a non-empty list of
/// questions wins; text after the array is ignored. When nothing decodes,
/// the error from the earliest candidate is reported.
fn decode_array(raw: &str) -> Result<Vec<RawQuestion>, ParseError> {
    let mut first_error = None;
    let mut saw_empty = false;
    for (start, _) in raw.match_indices('[') {
        let mut stream =
            serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Vec<RawQuestion>>();
        match stream.next() {
            Some(Ok(questions)) if !questions.is_empty() => return Ok(questions),
            Some(Ok(_)) => saw_empty = true,
            Some(Err(err)) => {
                first_error.get_or_insert(err);
            }
            None => {}
        }
    }
    match first_error {
        _ if saw_empty => Ok(Vec::new()),
        Some(err) => Err(ParseError::InvalidJson(err.to_string())),
        None => Err(ParseError::NoJsonArray),
    }
}

/// Parses and validates a completion into exactly [`QUESTION_COUNT`] questions.
pub fn parse_questions(raw: &str) -> Result<Vec<QuizQuestion>, ParseError> {
    let raw_questions = decode_array(raw)?;
    if raw_questions.len() != QUESTION_COUNT {
        return Err(ParseError::WrongQuestionCount {
            expected: QUESTION_COUNT,
            actual: raw_questions.len(),
        });
    }

    raw_questions
        .into_iter()
        .enumerate()
        .map(|(index, q)| q.validate(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question_json(i: usize) -> serde_json::Value {
        json!({
            "question": format!("Question {}?", i),
            "options": ["A", "B", "C", "D"],
            "correct_answer": i % 4,
        })
    }

    fn quiz_json(count: usize) -> String {
        let items: Vec<_> = (0..count).map(question_json).collect();
        serde_json::to_string_pretty(&items).unwrap()
    }

    #[test]
    fn test_parse_valid_response() {
        let questions = parse_questions(&quiz_json(10)).unwrap();
        assert_eq!(questions.len(), QUESTION_COUNT);
        assert_eq!(questions[0].question(), "Question 0?");
        assert_eq!(questions[3].correct_answer(), 3);
        assert_eq!(questions[5].correct_option(), "B");
    }

    #[test]
    fn test_parse_strips_code_fence_and_prose() {
        let raw = format!(
            "Here is your quiz:\n```json\n{}\n```\nGood luck!",
            quiz_json(10)
        );
        assert_eq!(parse_questions(&raw).unwrap().len(), 10);
    }

    #[test]
    fn test_parse_skips_bracketed_prose_around_array() {
        let raw = format!("Here are [10] questions:\n{}", quiz_json(10));
        assert_eq!(parse_questions(&raw).unwrap().len(), 10);

        let raw = format!("{}\nSources: [1]", quiz_json(10));
        let questions = parse_questions(&raw).unwrap();
        assert_eq!(questions[9].question(), "Question 9?");

        let raw = format!("See [a] and [] first.\n{}\n[2] end", quiz_json(10));
        assert_eq!(parse_questions(&raw).unwrap().len(), 10);
    }

    #[test]
    fn test_parse_reports_empty_array_as_wrong_count() {
        let err = parse_questions("The quiz: []").unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongQuestionCount {
                expected: 10,
                actual: 0
            }
        );
    }

    #[test]
    fn test_parse_rejects_plain_prose() {
        let err = parse_questions("Sorry, I cannot help with that.").unwrap_err();
        assert_eq!(err, ParseError::NoJsonArray);
    }

    #[test]
    fn test_parse_rejects_truncated_output() {
        let full = quiz_json(10);
        let truncated = &full[..full.len() / 2];
        let err = parse_questions(truncated).unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_rejects_wrong_question_count() {
        let err = parse_questions(&quiz_json(9)).unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongQuestionCount {
                expected: 10,
                actual: 9
            }
        );
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let mut items: Vec<_> = (0..10).map(question_json).collect();
        items[2].as_object_mut().unwrap().remove("correct_answer");
        let err = parse_questions(&serde_json::to_string(&items).unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_rejects_three_options() {
        let mut items: Vec<_> = (0..10).map(question_json).collect();
        items[4]["options"] = json!(["A", "B", "C"]);
        let err = parse_questions(&serde_json::to_string(&items).unwrap()).unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongOptionCount {
                index: 4,
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_parse_rejects_out_of_range_answer() {
        let mut items: Vec<_> = (0..10).map(question_json).collect();
        items[7]["correct_answer"] = json!(4);
        let err = parse_questions(&serde_json::to_string(&items).unwrap()).unwrap_err();
        assert_eq!(
            err,
            ParseError::CorrectAnswerOutOfRange {
                index: 7,
                correct_answer: 4
            }
        );

        items[7]["correct_answer"] = json!(-1);
        let err = parse_questions(&serde_json::to_string(&items).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::CorrectAnswerOutOfRange { index: 7, .. }
        ));
    }

    #[test]
    fn test_parse_rejects_empty_texts() {
        let mut items: Vec<_> = (0..10).map(question_json).collect();
        items[1]["question"] = json!("   ");
        let err = parse_questions(&serde_json::to_string(&items).unwrap()).unwrap_err();
        assert_eq!(err, ParseError::EmptyQuestion { index: 1 });

        let mut items: Vec<_> = (0..10).map(question_json).collect();
        items[0]["options"] = json!(["A", "", "C", "D"]);
        let err = parse_questions(&serde_json::to_string(&items).unwrap()).unwrap_err();
        assert_eq!(err, ParseError::EmptyOption { index: 0, option: 1 });
    }

    #[test]
    fn test_new_question_validates() {
        let q = QuizQuestion::new(
            "Capital of France?",
            vec!["Paris".into(), "Lyon".into(), "Nice".into(), "Lille".into()],
            0,
        )
        .unwrap();
        assert!(q.is_correct(0));
        assert!(!q.is_correct(2));

        let err = QuizQuestion::new("Q?", vec!["A".into(); 4], 9).unwrap_err();
        assert!(matches!(err, ParseError::CorrectAnswerOutOfRange { .. }));
    }
}
