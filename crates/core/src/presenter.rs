//! Question Presenter
//!
//! Interactive view model for a single question. The presenter accepts one
//! selection per question position, after which every option is inert and
//! the feedback is fixed. Showing a different position clears the selection.

use crate::question::QuizQuestion;
use serde::Serialize;

/// Visual state of one answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionState {
    Neutral,
    SelectedCorrect,
    SelectedIncorrect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub index: usize,
    pub text: String,
    pub state: OptionState,
    pub enabled: bool,
}

/// Everything needed to draw the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub position: usize,
    /// Prompt prefixed with its one-based number, e.g. `"3. What is ...?"`.
    pub prompt: String,
    pub options: Vec<OptionView>,
    /// Shown only after a wrong selection.
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionPresenter {
    current: Option<(usize, QuizQuestion)>,
    selected: Option<usize>,
}

impl QuestionPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Displays `question` at `position`.
    ///
    /// The selection is cleared only when the position changes.
    pub fn show(&mut self, position: usize, question: &QuizQuestion) {
        let same_position = matches!(&self.current, Some((p, _)) if *p == position);
        if !same_position {
            self.selected = None;
        }
        self.current = Some((position, question.clone()));
    }

    /// Displays `question` with a previously recorded selection.
    pub fn restore(&mut self, position: usize, question: &QuizQuestion, selected: Option<usize>) {
        self.current = Some((position, question.clone()));
        self.selected = selected.filter(|&c| c < question.options().len());
    }

    /// Handles a click on option `choice`.
    ///
    /// The first valid selection calls `on_answer(position, choice)` once and
    /// locks the presenter. Any later selection, or an out-of-range choice, is
    /// ignored and returns `None`.
    pub fn select<F>(&mut self, choice: usize, on_answer: F) -> Option<bool>
    where
        F: FnOnce(usize, usize),
    {
        if self.selected.is_some() {
            return None;
        }
        let (position, question) = self.current.as_ref()?;
        if choice >= question.options().len() {
            return None;
        }
        on_answer(*position, choice);
        self.selected = Some(choice);
        Some(question.is_correct(choice))
    }

    pub fn position(&self) -> Option<usize> {
        self.current.as_ref().map(|(p, _)| *p)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_locked(&self) -> bool {
        self.selected.is_some()
    }

    pub fn view(&self) -> Option<QuestionView> {
        let (position, question) = self.current.as_ref()?;
        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| OptionView {
                index,
                text: text.clone(),
                state: match self.selected {
                    Some(s) if s == index && question.is_correct(s) => OptionState::SelectedCorrect,
                    Some(s) if s == index => OptionState::SelectedIncorrect,
                    _ => OptionState::Neutral,
                },
                enabled: self.selected.is_none(),
            })
            .collect();
        let feedback = self
            .selected
            .filter(|&s| !question.is_correct(s))
            .map(|_| {
                format!(
                    "Your answer is incorrect. Correct answer: {}",
                    question.correct_option()
                )
            });

        Some(QuestionView {
            position: *position,
            prompt: format!("{}. {}", position + 1, question.question()),
            options,
            feedback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn cities() -> QuizQuestion {
        QuizQuestion::new(
            "What is the capital of France?",
            vec!["Paris".into(), "Lyon".into(), "Nice".into(), "Lille".into()],
            0,
        )
        .unwrap()
    }

    fn other() -> QuizQuestion {
        QuizQuestion::new(
            "Largest planet?",
            vec!["Mars".into(), "Jupiter".into(), "Venus".into(), "Earth".into()],
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_correct_selection_has_no_feedback() {
        let mut presenter = QuestionPresenter::new();
        presenter.show(0, &cities());
        assert_eq!(presenter.select(0, |_, _| {}), Some(true));

        let view = presenter.view().unwrap();
        assert_eq!(view.prompt, "1. What is the capital of France?");
        assert_eq!(view.options[0].state, OptionState::SelectedCorrect);
        assert!(view.options.iter().skip(1).all(|o| o.state == OptionState::Neutral));
        assert!(view.feedback.is_none());
    }

    #[test]
    fn test_incorrect_selection_reveals_correct_answer() {
        let mut presenter = QuestionPresenter::new();
        presenter.show(0, &cities());
        assert_eq!(presenter.select(2, |_, _| {}), Some(false));

        let view = presenter.view().unwrap();
        assert_eq!(view.options[2].state, OptionState::SelectedIncorrect);
        assert_eq!(view.options[0].state, OptionState::Neutral);
        assert_eq!(
            view.feedback.as_deref(),
            Some("Your answer is incorrect. Correct answer: Paris")
        );
    }

    #[test]
    fn test_selection_locks_options_and_calls_back_once() {
        let calls = RefCell::new(Vec::new());
        let mut presenter = QuestionPresenter::new();
        presenter.show(4, &cities());

        presenter.select(1, |p, c| calls.borrow_mut().push((p, c)));
        assert!(presenter.is_locked());
        assert!(presenter.view().unwrap().options.iter().all(|o| !o.enabled));

        assert_eq!(
            presenter.select(0, |p, c| calls.borrow_mut().push((p, c))),
            None
        );
        assert_eq!(*calls.borrow(), vec![(4, 1)]);
        assert_eq!(presenter.selected(), Some(1));
    }

    #[test]
    fn test_new_position_resets_selection() {
        let mut presenter = QuestionPresenter::new();
        presenter.show(0, &cities());
        presenter.select(3, |_, _| {});

        // Same position: still locked.
        presenter.show(0, &cities());
        assert!(presenter.is_locked());

        presenter.show(1, &other());
        assert!(!presenter.is_locked());
        let view = presenter.view().unwrap();
        assert_eq!(view.prompt, "2. Largest planet?");
        assert!(view.options.iter().all(|o| o.enabled && o.state == OptionState::Neutral));
        assert!(view.feedback.is_none());
    }

    #[test]
    fn test_select_without_question_or_out_of_range() {
        let mut presenter = QuestionPresenter::new();
        assert_eq!(presenter.select(0, |_, _| panic!("no question shown")), None);
        assert!(presenter.view().is_none());

        presenter.show(0, &cities());
        assert_eq!(presenter.select(7, |_, _| panic!("invalid choice")), None);
        assert!(!presenter.is_locked());
    }

    #[test]
    fn test_restore_rebuilds_locked_state() {
        let mut presenter = QuestionPresenter::new();
        presenter.restore(2, &cities(), Some(1));
        assert_eq!(presenter.position(), Some(2));
        assert!(presenter.is_locked());
        let view = presenter.view().unwrap();
        assert_eq!(view.options[1].state, OptionState::SelectedIncorrect);
        assert!(view.feedback.unwrap().ends_with("Paris"));

        presenter.restore(3, &other(), None);
        assert!(!presenter.is_locked());
    }
}
