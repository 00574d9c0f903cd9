//! Server-rendered HTML for the browser surface.

use crate::store::QuizEntry;
use maud::{DOCTYPE, Markup, html};
use quizgen_core::{
    presenter::{OptionState, QuestionView},
    session::SessionPhase,
    topic::{MAX_TOPIC_CHARS, MIN_TOPIC_CHARS},
};
use uuid::Uuid;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; display: flex; flex-direction: column; align-items: center; margin: 3rem 1rem; }
h1 { font-size: 1.9rem; margin-bottom: 0.75rem; }
form.topic { display: flex; gap: 0.5rem; width: 100%; max-width: 36rem; }
form.topic input { flex: 1; padding: 0.6rem; font-size: 1.1rem; }
.card { width: 100%; max-width: 42rem; border: 1px solid #ddd; border-radius: 12px; padding: 2.5rem; }
.options { display: flex; flex-direction: column; gap: 1.25rem; margin-top: 1.25rem; }
.options button { padding: 0.75rem; font-size: 1rem; border: 2px solid #ccc; border-radius: 10px; background: #fff; }
.options button.correct { background: #22c55e; color: #fff; }
.options button.incorrect { background: #ef4444; color: #fff; }
.feedback, .error { color: #ef4444; margin-top: 0.75rem; }
.controls { display: flex; justify-content: flex-end; gap: 0.5rem; margin-top: 1.25rem; width: 100%; max-width: 42rem; }
"#;

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (maud::PreEscaped(STYLE)) }
            }
            body {
                h1 { "AI Quiz Generator" }
                (content)
            }
        }
    }
}

/// Topic entry form, optionally with an error banner and the rejected input.
pub fn topic_form(error: Option<&str>, topic: &str) -> Markup {
    layout(
        "AI Quiz Generator",
        html! {
            p { "Enter the topics and get questions" }
            form.topic method="post" action="/quiz" {
                input type="text" name="topic" value=(topic) required
                    minlength=(MIN_TOPIC_CHARS) maxlength=(MAX_TOPIC_CHARS)
                    placeholder="Enter the topic";
                button type="submit" { "Go" }
            }
            @if let Some(message) = error {
                p.error role="alert" { (message) }
            }
        },
    )
}

pub fn generating(id: Uuid) -> Markup {
    layout(
        "Generating quiz",
        html! {
            meta http-equiv="refresh" content=(format!("2; url=/quiz/{}", id));
            p { "Generating your questions..." }
        },
    )
}

pub fn not_found() -> Markup {
    layout(
        "Quiz not found",
        html! {
            p.error { "This quiz no longer exists." }
            a href="/" { "Start a new quiz" }
        },
    )
}

fn option_class(state: OptionState) -> &'static str {
    match state {
        OptionState::Neutral => "",
        OptionState::SelectedCorrect => "correct",
        OptionState::SelectedIncorrect => "incorrect",
    }
}

fn question_card(id: Uuid, view: &QuestionView) -> Markup {
    html! {
        div.card {
            p { (view.prompt) }
            form.options method="post" action=(format!("/quiz/{}/answer", id)) {
                @for option in &view.options {
                    button type="submit" name="choice" value=(option.index)
                        class=(option_class(option.state)) disabled[!option.enabled] {
                        (option.text)
                    }
                }
            }
            @if let Some(feedback) = &view.feedback {
                p.feedback { (feedback) }
            }
        }
    }
}

/// The quiz view: running score, the current question and navigation.
pub fn quiz_page(id: Uuid, entry: &QuizEntry) -> Markup {
    let session = &entry.session;
    let board = session.scoreboard();
    layout(
        "AI Quiz Generator",
        html! {
            p {
                "Total Questions: " (board.total)
                ", Correct Answers: " (board.correct)
                ", Incorrect Answers: " (board.incorrect)
            }
            @if let Some(view) = entry.presenter.view() {
                (question_card(id, &view))
            }
            div.controls {
                @if session.is_final_question() {
                    @if session.phase() == SessionPhase::Complete {
                        p { "Quiz complete: " (board.correct) " of " (board.total) " correct." }
                    }
                    form method="post" action=(format!("/quiz/{}/restart", id)) {
                        button type="submit" { "Try Another" }
                    }
                } @else {
                    form method="post" action=(format!("/quiz/{}/next", id)) {
                        button type="submit" { "Next" }
                    }
                }
            }
        },
    )
}
