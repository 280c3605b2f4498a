//! Plain-text projection of session snapshots
//!
//! Rendering is a pure function of the previous and current snapshot, so the
//! terminal only ever prints what changed.

use crate::runtime::SessionSnapshot;
use crate::session::{Comparison, InterviewType, Role, SessionView, Summary, Turn};

pub const TYPING_INDICATOR: &str = "Interviewer is typing...";

/// Lines to print for the move from `previous` to `current`
pub fn render_update(previous: Option<&SessionSnapshot>, current: &SessionSnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    let view_changed = previous.map_or(true, |p| p.view != current.view);
    if view_changed {
        lines.extend(view_header(current));
    }

    let earlier: &[Turn] = previous.map_or(&[], |p| p.history.as_slice());
    lines.extend(new_turns(earlier, &current.history).iter().map(render_turn));

    let was_pending = previous.is_some_and(|p| p.pending_response);
    if current.pending_response && !was_pending {
        lines.push(TYPING_INDICATOR.to_string());
    }

    lines
}

/// Turns not yet printed; everything if the history was replaced
fn new_turns<'a>(earlier: &[Turn], current: &'a [Turn]) -> &'a [Turn] {
    if current.starts_with(earlier) {
        &current[earlier.len()..]
    } else {
        current
    }
}

pub fn render_turn(turn: &Turn) -> String {
    match turn.role {
        Role::User => format!("You: {}", turn.content),
        Role::Interviewer => format!("Interviewer: {}", turn.content),
    }
}

fn view_header(snapshot: &SessionSnapshot) -> Vec<String> {
    match snapshot.view {
        SessionView::Landing => landing_menu(),
        SessionView::TechnicalIntake | SessionView::BehavioralIntake | SessionView::GeneralIntake => {
            let label = snapshot.view.intake_type().map_or("Interview", InterviewType::label);
            vec![
                String::new(),
                format!("== {label} =="),
                "Job title (or `back` to choose another type):".to_string(),
            ]
        }
        SessionView::Chat => {
            let label = snapshot.interview_type.map_or("Interview", InterviewType::label);
            let mut lines = vec![String::new(), format!("== {label} ==")];
            if let Some(job) = &snapshot.job_background {
                if !job.title.is_empty() {
                    lines.push(format!("Position: {}", job.title));
                }
            }
            lines.push("Type your answers. `end` finishes the interview.".to_string());
            lines
        }
        SessionView::Processing => vec!["Generating your interview summary...".to_string()],
        SessionView::Summary => {
            let mut lines = snapshot.summary.as_ref().map(render_summary).unwrap_or_default();
            lines.push(String::new());
            lines.push("Type `restart` for another interview or `quit` to exit.".to_string());
            lines
        }
    }
}

fn landing_menu() -> Vec<String> {
    let mut lines = vec![String::new(), "Choose an interview type:".to_string()];
    lines.extend(
        InterviewType::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| format!("  {}. {}", i + 1, t.label())),
    );
    lines
}

pub fn render_summary(summary: &Summary) -> Vec<String> {
    let mut lines = vec![String::new(), "== Interview Transcript ==".to_string()];
    lines.extend(summary.transcript.iter().map(render_turn));

    lines.push(String::new());
    lines.push("== Suggestions for Improvement ==".to_string());
    lines.extend(summary.suggestions.lines().map(str::to_string));

    if !summary.comparisons.is_empty() {
        lines.push(String::new());
        lines.push("== Your Answers vs. Sample Answers ==".to_string());
        for (i, item) in summary.comparisons.iter().enumerate() {
            lines.extend(render_comparison(i + 1, item));
        }
    }
    lines
}

fn render_comparison(number: usize, item: &Comparison) -> [String; 3] {
    [
        format!("Q{number}: {}", item.question),
        format!("  Your answer: {}", item.user_answer),
        format!("  Sample answer: {}", item.sample_answer),
    ]
}
