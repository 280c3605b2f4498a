//! Line-oriented terminal front end
//!
//! Reads commands from stdin and prints whatever changed in each session
//! snapshot. All session logic stays in the runtime; this module only maps
//! typed lines to session actions.

use crate::render::render_update;
use crate::runtime::{RuntimeClosed, SessionHandle, SessionSnapshot, SessionUpdate};
use crate::session::{InterviewType, JobBackground, SessionView};
use futures::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Closed(#[from] RuntimeClosed),
}

/// What a typed line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Choose(InterviewType),
    Back,
    /// First intake answer; the description is asked next
    SetTitle(String),
    Start {
        interview_type: InterviewType,
        job_background: JobBackground,
    },
    Submit(String),
    End,
    Restart,
    Quit,
    Hint(&'static str),
    Nothing,
}

fn is_exit_word(line: &str) -> bool {
    matches!(line, "end" | "quit" | "exit")
}

/// Map one input line to a command for the visible view
pub fn interpret(view: SessionView, draft_title: Option<&str>, line: &str) -> Command {
    let trimmed = line.trim();
    let word = trimmed.to_ascii_lowercase();

    match view {
        SessionView::Landing => {
            if matches!(word.as_str(), "quit" | "exit") {
                Command::Quit
            } else if let Some(interview_type) = InterviewType::from_menu_choice(trimmed) {
                Command::Choose(interview_type)
            } else {
                Command::Hint("Enter 1, 2 or 3 to pick an interview type.")
            }
        }
        SessionView::TechnicalIntake | SessionView::BehavioralIntake | SessionView::GeneralIntake => {
            if word == "back" {
                return Command::Back;
            }
            match (view.intake_type(), draft_title) {
                (Some(interview_type), Some(title)) => Command::Start {
                    interview_type,
                    job_background: JobBackground::new(title, trimmed),
                },
                _ => Command::SetTitle(trimmed.to_string()),
            }
        }
        SessionView::Chat => {
            if is_exit_word(&word) {
                Command::End
            } else if trimmed.is_empty() {
                Command::Nothing
            } else {
                Command::Submit(trimmed.to_string())
            }
        }
        SessionView::Processing => {
            if matches!(word.as_str(), "quit" | "exit") {
                Command::Quit
            } else {
                Command::Hint("Still generating the summary...")
            }
        }
        SessionView::Summary => match word.as_str() {
            "restart" => Command::Restart,
            "quit" | "exit" => Command::Quit,
            _ => Command::Hint("Type `restart` or `quit`."),
        },
    }
}

/// Terminal state between updates
pub struct Terminal {
    handle: SessionHandle,
    last: Option<Arc<SessionSnapshot>>,
    draft_title: Option<String>,
}

impl Terminal {
    pub fn new(handle: SessionHandle) -> Self {
        Self {
            handle,
            last: None,
            draft_title: None,
        }
    }

    fn view(&self) -> SessionView {
        self.last.as_ref().map_or(SessionView::Landing, |s| s.view)
    }

    /// Subscribe before the runtime starts so the landing snapshot is seen
    pub fn subscribe_updates(&self) -> BroadcastStream<SessionUpdate> {
        self.handle.updates()
    }

    pub async fn run(
        mut self,
        mut updates: BroadcastStream<SessionUpdate>,
    ) -> Result<(), TerminalError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                update = updates.next() => match update {
                    Some(Ok(SessionUpdate::Snapshot(snapshot))) => self.show(snapshot),
                    Some(Ok(SessionUpdate::Rejected { reason })) => println!("! {reason}"),
                    Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                        tracing::warn!(skipped, "Terminal fell behind session updates");
                    }
                    None => break,
                },

                line = lines.next_line() => match line? {
                    Some(line) => {
                        if !self.handle_line(&line).await? {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        Ok(())
    }

    fn show(&mut self, snapshot: Arc<SessionSnapshot>) {
        for line in render_update(self.last.as_deref(), &snapshot) {
            println!("{line}");
        }
        if self.view() != snapshot.view {
            self.draft_title = None;
        }
        self.last = Some(snapshot);
    }

    /// Returns `false` when the user asked to quit
    async fn handle_line(&mut self, line: &str) -> Result<bool, TerminalError> {
        match interpret(self.view(), self.draft_title.as_deref(), line) {
            Command::Choose(interview_type) => {
                self.handle.choose_interview_type(interview_type).await?;
            }
            Command::Back => self.handle.return_to_landing().await?,
            Command::SetTitle(title) => {
                self.draft_title = Some(title);
                println!("Job description:");
            }
            Command::Start {
                interview_type,
                job_background,
            } => {
                self.draft_title = None;
                self.handle
                    .start_session(interview_type, job_background)
                    .await?;
            }
            Command::Submit(text) => self.handle.submit_user_message(text).await?,
            Command::End => self.handle.end_session().await?,
            Command::Restart => self.handle.restart().await?,
            Command::Quit => return Ok(false),
            Command::Hint(hint) => println!("{hint}"),
            Command::Nothing => {}
        }
        Ok(true)
    }
}
