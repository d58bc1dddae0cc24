use std::fmt;

use chrono::NaiveDate;
use parking_lot::RwLock;
use strum_macros::Display;

use crate::image::Image;

pub const LOADING_TITLE: &str = "Retrieving NASA's image...";
pub const LOADING_MESSAGE: &str = "Loading cosmic data from NASA...";
pub const NO_IMAGE_MESSAGE: &str = "No image available for this date";

const WRAP_WIDTH: usize = 78;

#[derive(Display, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    #[strum(serialize = "idle")]
    Idle,
    #[strum(serialize = "loading")]
    Loading,
    #[strum(serialize = "displaying")]
    Displaying,
    #[strum(serialize = "no image")]
    NoImage,
    #[strum(serialize = "failed")]
    Failed,
}

/// Everything that ends up on screen for the current query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub phase: Phase,
    pub generation: u64,
    pub query: Option<NaiveDate>,
    pub title: String,
    pub explanation: Option<String>,
    pub image: Option<Image>,
    /// Shown in place of the image while loading, on errors and when there is nothing to show
    pub placeholder: Option<String>,
    pub input_error: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            query: None,
            title: String::new(),
            explanation: None,
            image: None,
            placeholder: None,
            input_error: false,
        }
    }
}

impl ViewState {
    fn reset_loading(&mut self, date: NaiveDate) {
        self.phase = Phase::Loading;
        self.query = Some(date);
        self.title = LOADING_TITLE.to_owned();
        self.explanation = None;
        self.image = None;
        self.placeholder = Some(LOADING_MESSAGE.to_owned());
        self.input_error = false;
    }

    pub fn show_text(&mut self, title: String, explanation: Option<String>) {
        self.title = title;
        if explanation.is_some() {
            self.explanation = explanation;
        }
    }

    pub fn display(&mut self, image: Image) {
        self.phase = Phase::Displaying;
        self.placeholder = None;
        self.image = Some(image);
    }

    pub fn no_image(&mut self) {
        self.phase = Phase::NoImage;
        self.image = None;
        self.placeholder = Some(NO_IMAGE_MESSAGE.to_owned());
    }

    /// Title and explanation stay, only the image area turns into the error
    pub fn fail(&mut self, message: &str) {
        self.phase = Phase::Failed;
        self.image = None;
        self.placeholder = Some(message.to_owned());
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self.phase,
            Phase::Displaying | Phase::NoImage | Phase::Failed
        )
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(date) = self.query {
            writeln!(f, "[{}] {}", date.format("%Y-%m-%d"), self.phase)?;
        }
        if !self.title.is_empty() {
            writeln!(f, "{}", self.title)?;
            writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        }
        if let Some(image) = &self.image {
            writeln!(f, "{} ({}x{})", image.url, image.width, image.height)?;
        }
        if let Some(placeholder) = &self.placeholder {
            writeln!(f, "~ {} ~", placeholder)?;
        }
        if let Some(explanation) = &self.explanation {
            writeln!(f)?;
            writeln!(f, "{}", textwrap::fill(explanation, WRAP_WIDTH))?;
        }
        Ok(())
    }
}

/// Handle for one submitted query. Commits made with a ticket from an
/// older submission are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// The single owner of the display state. Lookups never touch the state
/// directly, they go through [`View::begin`] and [`View::commit`]
#[derive(Debug, Default)]
pub struct View {
    state: RwLock<ViewState>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the view into loading for a new query and supersedes whatever
    /// query was in flight before
    pub fn begin(&self, date: NaiveDate) -> Ticket {
        let mut state = self.state.write();
        state.generation += 1;
        state.reset_loading(date);
        Ticket(state.generation)
    }

    /// Applies `update` only if `ticket` still belongs to the latest query and
    /// returns the resulting state
    pub fn commit<F: FnOnce(&mut ViewState)>(&self, ticket: Ticket, update: F) -> Option<ViewState> {
        let mut state = self.state.write();
        if state.generation != ticket.0 {
            return None;
        }
        update(&mut state);
        Some(state.clone())
    }

    /// Flags the date input without touching the rest of the display
    pub fn reject_input(&self) {
        self.state.write().input_error = true;
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn begin_resets_previous_result() {
        let view = View::new();
        let ticket = view.begin(day(1));
        view.commit(ticket, |state| {
            state.show_text("T".to_owned(), Some("E".to_owned()));
            state.no_image();
        })
        .unwrap();
        view.begin(day(2));
        let state = view.snapshot();
        assert_eq!(state.phase, Phase::Loading);
        assert_eq!(state.title, LOADING_TITLE);
        assert_eq!(state.explanation, None);
        assert_eq!(state.placeholder.as_deref(), Some(LOADING_MESSAGE));
        assert_eq!(state.query, Some(day(2)));
    }

    #[test]
    fn stale_tickets_cannot_commit() {
        let view = View::new();
        let first = view.begin(day(1));
        let second = view.begin(day(2));
        assert_ne!(first, second);
        assert!(view.commit(first, |state| state.fail("late")).is_none());
        assert_eq!(view.snapshot().phase, Phase::Loading);
        let committed = view.commit(second, ViewState::no_image).unwrap();
        assert_eq!(committed.phase, Phase::NoImage);
    }

    #[test]
    fn rejecting_input_keeps_phase() {
        let view = View::new();
        view.reject_input();
        let state = view.snapshot();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.input_error);
        view.begin(day(1));
        assert!(!view.snapshot().input_error);
    }

    #[test]
    fn failure_keeps_text() {
        let view = View::new();
        let ticket = view.begin(day(1));
        let state = view
            .commit(ticket, |state| {
                state.show_text("T".to_owned(), Some("E".to_owned()));
                state.fail("Failed to load the image");
            })
            .unwrap();
        assert_eq!(state.title, "T");
        assert_eq!(state.explanation.as_deref(), Some("E"));
        assert!(state.is_settled());
    }

    #[test]
    fn renders_for_the_terminal() {
        let view = View::new();
        let ticket = view.begin(day(1));
        let state = view
            .commit(ticket, |state| {
                state.show_text("Comet".to_owned(), Some("A comet.".to_owned()));
                state.display(Image {
                    url: "http://img".to_owned(),
                    alt: "Comet".to_owned(),
                    width: 640,
                    height: 480,
                });
            })
            .unwrap();
        assert_eq!(
            state.to_string(),
            "[2024-01-01] displaying\nComet\n=====\nhttp://img (640x480)\n\nA comet.\n"
        );
    }
}
