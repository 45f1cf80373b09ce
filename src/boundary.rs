//! Render error containment. A [`Boundary`] wraps fallible per-frame work;
//! the first failure trips it into a persistent error panel instead of
//! tearing the whole window down, until the user retries or reloads.

use tracing::error;

use crate::error::Error;

/// What the page draws while a boundary is tripped.
#[derive(Debug, Clone)]
pub struct ErrorPanel {
    pub title: String,
    pub detail: String,
    pub hint: String,
}

impl ErrorPanel {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            title: "Something went wrong".to_string(),
            detail: detail.into(),
            hint: "Press R to retry or T to reload".to_string(),
        }
    }
}

/// How a tripped boundary turns an error into a panel, and what else happens
/// when one trips. The default logs and shows the error text.
pub trait Fallback {
    fn fallback_from(&self, err: &Error, context: &str) -> ErrorPanel {
        ErrorPanel::new(format!("{context}: {err}"))
    }

    fn on_error(&self, err: &Error, context: &str) {
        error!("{context} failed: {err}");
    }
}

/// Log-and-display fallback used by the application.
#[derive(Debug, Default)]
pub struct LogFallback;

impl Fallback for LogFallback {}

#[derive(Debug)]
pub struct Boundary<F: Fallback> {
    fallback: F,
    tripped: Option<ErrorPanel>,
}

impl<F: Fallback> Boundary<F> {
    pub fn new(fallback: F) -> Self {
        Self {
            fallback,
            tripped: None,
        }
    }

    /// Run a fallible step. On failure the boundary trips and stays tripped
    /// until [`Boundary::reset`].
    pub fn guard<T>(&mut self, context: &str, result: Result<T, Error>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.fallback.on_error(&err, context);
                self.tripped = Some(self.fallback.fallback_from(&err, context));
                None
            }
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.is_some()
    }

    pub fn panel(&self) -> Option<&ErrorPanel> {
        self.tripped.as_ref()
    }

    /// Clear the tripped state so the next frame renders normally again.
    pub fn reset(&mut self) {
        self.tripped = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingFallback {
        errors: Cell<usize>,
    }

    impl Fallback for CountingFallback {
        fn on_error(&self, _err: &Error, _context: &str) {
            self.errors.set(self.errors.get() + 1);
        }
    }

    fn render_failure() -> Error {
        Error::Render(anyhow::anyhow!("device lost"))
    }

    #[test]
    fn ok_results_pass_through_untouched() {
        let mut boundary = Boundary::new(LogFallback);
        assert_eq!(boundary.guard("draw", Ok(7)), Some(7));
        assert!(!boundary.is_tripped());
    }

    #[test]
    fn a_failure_trips_the_boundary_with_context() {
        let mut boundary = Boundary::new(LogFallback);
        let out: Option<()> = boundary.guard("draw overlay", Err(render_failure()));
        assert!(out.is_none());
        let panel = boundary.panel().expect("tripped");
        assert!(panel.detail.contains("draw overlay"));
        assert!(panel.detail.contains("device lost"));
        assert!(panel.hint.contains('R') && panel.hint.contains('T'));
    }

    #[test]
    fn reset_clears_the_panel() {
        let mut boundary = Boundary::new(LogFallback);
        let _: Option<()> = boundary.guard("draw", Err(render_failure()));
        assert!(boundary.is_tripped());
        boundary.reset();
        assert!(!boundary.is_tripped());
        assert!(boundary.panel().is_none());
    }

    #[test]
    fn the_fallback_hook_sees_every_failure() {
        let fallback = CountingFallback {
            errors: Cell::new(0),
        };
        let mut boundary = Boundary::new(fallback);
        let _: Option<()> = boundary.guard("a", Err(render_failure()));
        let _: Option<()> = boundary.guard("b", Err(render_failure()));
        assert_eq!(boundary.fallback.errors.get(), 2);
    }
}
