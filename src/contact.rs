//! Contact form model and the async submission to the form relay.
//!
//! The form itself is plain state (fields, focus, submitting flag); the
//! network call runs on the tokio runtime and reports back over a channel
//! that the frame loop drains. No retries, no offline queue: a failure is
//! logged and the submit control re-enabled.

use crossbeam_channel as xchan;
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::config::ContactConfig;
use crate::error::Error;

/// The editable fields, in focus-traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Company,
    Message,
}

impl Field {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Company, Self::Message];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Company => "Company",
            Self::Message => "Message",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "Your name",
            Self::Email => "your@email.com",
            Self::Company => "Your company (optional)",
            Self::Message => "Tell us about your project...",
        }
    }
}

/// JSON body accepted by the relay.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContactMessage {
    pub access_key: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
    pub to: String,
}

/// Outcome handed back to the frame loop.
#[derive(Debug)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(Error),
}

/// In-progress form state.
#[derive(Debug, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
    focus: usize,
    submitting: bool,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Company => &self.company,
            Field::Message => &self.message,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self.focused() {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Company => &mut self.company,
            Field::Message => &mut self.message,
        }
    }

    pub fn insert(&mut self, text: &str) {
        if self.submitting {
            return;
        }
        for ch in text.chars().filter(|c| !c.is_control()) {
            self.value_mut().push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if !self.submitting {
            self.value_mut().pop();
        }
    }

    /// Mirror of the native `required` constraints: name, email and message
    /// must be non-empty; company stays optional.
    pub fn can_submit(&self) -> bool {
        !self.submitting
            && !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.message.trim().is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    pub fn body(&self, contact: &ContactConfig) -> ContactMessage {
        ContactMessage {
            access_key: contact.access_key.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
            message: self.message.clone(),
            to: contact.to.clone(),
        }
    }

    /// Clear every field back to the empty string (post-success behavior).
    pub fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.company.clear();
        self.message.clear();
        self.focus = 0;
        self.submitting = false;
    }
}

/// Fire-and-report submitter. One POST per call; the render loop is never
/// blocked, only the spawned task awaits the response.
pub struct Submitter {
    client: reqwest::Client,
    config: ContactConfig,
    runtime: Handle,
    outcomes: xchan::Sender<SubmitOutcome>,
}

impl Submitter {
    pub fn new(
        config: ContactConfig,
        runtime: Handle,
    ) -> (Self, xchan::Receiver<SubmitOutcome>) {
        let (tx, rx) = xchan::unbounded();
        (
            Self {
                client: reqwest::Client::new(),
                config,
                runtime,
                outcomes: tx,
            },
            rx,
        )
    }

    pub fn submit(&self, body: ContactMessage) {
        let client = self.client.clone();
        let endpoint = self.config.endpoint.clone();
        let outcomes = self.outcomes.clone();
        debug!(endpoint = %endpoint, "submitting contact message");
        self.runtime.spawn(async move {
            let outcome = match post_message(&client, &endpoint, &body).await {
                Ok(()) => SubmitOutcome::Accepted,
                Err(err) => {
                    warn!(error = %err, "contact submission failed");
                    SubmitOutcome::Rejected(err)
                }
            };
            // The receiver dies with the window; a send failure only means
            // the app is already shutting down.
            let _ = outcomes.send(outcome);
        });
    }
}

async fn post_message(
    client: &reqwest::Client,
    endpoint: &str,
    body: &ContactMessage,
) -> Result<(), Error> {
    let response = client.post(endpoint).json(body).send().await?;
    response.error_for_status()?;
    Ok(())
}
