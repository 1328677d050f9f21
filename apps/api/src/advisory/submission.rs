//! Submission lifecycle: one profile in, exactly one outcome out.
//!
//! Phases: Idle → Submitting → {Rendered | Errored}. The next accepted
//! submission moves the phase back to Submitting. Rejected submissions
//! (empty fields, or another submission in flight) leave the phase alone.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, OwnedSemaphorePermit, Semaphore};
use tracing::{info, warn};
use uuid::Uuid;

use crate::advisory::client::request_advisory;
use crate::advisory::profile::Profile;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::render::{render_advisory, RenderedAdvisory, RenderedSections};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Rendered,
    Errored,
}

/// The result of one submission.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// A field was empty. The generator was not called.
    Rejected(String),
    Rendered(RenderedAdvisory),
    Errored(AppError),
}

/// Admits at most one in-flight submission per process.
/// A second submission is refused, never queued.
#[derive(Clone)]
pub struct SubmissionGate {
    permits: Arc<Semaphore>,
    phase: Arc<watch::Sender<SubmissionPhase>>,
}

impl Default for SubmissionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionGate {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(SubmissionPhase::Idle);
        Self {
            permits: Arc::new(Semaphore::new(1)),
            phase: Arc::new(phase),
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        *self.phase.borrow()
    }

    /// Claims the gate, moving the phase to Submitting.
    pub fn try_begin(&self) -> Result<SubmissionPermit, AppError> {
        let permit = self
            .permits
            .clone()
            .try_acquire_owned()
            .map_err(|_| AppError::Busy)?;

        self.phase.send_replace(SubmissionPhase::Submitting);

        Ok(SubmissionPermit {
            _permit: permit,
            phase: self.phase.clone(),
        })
    }
}

/// Held for the duration of one submission. Releases the gate on drop.
pub struct SubmissionPermit {
    _permit: OwnedSemaphorePermit,
    phase: Arc<watch::Sender<SubmissionPhase>>,
}

impl SubmissionPermit {
    pub fn finish(self, phase: SubmissionPhase) {
        self.phase.send_replace(phase);
    }
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        // A submission abandoned mid-flight (e.g. client disconnect) counts as errored.
        self.phase.send_if_modified(|phase| {
            if *phase == SubmissionPhase::Submitting {
                *phase = SubmissionPhase::Errored;
                true
            } else {
                false
            }
        });
    }
}

/// Runs one submission: validate → claim gate → generate → render.
pub async fn run_submission(
    generator: &dyn TextGenerator,
    gate: &SubmissionGate,
    profile: &Profile,
) -> SubmissionOutcome {
    if let Err(err) = profile.validate() {
        info!(
            "Submission rejected, missing fields: {:?}",
            profile.missing_fields()
        );
        return SubmissionOutcome::Rejected(err.user_message());
    }

    let permit = match gate.try_begin() {
        Ok(permit) => permit,
        Err(err) => {
            warn!("Submission refused: another submission is in flight");
            return SubmissionOutcome::Errored(err);
        }
    };

    let submission_id = Uuid::new_v4();
    info!("Submission {submission_id}: requesting advisory");

    match advise(generator, profile).await {
        Ok(rendered) => {
            let phase = if rendered.shape_error.is_some() {
                warn!("Submission {submission_id}: advisory rendered partially");
                SubmissionPhase::Errored
            } else {
                info!(
                    "Submission {submission_id}: rendered {} sections",
                    rendered.sections.len()
                );
                SubmissionPhase::Rendered
            };
            permit.finish(phase);
            SubmissionOutcome::Rendered(RenderedAdvisory::new(submission_id, rendered))
        }
        Err(err) => {
            warn!("Submission {submission_id} failed: {err}");
            permit.finish(SubmissionPhase::Errored);
            SubmissionOutcome::Errored(err)
        }
    }
}

async fn advise(
    generator: &dyn TextGenerator,
    profile: &Profile,
) -> Result<RenderedSections, AppError> {
    let raw = request_advisory(generator, profile).await?;
    render_advisory(&raw)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Stub generator that returns canned responses and counts calls.
    pub struct StubGenerator {
        response: Result<String, String>,
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        pub fn returning(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.response.clone().map_err(|message| LlmError::Api {
                status: 503,
                message,
            })
        }
    }

    pub fn full_profile() -> Profile {
        Profile {
            education: "BSc Physics".to_string(),
            skills: "Python".to_string(),
            interests: "Climate".to_string(),
            goals: "Research engineer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_field_rejects_without_calling_generator() {
        let stub = StubGenerator::returning("{}");
        let gate = SubmissionGate::new();
        let profile = Profile {
            goals: "".to_string(),
            ..full_profile()
        };

        let outcome = run_submission(&stub, &gate, &profile).await;

        assert!(
            matches!(outcome, SubmissionOutcome::Rejected(ref msg) if msg == "Please fill out all the fields.")
        );
        assert_eq!(stub.call_count(), 0);
        assert_eq!(gate.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn test_valid_submission_renders_once() {
        let stub = StubGenerator::returning("```json\n{\"Motivation\":\"Keep going\"}\n```");
        let gate = SubmissionGate::new();

        let outcome = run_submission(&stub, &gate, &full_profile()).await;

        match outcome {
            SubmissionOutcome::Rendered(advisory) => {
                assert_eq!(advisory.sections.len(), 6);
                assert!(advisory.shape_error.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(stub.call_count(), 1);
        assert!(stub.prompts.lock().unwrap()[0].contains("Education: BSc Physics"));
        assert_eq!(gate.phase(), SubmissionPhase::Rendered);
    }

    #[tokio::test]
    async fn test_transport_failure_is_errored_outcome() {
        let stub = StubGenerator::failing("quota exceeded");
        let gate = SubmissionGate::new();

        let outcome = run_submission(&stub, &gate, &full_profile()).await;

        assert!(matches!(
            outcome,
            SubmissionOutcome::Errored(AppError::Transport(_))
        ));
        assert_eq!(gate.phase(), SubmissionPhase::Errored);
    }

    #[tokio::test]
    async fn test_unparseable_response_is_errored_outcome() {
        let stub = StubGenerator::returning("not json");
        let gate = SubmissionGate::new();

        let outcome = run_submission(&stub, &gate, &full_profile()).await;

        assert!(matches!(
            outcome,
            SubmissionOutcome::Errored(AppError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_gate_refuses_second_submission_while_in_flight() {
        let stub = StubGenerator::returning("{}");
        let gate = SubmissionGate::new();

        let held = gate.try_begin().unwrap();
        assert_eq!(gate.phase(), SubmissionPhase::Submitting);

        let outcome = run_submission(&stub, &gate, &full_profile()).await;
        assert!(matches!(outcome, SubmissionOutcome::Errored(AppError::Busy)));
        assert_eq!(stub.call_count(), 0);

        held.finish(SubmissionPhase::Rendered);
        let outcome = run_submission(&stub, &gate, &full_profile()).await;
        assert!(matches!(outcome, SubmissionOutcome::Rendered(_)));
        assert_eq!(stub.call_count(), 1);
    }

    #[test]
    fn test_abandoned_permit_marks_errored() {
        let gate = SubmissionGate::new();
        drop(gate.try_begin().unwrap());
        assert_eq!(gate.phase(), SubmissionPhase::Errored);
        assert!(gate.try_begin().is_ok());
    }
}
