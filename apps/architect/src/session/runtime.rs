//! Drives the session: apply an event, perform its effect, apply the outcome.
//!
//! The session lock is never held across a network call, so a reset (or any
//! other independent transition) goes through while a request is in flight.
//! Whatever that request brings back is then dropped as stale.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::debug;

use crate::errors::AppError;
use crate::generation::client::AnalysisClient;
use crate::session::{Effect, Event, Session, SessionSnapshot};

pub struct SessionRuntime {
    session: Mutex<Session>,
    client: AnalysisClient,
    timeout: Duration,
}

impl SessionRuntime {
    pub fn new(client: AnalysisClient, timeout: Duration) -> Self {
        Self {
            session: Mutex::new(Session::new()),
            client,
            timeout,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Runs `f` against the current session under the lock.
    pub async fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> T {
        f(&*self.session.lock().await)
    }

    /// Applies `event` and, for network-backed transitions, waits for the
    /// outcome to be committed before returning the new snapshot.
    pub async fn dispatch(&self, event: Event) -> Result<SessionSnapshot, AppError> {
        let effect = self.session.lock().await.apply(event)?;

        if let Some(effect) = effect {
            let completion = self.perform(effect).await;
            self.session.lock().await.apply(completion)?;
        }

        Ok(self.snapshot().await)
    }

    async fn perform(&self, effect: Effect) -> Event {
        match effect {
            Effect::GenerateAnalysis {
                token,
                operation,
                prompt,
            } => {
                debug!(generation = token.generation, "Calling model for {}", operation.label());
                let outcome = match timeout(self.timeout, self.client.generate(&prompt)).await {
                    Ok(Ok(result)) => Ok(result),
                    Ok(Err(failure)) => Err(AppError::Generation(failure)),
                    Err(_) => Err(AppError::Timeout(self.timeout)),
                };
                Event::AnalysisCompleted {
                    token,
                    operation,
                    outcome,
                }
            }
            Effect::ReviseDocument {
                token,
                document,
                instruction,
            } => {
                debug!(generation = token.generation, "Calling model for free edit");
                let outcome =
                    match timeout(self.timeout, self.client.edit_text(&document, &instruction))
                        .await
                    {
                        Ok(Ok(text)) => Ok(text),
                        Ok(Err(e)) => Err(AppError::Edit(e)),
                        Err(_) => Err(AppError::Timeout(self.timeout)),
                    };
                Event::RevisionCompleted { token, outcome }
            }
        }
    }
}
