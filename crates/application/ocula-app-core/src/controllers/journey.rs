use std::sync::Arc;

use chrono::Utc;
use ocula_core::{JourneyMilestone, JourneyProgress, JourneyStage};
use ocula_repository::{JourneyRepository, RepositoryError};
use tracing::info;

use crate::app_core::{Controller, Scope};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JourneyState {
    pub is_loading: bool,
    pub customer_id: Option<String>,
    /// Ordered by stage.
    pub milestones: Vec<JourneyMilestone>,
    pub progress_percent: u8,
    pub current_stage: Option<JourneyStage>,
    pub error: Option<String>,
}

impl JourneyState {
    fn with_milestones(self, mut milestones: Vec<JourneyMilestone>) -> Self {
        milestones.sort_by_key(|m| m.stage);
        let progress = JourneyProgress::of(&milestones);
        Self {
            is_loading: false,
            milestones,
            progress_percent: progress.percent,
            current_stage: progress.current_stage,
            ..self
        }
    }
}

#[derive(Debug)]
pub enum JourneyEvent {
    Load { customer_id: String },
    CompleteMilestone(String),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyEffect {
    MilestoneReached(String),
    JourneyComplete,
    ShowError(String),
}

type JourneyScope = Scope<JourneyState, JourneyEffect>;

/// Tracks one patient's progress through the prosthesis stages.
pub struct JourneyController {
    repo: Arc<dyn JourneyRepository>,
}

impl JourneyController {
    pub fn new(repo: Arc<dyn JourneyRepository>) -> Self {
        Self { repo }
    }

    fn fail(scope: &JourneyScope, e: RepositoryError) {
        let message = e.to_string();
        scope.update_state(|s| JourneyState {
            is_loading: false,
            error: Some(message.clone()),
            ..s
        });
        scope.send_effect(JourneyEffect::ShowError(message));
    }
}

#[async_trait::async_trait]
impl Controller for JourneyController {
    type State = JourneyState;
    type Event = JourneyEvent;
    type Effect = JourneyEffect;

    const NAME: &'static str = "journey";

    async fn on_event(&mut self, event: JourneyEvent, scope: &JourneyScope) -> anyhow::Result<()> {
        match event {
            JourneyEvent::Load { customer_id } => {
                scope.update_state(|s| JourneyState {
                    is_loading: true,
                    customer_id: Some(customer_id.clone()),
                    error: None,
                    ..s
                });
                match self.repo.for_customer(&customer_id).await {
                    Ok(milestones) => scope.update_state(|s| s.with_milestones(milestones)),
                    Err(e) => Self::fail(scope, e),
                }
            }

            JourneyEvent::CompleteMilestone(id) => {
                scope.update_state(|s| JourneyState {
                    is_loading: true,
                    error: None,
                    ..s
                });
                let now = Utc::now();
                match self.repo.complete(&id, now).await {
                    Ok(done) => {
                        // Completing twice keeps the first timestamp.
                        let newly_completed = done.completed_at == Some(now);
                        let res = self.repo.for_customer(&done.customer_id).await;
                        let milestones = match res {
                            Ok(m) => m,
                            Err(e) => {
                                Self::fail(scope, e);
                                return Ok(());
                            }
                        };
                        let progress = JourneyProgress::of(&milestones);
                        scope.update_state(|s| JourneyState {
                            customer_id: Some(done.customer_id.clone()),
                            ..s.with_milestones(milestones)
                        });
                        if newly_completed {
                            info!(milestone = %done.id, percent = progress.percent, "milestone completed");
                            scope.send_effect(JourneyEffect::MilestoneReached(done.title));
                            if progress.is_complete() {
                                scope.send_effect(JourneyEffect::JourneyComplete);
                            }
                        }
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }

            JourneyEvent::Reset => scope.update_state(|_| JourneyState::default()),
        }
        Ok(())
    }

    fn recover(state: JourneyState) -> JourneyState {
        JourneyState {
            is_loading: false,
            ..state
        }
    }
}
