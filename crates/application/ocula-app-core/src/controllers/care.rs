use std::sync::Arc;

use chrono::Utc;
use ocula_core::validation::validate_new_care_instruction;
use ocula_core::{CareCategory, CareInstruction, NewCareInstruction};
use ocula_repository::{CareInstructionRepository, RepositoryError};

use crate::app_core::{Controller, Scope};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CareRoutineState {
    pub is_loading: bool,
    pub customer_id: Option<String>,
    pub instructions: Vec<CareInstruction>,
    pub category_filter: Option<CareCategory>,
    /// Completed entries among `instructions`.
    pub completed_count: usize,
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum CareRoutineEvent {
    Load { customer_id: String },
    FilterByCategory(Option<CareCategory>),
    ToggleCompleted(String),
    Add(NewCareInstruction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CareRoutineEffect {
    ShowSuccess(String),
    ShowError(String),
}

type CareScope = Scope<CareRoutineState, CareRoutineEffect>;

const NO_PATIENT: &str = "Select a patient first";

pub struct CareRoutineController {
    repo: Arc<dyn CareInstructionRepository>,
}

fn completed(items: &[CareInstruction]) -> usize {
    items.iter().filter(|c| c.completed).count()
}

impl CareRoutineController {
    pub fn new(repo: Arc<dyn CareInstructionRepository>) -> Self {
        Self { repo }
    }

    fn fail(scope: &CareScope, e: RepositoryError) {
        let message = e.to_string();
        scope.update_state(|s| CareRoutineState {
            is_loading: false,
            error: Some(message.clone()),
            ..s
        });
        scope.send_effect(CareRoutineEffect::ShowError(message));
    }

    fn start_loading(scope: &CareScope) {
        scope.update_state(|s| CareRoutineState {
            is_loading: true,
            error: None,
            ..s
        });
    }

    fn show(scope: &CareScope, instructions: Vec<CareInstruction>) {
        scope.update_state(|s| CareRoutineState {
            is_loading: false,
            completed_count: completed(&instructions),
            instructions,
            ..s
        });
    }
}

#[async_trait::async_trait]
impl Controller for CareRoutineController {
    type State = CareRoutineState;
    type Event = CareRoutineEvent;
    type Effect = CareRoutineEffect;

    const NAME: &'static str = "care-routine";

    async fn on_event(&mut self, event: CareRoutineEvent, scope: &CareScope) -> anyhow::Result<()> {
        match event {
            CareRoutineEvent::Load { customer_id } => {
                scope.update_state(|s| CareRoutineState {
                    is_loading: true,
                    customer_id: Some(customer_id.clone()),
                    error: None,
                    ..s
                });
                let filter = scope.state().category_filter;
                let res = match filter {
                    Some(c) => self.repo.filter_by_category(&customer_id, c).await,
                    None => self.repo.for_customer(&customer_id).await,
                };
                match res {
                    Ok(items) => Self::show(scope, items),
                    Err(e) => Self::fail(scope, e),
                }
            }

            CareRoutineEvent::FilterByCategory(category) => {
                let Some(customer_id) = scope.state().customer_id else {
                    scope.update_state(|s| CareRoutineState {
                        error: Some(NO_PATIENT.into()),
                        ..s
                    });
                    return Ok(());
                };
                scope.update_state(|s| CareRoutineState {
                    is_loading: true,
                    category_filter: category,
                    error: None,
                    ..s
                });
                let res = match category {
                    Some(c) => self.repo.filter_by_category(&customer_id, c).await,
                    None => self.repo.for_customer(&customer_id).await,
                };
                match res {
                    Ok(items) => Self::show(scope, items),
                    Err(e) => Self::fail(scope, e),
                }
            }

            CareRoutineEvent::ToggleCompleted(id) => {
                Self::start_loading(scope);
                match self.repo.toggle_completed(&id, Utc::now()).await {
                    Ok(updated) => {
                        let done = updated.completed;
                        let title = updated.title.clone();
                        scope.update_state(|s| {
                            let instructions: Vec<_> = s
                                .instructions
                                .into_iter()
                                .map(|c| if c.id == updated.id { updated.clone() } else { c })
                                .collect();
                            CareRoutineState {
                                is_loading: false,
                                completed_count: completed(&instructions),
                                instructions,
                                ..s
                            }
                        });
                        if done {
                            scope.send_effect(CareRoutineEffect::ShowSuccess(format!(
                                "{title} done"
                            )));
                        }
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }

            CareRoutineEvent::Add(new) => {
                if let Err(e) = validate_new_care_instruction(&new) {
                    scope.update_state(|s| CareRoutineState {
                        error: Some(e.to_string()),
                        ..s
                    });
                    return Ok(());
                }
                Self::start_loading(scope);
                match self.repo.add(new).await {
                    Ok(created) => {
                        scope.update_state(|s| {
                            let mut instructions = s.instructions;
                            let same_patient =
                                s.customer_id.as_deref() == Some(created.customer_id.as_str());
                            let shown = same_patient
                                && s.category_filter.is_none_or(|c| c == created.category);
                            if shown {
                                instructions.push(created);
                            }
                            CareRoutineState {
                                is_loading: false,
                                completed_count: completed(&instructions),
                                instructions,
                                ..s
                            }
                        });
                        scope.send_effect(CareRoutineEffect::ShowSuccess(
                            "Care instruction added".into(),
                        ));
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }
        }
        Ok(())
    }

    fn recover(state: CareRoutineState) -> CareRoutineState {
        CareRoutineState {
            is_loading: false,
            ..state
        }
    }
}
