use std::sync::Arc;

use ocula_core::validation::validate_new_employee;
use ocula_core::{Employee, EmployeeRole, NewEmployee};
use ocula_repository::{EmployeeRepository, RepositoryError};

use crate::app_core::{Controller, Scope};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeesState {
    pub is_loading: bool,
    pub query: String,
    pub role_filter: Option<EmployeeRole>,
    pub employees: Vec<Employee>,
    pub error: Option<String>,
}

impl EmployeesState {
    fn admits(&self, e: &Employee) -> bool {
        e.matches(&self.query) && self.role_filter.is_none_or(|r| e.role == r)
    }

    fn filtered(&self, all: &[Employee]) -> Vec<Employee> {
        all.iter().filter(|e| self.admits(e)).cloned().collect()
    }
}

#[derive(Debug)]
pub enum EmployeesEvent {
    Load,
    Search(String),
    FilterByRole(Option<EmployeeRole>),
    Add(NewEmployee),
    SetActive { id: String, active: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeesEffect {
    ShowSuccess(String),
    ShowError(String),
}

type EmployeesScope = Scope<EmployeesState, EmployeesEffect>;

pub struct EmployeesController {
    repo: Arc<dyn EmployeeRepository>,
}

impl EmployeesController {
    pub fn new(repo: Arc<dyn EmployeeRepository>) -> Self {
        Self { repo }
    }

    fn fail(scope: &EmployeesScope, e: RepositoryError) {
        let message = e.to_string();
        scope.update_state(|s| EmployeesState {
            is_loading: false,
            error: Some(message.clone()),
            ..s
        });
        scope.send_effect(EmployeesEffect::ShowError(message));
    }

    fn show(scope: &EmployeesScope, candidates: &[Employee]) {
        scope.update_state(|s| EmployeesState {
            is_loading: false,
            employees: s.filtered(candidates),
            ..s
        });
    }
}

#[async_trait::async_trait]
impl Controller for EmployeesController {
    type State = EmployeesState;
    type Event = EmployeesEvent;
    type Effect = EmployeesEffect;

    const NAME: &'static str = "employees";

    async fn on_event(
        &mut self,
        event: EmployeesEvent,
        scope: &EmployeesScope,
    ) -> anyhow::Result<()> {
        match event {
            EmployeesEvent::Load => {
                scope.update_state(|s| EmployeesState {
                    is_loading: true,
                    error: None,
                    ..s
                });
                match self.repo.list().await {
                    Ok(all) => Self::show(scope, &all),
                    Err(e) => Self::fail(scope, e),
                }
            }

            EmployeesEvent::Search(query) => {
                scope.update_state(|s| EmployeesState {
                    is_loading: true,
                    query: query.clone(),
                    error: None,
                    ..s
                });
                match self.repo.search(&query).await {
                    Ok(found) => Self::show(scope, &found),
                    Err(e) => Self::fail(scope, e),
                }
            }

            EmployeesEvent::FilterByRole(role) => {
                scope.update_state(|s| EmployeesState {
                    is_loading: true,
                    role_filter: role,
                    error: None,
                    ..s
                });
                let res = match role {
                    Some(r) => self.repo.filter_by_role(r).await,
                    None => self.repo.list().await.map(|all| all.to_vec()),
                };
                match res {
                    Ok(found) => Self::show(scope, &found),
                    Err(e) => Self::fail(scope, e),
                }
            }

            EmployeesEvent::Add(new) => {
                if let Err(e) = validate_new_employee(&new) {
                    scope.update_state(|s| EmployeesState {
                        error: Some(e.to_string()),
                        ..s
                    });
                    return Ok(());
                }
                scope.update_state(|s| EmployeesState {
                    is_loading: true,
                    error: None,
                    ..s
                });
                match self.repo.add(new).await {
                    Ok(created) => {
                        Self::show(scope, &self.repo.snapshot());
                        scope.send_effect(EmployeesEffect::ShowSuccess(format!(
                            "{} added",
                            created.full_name
                        )));
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }

            EmployeesEvent::SetActive { id, active } => {
                scope.update_state(|s| EmployeesState {
                    is_loading: true,
                    error: None,
                    ..s
                });
                match self.repo.set_active(&id, active).await {
                    Ok(updated) => {
                        Self::show(scope, &self.repo.snapshot());
                        let verb = if active { "reactivated" } else { "deactivated" };
                        scope.send_effect(EmployeesEffect::ShowSuccess(format!(
                            "{} {verb}",
                            updated.full_name
                        )));
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }
        }
        Ok(())
    }

    fn recover(state: EmployeesState) -> EmployeesState {
        EmployeesState {
            is_loading: false,
            ..state
        }
    }
}
