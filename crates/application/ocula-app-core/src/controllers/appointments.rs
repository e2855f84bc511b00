use std::sync::Arc;

use ocula_core::validation::validate_new_appointment;
use ocula_core::{Appointment, AppointmentStatus, NewAppointment};
use ocula_repository::{AppointmentRepository, RepositoryError};
use tracing::info;

use crate::app_core::{Controller, Scope};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentsState {
    pub is_loading: bool,
    /// Appointments matching `status_filter`, earliest first.
    pub appointments: Vec<Appointment>,
    pub status_filter: Option<AppointmentStatus>,
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum AppointmentsEvent {
    Load,
    FilterByStatus(Option<AppointmentStatus>),
    UpdateStatus {
        id: String,
        status: AppointmentStatus,
    },
    Book(NewAppointment),
    ClearError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentsEffect {
    ShowSuccess(String),
    ShowError(String),
}

type AppointmentsScope = Scope<AppointmentsState, AppointmentsEffect>;

pub struct AppointmentsController {
    repo: Arc<dyn AppointmentRepository>,
}

fn visible(all: &[Appointment], filter: Option<AppointmentStatus>) -> Vec<Appointment> {
    let mut out: Vec<Appointment> = all
        .iter()
        .filter(|a| filter.is_none_or(|f| a.status == f))
        .cloned()
        .collect();
    out.sort_by_key(|a| a.scheduled_at);
    out
}

impl AppointmentsController {
    pub fn new(repo: Arc<dyn AppointmentRepository>) -> Self {
        Self { repo }
    }

    fn fail(scope: &AppointmentsScope, e: RepositoryError) {
        let message = e.to_string();
        scope.update_state(|s| AppointmentsState {
            is_loading: false,
            error: Some(message.clone()),
            ..s
        });
        scope.send_effect(AppointmentsEffect::ShowError(message));
    }

    /// Rebuilds the visible list from the repository snapshot under the current filter.
    fn refresh_from_snapshot(&self, scope: &AppointmentsScope) {
        let snapshot = self.repo.snapshot();
        scope.update_state(|s| AppointmentsState {
            is_loading: false,
            appointments: visible(&snapshot, s.status_filter),
            error: None,
            ..s
        });
    }

    fn start_loading(scope: &AppointmentsScope) {
        scope.update_state(|s| AppointmentsState {
            is_loading: true,
            error: None,
            ..s
        });
    }
}

#[async_trait::async_trait]
impl Controller for AppointmentsController {
    type State = AppointmentsState;
    type Event = AppointmentsEvent;
    type Effect = AppointmentsEffect;

    const NAME: &'static str = "appointments";

    async fn on_event(
        &mut self,
        event: AppointmentsEvent,
        scope: &AppointmentsScope,
    ) -> anyhow::Result<()> {
        match event {
            AppointmentsEvent::Load => {
                Self::start_loading(scope);
                match self.repo.list().await {
                    Ok(all) => scope.update_state(|s| AppointmentsState {
                        is_loading: false,
                        appointments: visible(&all, s.status_filter),
                        ..s
                    }),
                    Err(e) => Self::fail(scope, e),
                }
            }

            AppointmentsEvent::FilterByStatus(filter) => {
                scope.update_state(|s| AppointmentsState {
                    is_loading: true,
                    status_filter: filter,
                    error: None,
                    ..s
                });
                let res = match filter {
                    Some(status) => self.repo.filter_by_status(status).await,
                    None => self.repo.list().await.map(|all| all.to_vec()),
                };
                match res {
                    Ok(matching) => scope.update_state(|s| AppointmentsState {
                        is_loading: false,
                        appointments: visible(&matching, filter),
                        ..s
                    }),
                    Err(e) => Self::fail(scope, e),
                }
            }

            AppointmentsEvent::UpdateStatus { id, status } => {
                Self::start_loading(scope);
                match self.repo.update_status(&id, status).await {
                    Ok(updated) => {
                        info!(id = %updated.id, %status, "appointment status changed");
                        self.refresh_from_snapshot(scope);
                        scope.send_effect(AppointmentsEffect::ShowSuccess(format!(
                            "Appointment marked {status}"
                        )));
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }

            AppointmentsEvent::Book(new) => {
                if let Err(e) = validate_new_appointment(&new) {
                    scope.update_state(|s| AppointmentsState {
                        error: Some(e.to_string()),
                        ..s
                    });
                    return Ok(());
                }
                Self::start_loading(scope);
                match self.repo.add(new).await {
                    Ok(created) => {
                        info!(id = %created.id, "appointment booked");
                        self.refresh_from_snapshot(scope);
                        scope.send_effect(AppointmentsEffect::ShowSuccess(
                            "Appointment booked".into(),
                        ));
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }

            AppointmentsEvent::ClearError => {
                scope.update_state(|s| AppointmentsState { error: None, ..s })
            }
        }
        Ok(())
    }

    fn recover(state: AppointmentsState) -> AppointmentsState {
        AppointmentsState {
            is_loading: false,
            ..state
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use ocula_core::AppointmentKind;

    fn appt(id: &str, hours: i64, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.into(),
            customer_id: "c".into(),
            employee_id: "e".into(),
            kind: AppointmentKind::Fitting,
            scheduled_at: Utc::now() + Duration::hours(hours),
            duration_minutes: 30,
            status,
            notes: String::new(),
        }
    }

    #[test]
    fn visible_filters_and_orders_by_time() {
        let all = vec![
            appt("late", 10, AppointmentStatus::Scheduled),
            appt("done", 1, AppointmentStatus::Completed),
            appt("early", 2, AppointmentStatus::Scheduled),
        ];

        let ids: Vec<_> = visible(&all, None).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["done", "early", "late"]);

        let ids: Vec<_> = visible(&all, Some(AppointmentStatus::Scheduled))
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }
}
