use std::sync::Arc;

use chrono::Utc;
use ocula_core::{Appointment, AppointmentStatus};
use ocula_repository::{AppointmentRepository, CareInstructionRepository, CustomerRepository};

use crate::app_core::{Controller, Scope};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeState {
    pub is_loading: bool,
    pub upcoming: Vec<Appointment>,
    pub open_care_tasks: usize,
    pub customer_count: usize,
    pub completed_today: usize,
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum HomeEvent {
    Refresh,
    OpenAppointment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeEffect {
    NavigateToAppointment(String),
    ShowError(String),
}

/// Dashboard summary across appointments, patients and care tasks.
pub struct HomeController {
    appointments: Arc<dyn AppointmentRepository>,
    customers: Arc<dyn CustomerRepository>,
    care: Arc<dyn CareInstructionRepository>,
}

impl HomeController {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        customers: Arc<dyn CustomerRepository>,
        care: Arc<dyn CareInstructionRepository>,
    ) -> Self {
        Self {
            appointments,
            customers,
            care,
        }
    }
}

#[async_trait::async_trait]
impl Controller for HomeController {
    type State = HomeState;
    type Event = HomeEvent;
    type Effect = HomeEffect;

    const NAME: &'static str = "home";

    async fn on_event(
        &mut self,
        event: HomeEvent,
        scope: &Scope<HomeState, HomeEffect>,
    ) -> anyhow::Result<()> {
        match event {
            HomeEvent::Refresh => {
                scope.update_state(|s| HomeState {
                    is_loading: true,
                    error: None,
                    ..s
                });

                match self.appointments.list().await {
                    Ok(all) => {
                        let now = Utc::now();
                        let today = now.date_naive();
                        let completed_today = all
                            .iter()
                            .filter(|a| {
                                a.status == AppointmentStatus::Completed
                                    && a.scheduled_at.date_naive() == today
                            })
                            .count();
                        let upcoming = self
                            .appointments
                            .upcoming(now, ocula_config::UPCOMING_APPOINTMENTS_LIMIT);
                        let customer_count = self.customers.count();
                        let open_care_tasks = self.care.count_open();
                        scope.update_state(|_| HomeState {
                            is_loading: false,
                            upcoming,
                            open_care_tasks,
                            customer_count,
                            completed_today,
                            error: None,
                        });
                    }
                    Err(e) => {
                        let message = e.to_string();
                        scope.update_state(|s| HomeState {
                            is_loading: false,
                            error: Some(message.clone()),
                            ..s
                        });
                        scope.send_effect(HomeEffect::ShowError(message));
                    }
                }
            }

            HomeEvent::OpenAppointment(id) => {
                let known = self.appointments.snapshot().iter().any(|a| a.id == id);
                if known {
                    scope.send_effect(HomeEffect::NavigateToAppointment(id));
                } else {
                    scope.send_effect(HomeEffect::ShowError(format!(
                        "Appointment '{id}' not found"
                    )));
                }
            }
        }
        Ok(())
    }

    fn recover(state: HomeState) -> HomeState {
        HomeState {
            is_loading: false,
            ..state
        }
    }
}
