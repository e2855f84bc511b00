use chrono::{DateTime, Utc};
use ocula_core::{Appointment, AppointmentStatus, NewAppointment};
use tokio::sync::watch;
use tracing::info;

use crate::{
    AppointmentRepository, Collection, Latency, ObservableList, RepoResult, RepositoryError,
};

pub struct MockAppointmentRepository {
    items: ObservableList<Appointment>,
    latency: Latency,
}

impl MockAppointmentRepository {
    pub fn new(items: Vec<Appointment>, latency: Latency) -> Self {
        Self {
            items: ObservableList::new(items),
            latency,
        }
    }

    pub fn seeded(now: DateTime<Utc>, latency: Latency) -> Self {
        Self::new(crate::seed::demo_appointments(now), latency)
    }
}

#[async_trait::async_trait]
impl AppointmentRepository for MockAppointmentRepository {
    fn observe(&self) -> watch::Receiver<Collection<Appointment>> {
        self.items.observe()
    }

    fn snapshot(&self) -> Collection<Appointment> {
        self.items.snapshot()
    }

    async fn list(&self) -> RepoResult<Collection<Appointment>> {
        self.latency.simulate().await;
        Ok(self.items.snapshot())
    }

    async fn get(&self, id: &str) -> RepoResult<Appointment> {
        self.latency.simulate().await;
        self.items
            .query(|items| items.iter().find(|a| a.id == id).cloned())
            .ok_or_else(|| RepositoryError::not_found("Appointment", id))
    }

    async fn add(&self, appointment: NewAppointment) -> RepoResult<Appointment> {
        self.latency.simulate().await;
        let created = Appointment {
            id: super::new_id(),
            customer_id: appointment.customer_id,
            employee_id: appointment.employee_id,
            kind: appointment.kind,
            scheduled_at: appointment.scheduled_at,
            duration_minutes: appointment.duration_minutes,
            status: AppointmentStatus::Scheduled,
            notes: appointment.notes,
        };
        self.items.push(created.clone());
        info!(id = %created.id, "appointment booked");
        Ok(created)
    }

    async fn update_status(&self, id: &str, status: AppointmentStatus) -> RepoResult<Appointment> {
        self.latency.simulate().await;
        self.items.try_update(|items| {
            let appt = items
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| RepositoryError::not_found("Appointment", id))?;
            appt.status = status;
            Ok(appt.clone())
        })
    }

    async fn filter_by_status(&self, status: AppointmentStatus) -> RepoResult<Vec<Appointment>> {
        self.latency.simulate().await;
        Ok(self.items.query(|items| {
            items
                .iter()
                .filter(|a| a.status == status)
                .cloned()
                .collect()
        }))
    }

    async fn for_customer(&self, customer_id: &str) -> RepoResult<Vec<Appointment>> {
        self.latency.simulate().await;
        Ok(self.items.query(|items| {
            items
                .iter()
                .filter(|a| a.customer_id == customer_id)
                .cloned()
                .collect()
        }))
    }

    fn count_by_status(&self, status: AppointmentStatus) -> usize {
        self.items
            .query(|items| items.iter().filter(|a| a.status == status).count())
    }

    fn upcoming(&self, now: DateTime<Utc>, limit: usize) -> Vec<Appointment> {
        let mut open: Vec<Appointment> = self.items.query(|items| {
            items
                .iter()
                .filter(|a| a.status.is_open() && a.scheduled_at >= now)
                .cloned()
                .collect()
        });
        open.sort_by_key(|a| a.scheduled_at);
        open.truncate(limit);
        open
    }
}
