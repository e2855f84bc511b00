use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use ocula_persistence::{
    InMemoryPreferenceStore, JsonFilePreferenceStore, PreferenceStore, ThemePreferences,
};
use ocula_repository::mock::{
    MockAppointmentRepository, MockAuthRepository, MockCareInstructionRepository,
    MockCustomerRepository, MockEmployeeRepository, MockEyeRecordRepository,
    MockJourneyRepository,
};
use ocula_repository::{
    AppointmentRepository, AuthRepository, CareInstructionRepository, CustomerRepository,
    EmployeeRepository, EyeRecordRepository, JourneyRepository, Latency,
};
use tracing::info;

use crate::app_core::StateContainer;
use crate::controllers::{
    AppointmentsController, AuthController, CareRoutineController, CustomersController,
    EmployeesController, HomeController, JourneyController, SettingsController,
};

/// Data sources shared by every controller for the life of the process.
#[derive(Clone)]
pub struct Repositories {
    pub auth: Arc<dyn AuthRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub care: Arc<dyn CareInstructionRepository>,
    pub eye_records: Arc<dyn EyeRecordRepository>,
    pub journey: Arc<dyn JourneyRepository>,
}

impl Repositories {
    /// Mock repositories filled with the demo clinic, dated relative to `now`.
    pub fn seeded(now: DateTime<Utc>, latency: Latency) -> Self {
        Self {
            auth: Arc::new(MockAuthRepository::seeded(latency)),
            appointments: Arc::new(MockAppointmentRepository::seeded(now, latency)),
            customers: Arc::new(MockCustomerRepository::seeded(now, latency)),
            employees: Arc::new(MockEmployeeRepository::seeded(latency)),
            care: Arc::new(MockCareInstructionRepository::seeded(latency)),
            eye_records: Arc::new(MockEyeRecordRepository::seeded(latency)),
            journey: Arc::new(MockJourneyRepository::seeded(now, latency)),
        }
    }
}

/// Composition root. Wires repositories and preferences into controllers;
/// each `*_controller` call starts a fresh, independent controller task.
pub struct OculaApplication {
    repos: Repositories,
    prefs: Arc<ThemePreferences>,
}

impl OculaApplication {
    pub fn new(repos: Repositories, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            repos,
            prefs: Arc::new(ThemePreferences::new(store)),
        }
    }

    /// Seeded repositories and a preference store that lives only as long as the process.
    pub fn in_memory(latency: Latency) -> Self {
        Self::new(
            Repositories::seeded(Utc::now(), latency),
            Arc::new(InMemoryPreferenceStore::new()),
        )
    }

    /// Seeded repositories with preferences persisted at `prefs_path`.
    pub fn with_preferences_file(prefs_path: &Path, latency: Latency) -> anyhow::Result<Self> {
        let store = JsonFilePreferenceStore::open(prefs_path)
            .with_context(|| format!("failed to open preferences at {}", prefs_path.display()))?;
        info!(path = %prefs_path.display(), "using file preferences");
        Ok(Self::new(
            Repositories::seeded(Utc::now(), latency),
            Arc::new(store),
        ))
    }

    /// Seeded repositories with preferences in the platform config directory.
    pub fn with_default_preferences(latency: Latency) -> anyhow::Result<Self> {
        let store = JsonFilePreferenceStore::open_default()
            .context("failed to open default preferences")?;
        info!(path = %store.path().display(), "using file preferences");
        Ok(Self::new(
            Repositories::seeded(Utc::now(), latency),
            Arc::new(store),
        ))
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub fn preferences(&self) -> Arc<ThemePreferences> {
        self.prefs.clone()
    }

    pub fn auth_controller(&self) -> StateContainer<AuthController> {
        StateContainer::spawn(AuthController::new(self.repos.auth.clone()))
    }

    pub fn home_controller(&self) -> StateContainer<HomeController> {
        StateContainer::spawn(HomeController::new(
            self.repos.appointments.clone(),
            self.repos.customers.clone(),
            self.repos.care.clone(),
        ))
    }

    pub fn appointments_controller(&self) -> StateContainer<AppointmentsController> {
        StateContainer::spawn(AppointmentsController::new(self.repos.appointments.clone()))
    }

    pub fn customers_controller(&self) -> StateContainer<CustomersController> {
        StateContainer::spawn(CustomersController::new(
            self.repos.customers.clone(),
            self.repos.eye_records.clone(),
        ))
    }

    pub fn employees_controller(&self) -> StateContainer<EmployeesController> {
        StateContainer::spawn(EmployeesController::new(self.repos.employees.clone()))
    }

    pub fn care_controller(&self) -> StateContainer<CareRoutineController> {
        StateContainer::spawn(CareRoutineController::new(self.repos.care.clone()))
    }

    pub fn journey_controller(&self) -> StateContainer<JourneyController> {
        StateContainer::spawn(JourneyController::new(self.repos.journey.clone()))
    }

    pub fn settings_controller(&self) -> StateContainer<SettingsController> {
        StateContainer::spawn(SettingsController::new(self.prefs.clone()))
    }
}
