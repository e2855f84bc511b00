use std::sync::Arc;

use chrono::{DateTime, Utc};
use ocula_core::{
    Appointment, AppointmentStatus, CareCategory, CareInstruction, Credentials, Customer,
    Employee, EmployeeRole, EyeRecord, JourneyMilestone, NewAppointment, NewCareInstruction,
    NewCustomer, NewEmployee, NewEyeRecord, Registration, User,
};
use tokio::sync::watch;

use crate::RepoResult;

pub type Collection<T> = Arc<Vec<T>>;

#[async_trait::async_trait]
pub trait AuthRepository: Send + Sync + 'static {
    async fn login(&self, credentials: &Credentials) -> RepoResult<User>;
    async fn register(&self, registration: &Registration) -> RepoResult<User>;
    async fn logout(&self) -> RepoResult<()>;
    async fn request_password_reset(&self, email: &str) -> RepoResult<()>;

    fn current_user(&self) -> Option<User>;
    fn observe_session(&self) -> watch::Receiver<Option<User>>;
}

#[async_trait::async_trait]
pub trait AppointmentRepository: Send + Sync + 'static {
    fn observe(&self) -> watch::Receiver<Collection<Appointment>>;
    fn snapshot(&self) -> Collection<Appointment>;

    async fn list(&self) -> RepoResult<Collection<Appointment>>;
    async fn get(&self, id: &str) -> RepoResult<Appointment>;
    async fn add(&self, appointment: NewAppointment) -> RepoResult<Appointment>;
    async fn update_status(&self, id: &str, status: AppointmentStatus) -> RepoResult<Appointment>;
    async fn filter_by_status(&self, status: AppointmentStatus) -> RepoResult<Vec<Appointment>>;
    async fn for_customer(&self, customer_id: &str) -> RepoResult<Vec<Appointment>>;

    fn count_by_status(&self, status: AppointmentStatus) -> usize;
    /// Open appointments at or after `now`, earliest first.
    fn upcoming(&self, now: DateTime<Utc>, limit: usize) -> Vec<Appointment>;
}

#[async_trait::async_trait]
pub trait CustomerRepository: Send + Sync + 'static {
    fn observe(&self) -> watch::Receiver<Collection<Customer>>;
    fn snapshot(&self) -> Collection<Customer>;

    async fn list(&self) -> RepoResult<Collection<Customer>>;
    async fn get(&self, id: &str) -> RepoResult<Customer>;
    async fn add(&self, customer: NewCustomer) -> RepoResult<Customer>;
    async fn update(&self, customer: Customer) -> RepoResult<Customer>;
    async fn search(&self, query: &str) -> RepoResult<Vec<Customer>>;

    fn count(&self) -> usize;
}

#[async_trait::async_trait]
pub trait EmployeeRepository: Send + Sync + 'static {
    fn observe(&self) -> watch::Receiver<Collection<Employee>>;
    fn snapshot(&self) -> Collection<Employee>;

    async fn list(&self) -> RepoResult<Collection<Employee>>;
    async fn add(&self, employee: NewEmployee) -> RepoResult<Employee>;
    async fn set_active(&self, id: &str, active: bool) -> RepoResult<Employee>;
    async fn search(&self, query: &str) -> RepoResult<Vec<Employee>>;
    async fn filter_by_role(&self, role: EmployeeRole) -> RepoResult<Vec<Employee>>;
}

#[async_trait::async_trait]
pub trait CareInstructionRepository: Send + Sync + 'static {
    fn observe(&self) -> watch::Receiver<Collection<CareInstruction>>;

    async fn for_customer(&self, customer_id: &str) -> RepoResult<Vec<CareInstruction>>;
    async fn add(&self, instruction: NewCareInstruction) -> RepoResult<CareInstruction>;
    async fn toggle_completed(&self, id: &str, now: DateTime<Utc>) -> RepoResult<CareInstruction>;
    async fn filter_by_category(
        &self,
        customer_id: &str,
        category: CareCategory,
    ) -> RepoResult<Vec<CareInstruction>>;

    /// Instructions not yet marked completed, across all customers.
    fn count_open(&self) -> usize;
}

#[async_trait::async_trait]
pub trait EyeRecordRepository: Send + Sync + 'static {
    fn observe(&self) -> watch::Receiver<Collection<EyeRecord>>;

    async fn for_customer(&self, customer_id: &str) -> RepoResult<Vec<EyeRecord>>;
    async fn add(&self, record: NewEyeRecord) -> RepoResult<EyeRecord>;
}

#[async_trait::async_trait]
pub trait JourneyRepository: Send + Sync + 'static {
    fn observe(&self) -> watch::Receiver<Collection<JourneyMilestone>>;

    async fn for_customer(&self, customer_id: &str) -> RepoResult<Vec<JourneyMilestone>>;
    async fn complete(&self, id: &str, now: DateTime<Utc>) -> RepoResult<JourneyMilestone>;
}
