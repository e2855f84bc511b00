//! In-memory repositories standing in for the clinic backend.

mod appointments;
mod auth;
mod care;
mod customers;
mod employees;
mod eye_records;
mod journey;

pub use appointments::MockAppointmentRepository;
pub use auth::{Account, MockAuthRepository};
pub use care::MockCareInstructionRepository;
pub use customers::MockCustomerRepository;
pub use employees::MockEmployeeRepository;
pub use eye_records::MockEyeRecordRepository;
pub use journey::MockJourneyRepository;

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
