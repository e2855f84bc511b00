pub mod appointments;
pub mod auth;
pub mod care;
pub mod customers;
pub mod employees;
pub mod home;
pub mod journey;
pub mod settings;

pub use appointments::{AppointmentsController, AppointmentsEffect, AppointmentsEvent, AppointmentsState};
pub use auth::{AuthController, AuthEffect, AuthEvent, AuthState};
pub use care::{CareRoutineController, CareRoutineEffect, CareRoutineEvent, CareRoutineState};
pub use customers::{CustomersController, CustomersEffect, CustomersEvent, CustomersState};
pub use employees::{EmployeesController, EmployeesEffect, EmployeesEvent, EmployeesState};
pub use home::{HomeController, HomeEffect, HomeEvent, HomeState};
pub use journey::{JourneyController, JourneyEffect, JourneyEvent, JourneyState};
pub use settings::{SettingsController, SettingsEffect, SettingsEvent, SettingsState};
