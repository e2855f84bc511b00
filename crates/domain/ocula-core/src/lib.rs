use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod appointment;
pub mod care;
pub mod journey;
pub mod theme;
pub mod validation;

pub use appointment::{Appointment, AppointmentKind, AppointmentStatus, NewAppointment};
pub use care::{CareCategory, CareFrequency, CareInstruction, NewCareInstruction};
pub use journey::{JourneyMilestone, JourneyProgress, JourneyStage};
pub use theme::ThemeVariant;
pub use validation::ValidationError;

pub type UserId = String;
pub type CustomerId = String;
pub type EmployeeId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Clinician,
    Technician,
    Patient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    /// Set for patient accounts that map onto a customer record.
    pub customer_id: Option<CustomerId>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Never print the password, even at debug level.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EyeSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub affected_eye: EyeSide,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Case-insensitive match over name, email and phone. A blank query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.full_name.to_lowercase().contains(&q)
            || self.email.to_lowercase().contains(&q)
            || self.phone.contains(&q)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub affected_eye: EyeSide,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeRole {
    Ocularist,
    Assistant,
    Receptionist,
    Manager,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub email: String,
    pub role: EmployeeRole,
    pub active: bool,
}

impl Employee {
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        q.is_empty()
            || self.full_name.to_lowercase().contains(&q)
            || self.email.to_lowercase().contains(&q)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub full_name: String,
    pub email: String,
    pub role: EmployeeRole,
}

/// Measurements and appearance notes for one prosthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyeRecord {
    pub id: String,
    pub customer_id: CustomerId,
    pub side: EyeSide,
    pub iris_color: String,
    pub iris_diameter_mm: f32,
    pub pupil_diameter_mm: f32,
    pub sclera_shade: String,
    #[serde(default)]
    pub notes: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEyeRecord {
    pub customer_id: CustomerId,
    pub side: EyeSide,
    pub iris_color: String,
    pub iris_diameter_mm: f32,
    pub pupil_diameter_mm: f32,
    pub sclera_shade: String,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            id: "c1".into(),
            full_name: "Ada Lovelace".into(),
            email: "ada@example.test".into(),
            phone: "+44 555 0101".into(),
            date_of_birth: None,
            affected_eye: EyeSide::Left,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn customer_search_is_case_insensitive() {
        let c = customer();
        assert!(c.matches("ADA"));
        assert!(c.matches("example.TEST"));
        assert!(c.matches("0101"));
        assert!(c.matches("   "));
        assert!(!c.matches("grace"));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let c = Credentials::new("a@b.test", "hunter22");
        let printed = format!("{c:?}");
        assert!(printed.contains("a@b.test"));
        assert!(!printed.contains("hunter22"));
    }
}
