//! Synchronous input checks run by controllers before any repository call.

use ocula_config::MIN_PASSWORD_LENGTH;

use crate::{
    Credentials, Customer, NewAppointment, NewCareInstruction, NewCustomer, NewEmployee,
    NewEyeRecord, Registration,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Duration must be greater than zero")]
    InvalidDuration,
    #[error("Measurements must be positive")]
    InvalidMeasurement,
}

pub fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_credentials(c: &Credentials) -> Result<(), ValidationError> {
    if c.email.trim().is_empty() || c.password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    validate_email(&c.email)
}

pub fn validate_registration(r: &Registration) -> Result<(), ValidationError> {
    require(&r.full_name, "Full name")?;
    require(&r.email, "Email")?;
    validate_email(&r.email)?;
    validate_new_password(&r.password, &r.confirm_password)
}

pub fn validate_new_customer(c: &NewCustomer) -> Result<(), ValidationError> {
    require(&c.full_name, "Full name")?;
    require(&c.email, "Email")?;
    validate_email(&c.email)
}

pub fn validate_customer(c: &Customer) -> Result<(), ValidationError> {
    require(&c.full_name, "Full name")?;
    require(&c.email, "Email")?;
    validate_email(&c.email)
}

pub fn validate_new_employee(e: &NewEmployee) -> Result<(), ValidationError> {
    require(&e.full_name, "Full name")?;
    require(&e.email, "Email")?;
    validate_email(&e.email)
}

pub fn validate_new_appointment(a: &NewAppointment) -> Result<(), ValidationError> {
    require(&a.customer_id, "Customer")?;
    require(&a.employee_id, "Employee")?;
    if a.duration_minutes == 0 {
        return Err(ValidationError::InvalidDuration);
    }
    Ok(())
}

pub fn validate_new_care_instruction(c: &NewCareInstruction) -> Result<(), ValidationError> {
    require(&c.customer_id, "Patient")?;
    require(&c.title, "Title")
}

pub fn validate_new_eye_record(r: &NewEyeRecord) -> Result<(), ValidationError> {
    require(&r.customer_id, "Patient")?;
    require(&r.iris_color, "Iris color")?;
    let positive = |v: f32| v.is_finite() && v > 0.0;
    if !positive(r.iris_diameter_mm) || !positive(r.pupil_diameter_mm) {
        return Err(ValidationError::InvalidMeasurement);
    }
    Ok(())
}
