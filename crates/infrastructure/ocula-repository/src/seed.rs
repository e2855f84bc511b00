//! Demo records loaded by the `seeded` constructors.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use ocula_core::{
    Appointment, AppointmentKind, AppointmentStatus, CareCategory, CareFrequency,
    CareInstruction, Customer, Employee, EmployeeRole, EyeRecord, EyeSide, JourneyMilestone,
    JourneyStage, User, UserRole,
};

use crate::mock::Account;

pub const DEMO_ADMIN_EMAIL: &str = "admin@example.test";
pub const DEMO_ADMIN_PASSWORD: &str = "admin123";
pub const DEMO_PATIENT_EMAIL: &str = "jamie@example.test";
pub const DEMO_PATIENT_PASSWORD: &str = "patient123";

pub fn demo_accounts() -> Vec<Account> {
    vec![
        Account::new(
            User {
                id: "u1".into(),
                full_name: "Clinic Admin".into(),
                email: DEMO_ADMIN_EMAIL.into(),
                role: UserRole::Admin,
                customer_id: None,
            },
            DEMO_ADMIN_PASSWORD,
        ),
        Account::new(
            User {
                id: "u2".into(),
                full_name: "Jamie Rivera".into(),
                email: DEMO_PATIENT_EMAIL.into(),
                role: UserRole::Patient,
                customer_id: Some("1".into()),
            },
            DEMO_PATIENT_PASSWORD,
        ),
    ]
}

pub fn demo_customers(now: DateTime<Utc>) -> Vec<Customer> {
    let customer = |id: &str, name: &str, email: &str, phone: &str, eye, dob| Customer {
        id: id.into(),
        full_name: name.into(),
        email: email.into(),
        phone: phone.into(),
        date_of_birth: NaiveDate::from_ymd_opt(dob, 3, 14),
        affected_eye: eye,
        notes: String::new(),
        created_at: now - Duration::days(90),
    };
    vec![
        customer(
            "1",
            "Jamie Rivera",
            DEMO_PATIENT_EMAIL,
            "555-0101",
            EyeSide::Left,
            1988,
        ),
        customer(
            "2",
            "Morgan Lee",
            "morgan@example.test",
            "555-0102",
            EyeSide::Right,
            1975,
        ),
        customer(
            "3",
            "Sam Okafor",
            "sam@example.test",
            "555-0103",
            EyeSide::Left,
            2001,
        ),
    ]
}

pub fn demo_employees() -> Vec<Employee> {
    let employee = |id: &str, name: &str, email: &str, role| Employee {
        id: id.into(),
        full_name: name.into(),
        email: email.into(),
        role,
        active: true,
    };
    vec![
        employee(
            "1",
            "Dana Whitfield",
            "dana@example.test",
            EmployeeRole::Ocularist,
        ),
        employee(
            "2",
            "Priya Nair",
            "priya@example.test",
            EmployeeRole::Assistant,
        ),
        employee(
            "3",
            "Luis Romero",
            "luis@example.test",
            EmployeeRole::Receptionist,
        ),
    ]
}

pub fn demo_appointments(now: DateTime<Utc>) -> Vec<Appointment> {
    let appt = |id: &str, customer: &str, kind, offset_hours: i64, status| Appointment {
        id: id.into(),
        customer_id: customer.into(),
        employee_id: "1".into(),
        kind,
        scheduled_at: now + Duration::hours(offset_hours),
        duration_minutes: 45,
        status,
        notes: String::new(),
    };
    vec![
        appt(
            "1",
            "1",
            AppointmentKind::Fitting,
            24,
            AppointmentStatus::Scheduled,
        ),
        appt(
            "2",
            "2",
            AppointmentKind::Consultation,
            48,
            AppointmentStatus::Confirmed,
        ),
        appt(
            "3",
            "3",
            AppointmentKind::Polishing,
            -72,
            AppointmentStatus::Completed,
        ),
        appt(
            "4",
            "1",
            AppointmentKind::FollowUp,
            24 * 30,
            AppointmentStatus::Scheduled,
        ),
    ]
}

pub fn demo_care_instructions() -> Vec<CareInstruction> {
    let care = |id: &str, title: &str, description: &str, frequency, category| CareInstruction {
        id: id.into(),
        customer_id: "1".into(),
        title: title.into(),
        description: description.into(),
        frequency,
        category,
        completed: false,
        last_completed_at: None,
    };
    vec![
        care(
            "1",
            "Rinse prosthesis",
            "Rinse with saline solution and dry with a lint-free cloth.",
            CareFrequency::Daily,
            CareCategory::Cleaning,
        ),
        care(
            "2",
            "Lubricating drops",
            "Apply two drops in the morning and evening.",
            CareFrequency::Daily,
            CareCategory::Lubrication,
        ),
        care(
            "3",
            "Check for scratches",
            "Inspect the surface under good light.",
            CareFrequency::Weekly,
            CareCategory::Inspection,
        ),
    ]
}

pub fn demo_eye_records() -> Vec<EyeRecord> {
    vec![EyeRecord {
        id: "1".into(),
        customer_id: "1".into(),
        side: EyeSide::Left,
        iris_color: "Hazel".into(),
        iris_diameter_mm: 11.8,
        pupil_diameter_mm: 4.0,
        sclera_shade: "Warm white".into(),
        notes: String::new(),
        recorded_at: DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_000),
    }]
}

pub fn demo_milestones(now: DateTime<Utc>) -> Vec<JourneyMilestone> {
    let stages = [
        (JourneyStage::Consultation, "Initial consultation", true),
        (JourneyStage::Impression, "Socket impression", true),
        (JourneyStage::Sculpting, "Wax sculpting", false),
        (JourneyStage::Painting, "Iris painting", false),
        (JourneyStage::Fitting, "Final fitting", false),
        (JourneyStage::FollowUp, "Six week follow-up", false),
    ];
    stages
        .into_iter()
        .enumerate()
        .map(|(i, (stage, title, done))| JourneyMilestone {
            id: (i + 1).to_string(),
            customer_id: "1".into(),
            stage,
            title: title.into(),
            description: String::new(),
            target_date: Some((now + Duration::weeks(i as i64)).date_naive()),
            completed_at: done.then_some(now - Duration::days(30 - i as i64)),
        })
        .collect()
}
