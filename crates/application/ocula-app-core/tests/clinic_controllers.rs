use chrono::Utc;
use ocula_app_core::{
    AppointmentsEffect, AppointmentsEvent, CareRoutineEffect, CareRoutineEvent, CustomersEffect,
    CustomersEvent, EmployeesEffect, EmployeesEvent, HomeEffect, HomeEvent, JourneyEffect,
    JourneyEvent, JourneyState, OculaApplication,
};
use ocula_core::{
    AppointmentKind, AppointmentStatus, CareCategory, CareFrequency, EmployeeRole, EyeSide,
    JourneyStage, NewAppointment, NewCareInstruction, NewCustomer, NewEmployee, NewEyeRecord,
};
use ocula_repository::Latency;

fn app() -> OculaApplication {
    OculaApplication::in_memory(Latency::NONE)
}

#[tokio::test]
async fn updating_a_status_replaces_only_that_appointment() {
    let app = app();
    let before = app.repositories().appointments.snapshot();
    let appts = app.appointments_controller();
    let mut effects = appts.subscribe_effects();

    appts.handle_event(AppointmentsEvent::UpdateStatus {
        id: "1".into(),
        status: AppointmentStatus::Completed,
    });
    assert_eq!(
        effects.recv().await.unwrap(),
        AppointmentsEffect::ShowSuccess("Appointment marked completed".into())
    );

    let after = app.repositories().appointments.snapshot();
    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(after.iter()) {
        if old.id == "1" {
            assert_eq!(new.status, AppointmentStatus::Completed);
        } else {
            assert_eq!(old, new);
        }
    }
    // The earlier snapshot is untouched.
    assert_eq!(before[0].status, AppointmentStatus::Scheduled);

    let s = appts.state();
    assert!(!s.is_loading);
    let shown = s.appointments.iter().find(|a| a.id == "1").unwrap();
    assert_eq!(shown.status, AppointmentStatus::Completed);
}

#[tokio::test]
async fn status_filter_and_unknown_ids() {
    let app = app();
    let appts = app.appointments_controller();
    let mut effects = appts.subscribe_effects();

    appts.handle_event(AppointmentsEvent::FilterByStatus(Some(
        AppointmentStatus::Scheduled,
    )));
    let s = appts
        .wait_for(|s| s.status_filter.is_some() && !s.is_loading)
        .await
        .unwrap();
    let ids: Vec<_> = s.appointments.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["1", "4"]);

    appts.handle_event(AppointmentsEvent::UpdateStatus {
        id: "nope".into(),
        status: AppointmentStatus::Cancelled,
    });
    assert!(matches!(
        effects.recv().await.unwrap(),
        AppointmentsEffect::ShowError(_)
    ));
    let s = appts.state();
    assert!(!s.is_loading);
    assert!(s.error.is_some());
}

#[tokio::test]
async fn booking_requires_a_duration() {
    let app = app();
    let appts = app.appointments_controller();
    let count = app.repositories().appointments.snapshot().len();

    appts.handle_event(AppointmentsEvent::Book(NewAppointment {
        customer_id: "2".into(),
        employee_id: "1".into(),
        kind: AppointmentKind::Consultation,
        scheduled_at: Utc::now(),
        duration_minutes: 0,
        notes: String::new(),
    }));
    let s = appts.wait_for(|s| s.error.is_some()).await.unwrap();
    assert_eq!(s.error.as_deref(), Some("Duration must be greater than zero"));
    assert_eq!(app.repositories().appointments.snapshot().len(), count);
}

#[tokio::test]
async fn customer_search_select_and_measure() {
    let app = app();
    let customers = app.customers_controller();
    let mut effects = customers.subscribe_effects();

    customers.handle_event(CustomersEvent::Search("MORGAN".into()));
    let s = customers
        .wait_for(|s| s.query == "MORGAN" && !s.is_loading)
        .await
        .unwrap();
    assert_eq!(s.customers.len(), 1);
    assert_eq!(s.customers[0].id, "2");

    customers.handle_event(CustomersEvent::Search("  ".into()));
    let s = customers
        .wait_for(|s| s.query == "  " && !s.is_loading)
        .await
        .unwrap();
    assert_eq!(s.customers.len(), 3);

    customers.handle_event(CustomersEvent::Select("1".into()));
    assert_eq!(
        effects.recv().await.unwrap(),
        CustomersEffect::NavigateToCustomer("1".into())
    );
    let s = customers.state();
    assert_eq!(s.selected.as_ref().map(|c| c.id.as_str()), Some("1"));
    assert_eq!(s.eye_records.len(), 1);

    customers.handle_event(CustomersEvent::AddEyeRecord(NewEyeRecord {
        customer_id: "1".into(),
        side: EyeSide::Left,
        iris_color: "Green".into(),
        iris_diameter_mm: 12.0,
        pupil_diameter_mm: 3.5,
        sclera_shade: "Ivory".into(),
        notes: String::new(),
    }));
    assert_eq!(
        effects.recv().await.unwrap(),
        CustomersEffect::ShowSuccess("Eye record saved".into())
    );
    let s = customers.state();
    assert_eq!(s.eye_records.len(), 2);
    assert_eq!(s.eye_records[0].iris_color, "Green");
}

#[tokio::test]
async fn adding_a_customer_validates_first() {
    let app = app();
    let customers = app.customers_controller();
    let mut effects = customers.subscribe_effects();

    let mut new = NewCustomer {
        full_name: "Robin Hart".into(),
        email: "robin(at)example".into(),
        phone: "555-0199".into(),
        date_of_birth: None,
        affected_eye: EyeSide::Right,
        notes: String::new(),
    };
    customers.handle_event(CustomersEvent::Add(new.clone()));
    let s = customers.wait_for(|s| s.error.is_some()).await.unwrap();
    assert_eq!(s.error.as_deref(), Some("Enter a valid email address"));
    assert_eq!(app.repositories().customers.count(), 3);

    new.email = "robin@example.test".into();
    customers.handle_event(CustomersEvent::Add(new));
    assert_eq!(
        effects.recv().await.unwrap(),
        CustomersEffect::ShowSuccess("Customer added".into())
    );
    assert!(matches!(
        effects.recv().await.unwrap(),
        CustomersEffect::NavigateToCustomer(_)
    ));
    let s = customers.state();
    assert_eq!(s.error, None);
    assert_eq!(s.customers.len(), 4);
    assert_eq!(app.repositories().customers.count(), 4);
}

#[tokio::test]
async fn employees_filter_and_deactivate() {
    let app = app();
    let employees = app.employees_controller();
    let mut effects = employees.subscribe_effects();

    employees.handle_event(EmployeesEvent::FilterByRole(Some(EmployeeRole::Ocularist)));
    let s = employees
        .wait_for(|s| s.role_filter.is_some() && !s.is_loading)
        .await
        .unwrap();
    assert!(s.employees.iter().all(|e| e.role == EmployeeRole::Ocularist));
    assert!(!s.employees.is_empty());

    employees.handle_event(EmployeesEvent::SetActive {
        id: "1".into(),
        active: false,
    });
    assert_eq!(
        effects.recv().await.unwrap(),
        EmployeesEffect::ShowSuccess("Dana Whitfield deactivated".into())
    );
    let s = employees.state();
    let dana = s.employees.iter().find(|e| e.id == "1").unwrap();
    assert!(!dana.active);

    employees.handle_event(EmployeesEvent::Add(NewEmployee {
        full_name: String::new(),
        email: "x@example.test".into(),
        role: EmployeeRole::Assistant,
    }));
    let s = employees.wait_for(|s| s.error.is_some()).await.unwrap();
    assert_eq!(s.error.as_deref(), Some("Full name is required"));
}

#[tokio::test]
async fn care_routine_counts_completed_tasks() {
    let app = app();
    let care = app.care_controller();
    let mut effects = care.subscribe_effects();

    care.handle_event(CareRoutineEvent::FilterByCategory(Some(CareCategory::Cleaning)));
    let s = care.wait_for(|s| s.error.is_some()).await.unwrap();
    assert_eq!(s.error.as_deref(), Some("Select a patient first"));

    care.handle_event(CareRoutineEvent::Load {
        customer_id: "1".into(),
    });
    let s = care
        .wait_for(|s| !s.is_loading && s.instructions.len() == 3)
        .await
        .unwrap();
    assert_eq!(s.completed_count, 0);
    assert_eq!(s.error, None);

    care.handle_event(CareRoutineEvent::ToggleCompleted("1".into()));
    assert_eq!(
        effects.recv().await.unwrap(),
        CareRoutineEffect::ShowSuccess("Rinse prosthesis done".into())
    );
    assert_eq!(care.state().completed_count, 1);
    assert_eq!(app.repositories().care.count_open(), 2);

    care.handle_event(CareRoutineEvent::Add(NewCareInstruction {
        customer_id: "1".into(),
        title: "Polish at clinic".into(),
        description: String::new(),
        frequency: CareFrequency::AsNeeded,
        category: CareCategory::Cleaning,
    }));
    effects.recv().await.unwrap();

    care.handle_event(CareRoutineEvent::FilterByCategory(Some(CareCategory::Cleaning)));
    let s = care
        .wait_for(|s| s.category_filter.is_some() && !s.is_loading)
        .await
        .unwrap();
    assert_eq!(s.instructions.len(), 2);
    assert_eq!(s.completed_count, 1);
}

#[tokio::test]
async fn journey_progress_and_milestone_effects() {
    let app = app();
    let journey = app.journey_controller();
    let mut effects = journey.subscribe_effects();

    journey.handle_event(JourneyEvent::Load {
        customer_id: "1".into(),
    });
    let s = journey
        .wait_for(|s| !s.is_loading && !s.milestones.is_empty())
        .await
        .unwrap();
    assert_eq!(s.progress_percent, 33);
    assert_eq!(s.current_stage, Some(JourneyStage::Sculpting));

    // Already done: no effect.
    journey.handle_event(JourneyEvent::CompleteMilestone("1".into()));
    for id in ["3", "4", "5", "6"] {
        journey.handle_event(JourneyEvent::CompleteMilestone(id.into()));
    }

    let mut reached = Vec::new();
    loop {
        match effects.recv().await.unwrap() {
            JourneyEffect::MilestoneReached(title) => reached.push(title),
            JourneyEffect::JourneyComplete => break,
            other => panic!("unexpected effect {other:?}"),
        }
    }
    assert_eq!(
        reached,
        [
            "Wax sculpting",
            "Iris painting",
            "Final fitting",
            "Six week follow-up"
        ]
    );
    let s = journey.state();
    assert_eq!(s.progress_percent, 100);
    assert_eq!(s.current_stage, None);

    journey.handle_event(JourneyEvent::Reset);
    let s = journey.wait_for(|s| s.milestones.is_empty()).await.unwrap();
    assert_eq!(s, JourneyState::default());
}

#[tokio::test]
async fn home_summarizes_the_clinic() {
    let app = app();
    let home = app.home_controller();
    let mut effects = home.subscribe_effects();

    home.handle_event(HomeEvent::Refresh);
    let s = home
        .wait_for(|s| !s.is_loading && s.customer_count > 0)
        .await
        .unwrap();
    assert_eq!(s.customer_count, 3);
    assert_eq!(s.open_care_tasks, 3);
    let ids: Vec<_> = s.upcoming.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "4"]);

    home.handle_event(HomeEvent::OpenAppointment("2".into()));
    assert_eq!(
        effects.recv().await.unwrap(),
        HomeEffect::NavigateToAppointment("2".into())
    );
    home.handle_event(HomeEvent::OpenAppointment("99".into()));
    assert!(matches!(
        effects.recv().await.unwrap(),
        HomeEffect::ShowError(_)
    ));
}
