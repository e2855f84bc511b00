use anyhow::{bail, Context, Result};
use ocula_app_core::{
    AppointmentsEvent, AuthEvent, AuthState, CareRoutineEvent, CareRoutineState, Controller,
    CustomersEvent, EmployeesEvent, JourneyEffect, JourneyEvent, JourneyState, OculaApplication,
    SettingsEvent, SettingsState, StateContainer,
};
use ocula_core::{
    Appointment, AppointmentStatus, Credentials, Customer, Employee, EmployeeRole, ThemeVariant,
};
use ocula_config::COMMAND_TIMEOUT;
use tracing::debug;

/// Sends `event` and returns the state once the controller has handled it.
/// Handlers that publish nothing still settle.
async fn dispatch<C: Controller>(
    container: &StateContainer<C>,
    event: C::Event,
) -> Result<C::State> {
    container.handle_event(event);
    tokio::time::timeout(COMMAND_TIMEOUT, container.flush())
        .await
        .with_context(|| format!("timed out waiting for {}", C::NAME))??;
    Ok(container.state())
}

fn check(error: Option<String>) -> Result<()> {
    match error {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

pub async fn cmd_login(app: &OculaApplication, email: String, password: String) -> Result<AuthState> {
    let auth = app.auth_controller();
    let state = dispatch(&auth, AuthEvent::Login(Credentials::new(email, password))).await?;
    check(state.error.clone())?;

    if let Some(user) = &state.user {
        println!(":: Signed in as {} ({:?})", user.full_name, user.role);
    }
    Ok(state)
}

pub async fn cmd_appointments(
    app: &OculaApplication,
    status: Option<AppointmentStatus>,
    complete: Option<String>,
) -> Result<Vec<Appointment>> {
    let appts = app.appointments_controller();

    if let Some(id) = complete {
        let state = dispatch(
            &appts,
            AppointmentsEvent::UpdateStatus {
                id: id.clone(),
                status: AppointmentStatus::Completed,
            },
        )
        .await?;
        check(state.error)?;
        println!(":: Appointment {id} marked completed");
    }

    let state = dispatch(&appts, AppointmentsEvent::FilterByStatus(status)).await?;
    check(state.error)?;

    match status {
        Some(st) => println!(":: {} {st} appointment(s)", state.appointments.len()),
        None => println!(":: {} appointment(s)", state.appointments.len()),
    }
    for a in &state.appointments {
        println!(
            "   [{}] {}  {:?} for customer {} ({} min, {})",
            a.id,
            a.scheduled_at.format("%Y-%m-%d %H:%M"),
            a.kind,
            a.customer_id,
            a.duration_minutes,
            a.status
        );
    }
    Ok(state.appointments)
}

pub async fn cmd_customers(app: &OculaApplication, search: Option<String>) -> Result<Vec<Customer>> {
    let customers = app.customers_controller();
    let query = search.unwrap_or_default();
    let state = dispatch(&customers, CustomersEvent::Search(query)).await?;
    check(state.error)?;

    println!(":: {} customer(s)", state.customers.len());
    for c in &state.customers {
        println!("   [{}] {} <{}> {}", c.id, c.full_name, c.email, c.phone);
    }
    Ok(state.customers)
}

pub async fn cmd_employees(app: &OculaApplication, role: Option<EmployeeRole>) -> Result<Vec<Employee>> {
    let employees = app.employees_controller();
    let state = dispatch(&employees, EmployeesEvent::FilterByRole(role)).await?;
    check(state.error)?;

    println!(":: {} employee(s)", state.employees.len());
    for e in &state.employees {
        let marker = if e.active { "" } else { " (inactive)" };
        println!("   [{}] {} {:?}{marker}", e.id, e.full_name, e.role);
    }
    Ok(state.employees)
}

pub async fn cmd_care(app: &OculaApplication, customer_id: String) -> Result<CareRoutineState> {
    let care = app.care_controller();
    let state = dispatch(&care, CareRoutineEvent::Load { customer_id }).await?;
    check(state.error.clone())?;

    println!(
        ":: {}/{} care task(s) done",
        state.completed_count,
        state.instructions.len()
    );
    for c in &state.instructions {
        let mark = if c.completed { 'x' } else { ' ' };
        println!("   [{mark}] {} ({:?}, {:?})", c.title, c.category, c.frequency);
    }
    Ok(state)
}

pub async fn cmd_journey(
    app: &OculaApplication,
    customer_id: String,
    complete: Option<String>,
) -> Result<JourneyState> {
    let journey = app.journey_controller();
    let mut effects = journey.subscribe_effects();

    if let Some(id) = complete {
        let state = dispatch(&journey, JourneyEvent::CompleteMilestone(id)).await?;
        check(state.error)?;
    }
    // Handled after the completion, so its effects are already out.
    let state = dispatch(&journey, JourneyEvent::Load { customer_id }).await?;
    check(state.error.clone())?;

    while let Ok(effect) = effects.try_recv() {
        debug!(?effect, "journey effect");
        match effect {
            JourneyEffect::MilestoneReached(title) => println!(":: Milestone reached: {title}"),
            JourneyEffect::JourneyComplete => println!(":: Journey complete!"),
            JourneyEffect::ShowError(message) => eprintln!("!! {message}"),
        }
    }

    match state.current_stage {
        Some(stage) => println!(":: {}% done, now at {stage:?}", state.progress_percent),
        None => println!(":: {}% done", state.progress_percent),
    }
    for m in &state.milestones {
        let mark = if m.is_completed() { 'x' } else { ' ' };
        println!("   [{mark}] {} {}", m.id, m.title);
    }
    Ok(state)
}

pub async fn cmd_theme(
    app: &OculaApplication,
    dark: Option<bool>,
    variant: Option<ThemeVariant>,
    reset: bool,
) -> Result<SettingsState> {
    let settings = app.settings_controller();
    let mut state = dispatch(&settings, SettingsEvent::Load).await?;
    check(state.error.clone())?;

    if reset {
        state = dispatch(&settings, SettingsEvent::ResetToDefaults).await?;
        check(state.error.clone())?;
    }
    if dark.is_some_and(|d| d != state.dark_mode) {
        state = dispatch(&settings, SettingsEvent::ToggleDarkMode).await?;
        check(state.error.clone())?;
    }
    if let Some(v) = variant {
        state = dispatch(&settings, SettingsEvent::SetThemeVariant(v)).await?;
        check(state.error.clone())?;
    }

    println!(
        ":: Theme: {} ({})",
        state.theme_variant,
        if state.dark_mode { "dark" } else { "light" }
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocula_repository::Latency;

    #[tokio::test]
    async fn dispatch_settles_when_nothing_is_published() {
        let app = OculaApplication::in_memory(Latency::NONE);
        let auth = app.auth_controller();
        let mut states = auth.subscribe_state();

        let state = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            dispatch(&auth, AuthEvent::RestoreSession),
        )
        .await
        .expect("dispatch waited for a state change")
        .unwrap();
        assert!(!state.is_authenticated);
        assert!(!states.has_changed().unwrap());
    }
}
