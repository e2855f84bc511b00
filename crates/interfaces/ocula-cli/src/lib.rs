pub mod commands;

use clap::ValueEnum;
use ocula_core::{AppointmentStatus, EmployeeRole, ThemeVariant};

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl From<CliStatus> for AppointmentStatus {
    fn from(s: CliStatus) -> Self {
        match s {
            CliStatus::Scheduled => AppointmentStatus::Scheduled,
            CliStatus::Confirmed => AppointmentStatus::Confirmed,
            CliStatus::Completed => AppointmentStatus::Completed,
            CliStatus::Cancelled => AppointmentStatus::Cancelled,
            CliStatus::NoShow => AppointmentStatus::NoShow,
        }
    }
}

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliRole {
    Ocularist,
    Assistant,
    Receptionist,
    Manager,
}

impl From<CliRole> for EmployeeRole {
    fn from(r: CliRole) -> Self {
        match r {
            CliRole::Ocularist => EmployeeRole::Ocularist,
            CliRole::Assistant => EmployeeRole::Assistant,
            CliRole::Receptionist => EmployeeRole::Receptionist,
            CliRole::Manager => EmployeeRole::Manager,
        }
    }
}

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliTheme {
    Ocean,
    Forest,
    Sunset,
    Monochrome,
}

impl From<CliTheme> for ThemeVariant {
    fn from(t: CliTheme) -> Self {
        match t {
            CliTheme::Ocean => ThemeVariant::Ocean,
            CliTheme::Forest => ThemeVariant::Forest,
            CliTheme::Sunset => ThemeVariant::Sunset,
            CliTheme::Monochrome => ThemeVariant::Monochrome,
        }
    }
}
