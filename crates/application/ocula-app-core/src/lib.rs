pub mod app;
pub mod app_core;
pub mod controllers;

pub use app::{OculaApplication, Repositories};
pub use app_core::*;
pub use controllers::*;
