pub mod container;
pub mod controller;
pub mod scope;

pub use container::StateContainer;
pub use controller::{Controller, HandlerError};
pub use scope::Scope;
