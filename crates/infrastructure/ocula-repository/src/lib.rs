mod api;
mod error;
pub mod mock;
mod observable;
pub mod seed;

pub use api::*;
pub use error::*;
pub use observable::{Latency, ObservableList};
