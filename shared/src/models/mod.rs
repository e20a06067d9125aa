//! Domain models for the FarmFlow dashboard

mod prediction;
mod session;
mod weather;

pub use prediction::*;
pub use session::*;
pub use weather::*;
