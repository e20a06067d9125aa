//! Shared types and logic for the FarmFlow dashboard
//!
//! This crate contains everything that does not touch the network or storage:
//! domain models, validation, service response interpretation and rendering.
//! It is used by the native client and, through WASM, by the browser.

pub mod catalog;
pub mod error;
pub mod form;
pub mod models;
pub mod presentation;
pub mod responses;
pub mod types;
pub mod validation;

pub use catalog::*;
pub use error::*;
pub use form::*;
pub use models::*;
pub use presentation::*;
pub use responses::*;
pub use types::*;
pub use validation::*;
