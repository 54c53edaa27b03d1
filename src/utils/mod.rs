//! Utility functions module
//!
//! Helpers used by the HTTP layer and the binary.

pub mod shuffle;
pub mod signals;
pub mod validation;

pub use shuffle::{shuffle, shuffle_with};
pub use signals::shutdown_signal;
pub use validation::{validate_email, validate_form, RegistrationForm};
