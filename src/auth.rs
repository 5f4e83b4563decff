//! Token models and grant selection for the RAPID token endpoint.

pub mod grant;
pub mod token;

pub use grant::*;
pub use token::{record::*, secret::*, state::*};
