//! Issued bearer tokens, their redacted secrets, and the client-held token state.

pub mod record;
pub mod secret;
pub mod state;
