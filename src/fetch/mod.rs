//! Retrieval of observations and forecast text from the public weather APIs.

pub mod afd;
pub mod client;
pub mod error;
