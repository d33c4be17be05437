//! Core trait definitions.

mod gateway;

pub use gateway::{Credentials, ExchangeGateway};
