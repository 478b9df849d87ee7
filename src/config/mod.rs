//! Configuration module for the Parley server.

mod settings;

pub use settings::*;
