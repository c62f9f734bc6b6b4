//! Domain Layer
//!
//! Entities, ports and pure services. Nothing here knows about HTTP.

pub mod entities;
pub mod value_objects;
pub mod ports;
pub mod services;
