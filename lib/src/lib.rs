// lib/src/lib.rs

//! Core of the hospital system: a generic in-memory entity store, the
//! appointment scheduler that enforces booking rules over it, and the
//! configuration layer.

pub mod config;
pub mod errors;
pub mod scheduling;
pub mod storage_engine;

pub use crate::config::{load_config, HospitalConfig};
pub use crate::errors::{SchedulingError, SchedulingResult, StoreError, StoreResult};
pub use crate::scheduling::{AppointmentScheduler, Clock, FixedClock, SystemClock};
pub use crate::storage_engine::EntityStore;
