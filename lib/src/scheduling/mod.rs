// lib/src/scheduling/mod.rs

pub mod appointment_scheduler;
pub mod clock;

pub use appointment_scheduler::AppointmentScheduler;
pub use clock::{Clock, FixedClock, SystemClock};
