// server/src/cli/handlers_queries.rs

// Field queries against the stores: `query --entity <kind> --field <name>
// --value <text>`.
use anyhow::Result;
use crossterm::style::Stylize;
use log::debug;

use hospital_core::{AppointmentScheduler, EntityStore, HospitalConfig, StoreResult};
use hospital_models::medical::Appointment;
use hospital_models::{Entity, PropertyValue};

use crate::cli::commands::EntityKind;
use crate::cli::handlers::{book_demo_appointments, section};
use crate::cli::registry::Registry;

/// One line per entity: its fields in declaration order.
pub fn describe<T: Entity>(entity: &T) -> String {
    T::field_accessors()
        .names()
        .filter_map(|name| entity.field(name).map(|value| format!("{}={}", name, value)))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_matches<T: Entity>(title: &str, matches: &[T]) {
    println!("{} ({}):", title.bold(), matches.len());
    for entity in matches {
        println!("  {}", describe(entity));
    }
}

/// A collection the `query` command can search.
trait FieldQuery<T> {
    fn by_value(&self, field: &str, value: PropertyValue) -> StoreResult<Vec<T>>;

    fn by_text(&self, field: &str, raw: &str) -> StoreResult<Vec<T>>;
}

impl<T: Entity> FieldQuery<T> for EntityStore<T> {
    fn by_value(&self, field: &str, value: PropertyValue) -> StoreResult<Vec<T>> {
        self.find_by_field(field, value)
    }

    fn by_text(&self, field: &str, raw: &str) -> StoreResult<Vec<T>> {
        self.find_by_field_text(field, raw)
    }
}

impl FieldQuery<Appointment> for AppointmentScheduler {
    fn by_value(&self, field: &str, value: PropertyValue) -> StoreResult<Vec<Appointment>> {
        self.find_by_field(field, value)
    }

    fn by_text(&self, field: &str, raw: &str) -> StoreResult<Vec<Appointment>> {
        self.find_by_field_text(field, raw)
    }
}

/// Reads `raw` as the field's registered kind, or compares it as plain
/// text when `text` is set. Text that does not fit the kind is an error.
fn query_store<T: Entity>(source: &impl FieldQuery<T>, field: &str, raw: &str, text: bool) -> Result<Vec<T>> {
    let found = if text {
        source.by_value(field, PropertyValue::String(raw.to_string()))?
    } else {
        source.by_text(field, raw)?
    };
    Ok(found)
}

/// Prints the records of `entity` whose `field` equals the value and
/// returns how many matched. An unknown field is an error.
pub fn run_query(
    registry: &Registry,
    entity: EntityKind,
    field: &str,
    raw_value: &str,
    text: bool,
) -> Result<usize> {
    debug!(
        "Querying {:?} where {} = {}{}",
        entity,
        field,
        raw_value,
        if text { " (as text)" } else { "" }
    );
    let title = format!("{:?} where {} = {}", entity, field, raw_value);

    section("QUERY");
    let count = match entity {
        EntityKind::Practitioners => {
            let found = query_store(&registry.practitioners, field, raw_value, text)?;
            print_matches(&title, &found);
            found.len()
        }
        EntityKind::Patients => {
            let found = query_store(&registry.patients, field, raw_value, text)?;
            print_matches(&title, &found);
            found.len()
        }
        EntityKind::Appointments => {
            let found = query_store(&registry.scheduler, field, raw_value, text)?;
            print_matches(&title, &found);
            found.len()
        }
        EntityKind::Rooms => {
            let found = query_store(&registry.rooms, field, raw_value, text)?;
            print_matches(&title, &found);
            found.len()
        }
        EntityKind::Hospitals => {
            let found = query_store(&registry.hospitals, field, raw_value, text)?;
            print_matches(&title, &found);
            found.len()
        }
    };
    Ok(count)
}

/// Seeds the sample data and demo bookings, then runs one query.
pub fn handle_query_command(
    registry: &Registry,
    config: &HospitalConfig,
    entity: EntityKind,
    field: &str,
    raw_value: &str,
    text: bool,
) -> Result<()> {
    registry.seed(&config.hospital)?;
    book_demo_appointments(registry, config)?;
    run_query(registry, entity, field, raw_value, text)?;
    Ok(())
}
