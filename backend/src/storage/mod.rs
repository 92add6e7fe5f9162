//! Typed observation storage.
//!
//! - `projects`: project rows, access code allocation and the project cascade delete.
//! - `fields`: the per-project form definition.
//! - `coercion`: declared field type + raw value -> stored columns.
//! - `observations`: submissions and their per-field values.
//!
//! Functions here take a `rusqlite::Connection` and are synchronous; the HTTP
//! layer runs them on the blocking pool.

pub mod coercion;
pub mod fields;
pub mod observations;
pub mod projects;
