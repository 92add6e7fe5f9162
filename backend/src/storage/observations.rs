//! # Observation Store
//!
//! Persists observations and their per-field values. Each submitted value goes
//! through `coercion::coerce` using the declared type of its field, and lands in
//! `observation_data` as the raw mirror plus one typed column.
//!
//! Keys of `field_data` are field ids. A key that is not an integer, or that names
//! a field outside the observation's project, is skipped without error.
//!
//! Datum rows are written with a single `INSERT ... ON CONFLICT DO UPDATE`
//! keyed on `(observation_id, field_id)`, so re-submitting a field overwrites it
//! in place and concurrent writers cannot create duplicates.
//!
//! Every mutating call runs in one transaction.

use crate::db;
use crate::error::ApiError;
use crate::storage::coercion::{self, StoredValue};
use crate::storage::{fields, projects};
use common::model::field::{FieldDefinition, FieldType};
use common::model::observation::{Observation, ObservationDatum};
use common::requests::{ObservationPatch, ObservationSubmission};
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};
use std::collections::HashMap;

const DATUM_SELECT: &str = "SELECT d.observation_id, d.data_id, d.field_id, f.field_name, \
     f.field_label, f.field_type, d.field_value, d.value_text, d.value_number, d.value_date, \
     d.value_boolean \
     FROM observation_data d JOIN project_fields f ON f.field_id = d.field_id";

fn datum_from_row(row: &Row<'_>) -> rusqlite::Result<(i64, ObservationDatum)> {
    let type_name: String = row.get(5)?;
    let field_type = type_name
        .parse::<FieldType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok((
        row.get(0)?,
        ObservationDatum {
            data_id: row.get(1)?,
            field_id: row.get(2)?,
            field_name: row.get(3)?,
            field_label: row.get(4)?,
            field_type,
            field_value: row.get(6)?,
            value_text: row.get(7)?,
            value_number: row.get(8)?,
            value_date: row.get(9)?,
            value_boolean: row.get(10)?,
        },
    ))
}

fn project_fields_by_id(
    conn: &Connection,
    project_id: i64,
) -> Result<HashMap<i64, FieldDefinition>, ApiError> {
    Ok(fields::list(conn, project_id)?
        .into_iter()
        .map(|f| (f.field_id, f))
        .collect())
}

/// Writes one value for `field` into the observation, replacing any earlier value.
fn upsert_datum(
    conn: &Connection,
    observation_id: i64,
    field: &FieldDefinition,
    value: &Value,
) -> Result<StoredValue, ApiError> {
    let stored = coercion::coerce(field.field_type, value);
    conn.execute(
        "INSERT INTO observation_data
             (observation_id, field_id, field_value, value_text, value_number, value_date, value_boolean)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (observation_id, field_id) DO UPDATE SET
             field_value   = excluded.field_value,
             value_text    = excluded.value_text,
             value_number  = excluded.value_number,
             value_date    = excluded.value_date,
             value_boolean = excluded.value_boolean",
        params![
            observation_id,
            field.field_id,
            stored.raw,
            stored.value_text(),
            stored.value_number(),
            stored.value_date(),
            stored.value_boolean()
        ],
    )?;
    Ok(stored)
}

/// Upserts every entry of `field_data` that names a field of the project.
/// Returns how many entries were stored.
fn write_field_data(
    conn: &Connection,
    observation_id: i64,
    project_fields: &HashMap<i64, FieldDefinition>,
    field_data: &Map<String, Value>,
) -> Result<usize, ApiError> {
    let mut written = 0;
    for (key, value) in field_data {
        let field = key
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|id| project_fields.get(&id));
        match field {
            Some(field) => {
                upsert_datum(conn, observation_id, field, value)?;
                written += 1;
            }
            None => debug!(
                "observation {}: skipping unknown field key '{}'",
                observation_id, key
            ),
        }
    }
    Ok(written)
}

/// Confirms the observation exists and belongs to `project_id`.
fn locate(conn: &Connection, project_id: i64, observation_id: i64) -> Result<(), ApiError> {
    let owner: Option<i64> = conn
        .query_row(
            "SELECT project_id FROM observations WHERE observation_id = ?1",
            params![observation_id],
            |row| row.get(0),
        )
        .optional()?;

    match owner {
        None => Err(ApiError::not_found(format!(
            "No observation with ID {} exists.",
            observation_id
        ))),
        Some(owner) if owner != project_id => Err(ApiError::mismatch(format!(
            "Observation {} does not belong to project {}.",
            observation_id, project_id
        ))),
        Some(_) => Ok(()),
    }
}

/// Loads an observation with its data, ordered by field id.
fn load(conn: &Connection, observation_id: i64) -> Result<Observation, ApiError> {
    let (project_id, student_name): (i64, Option<String>) = conn.query_row(
        "SELECT project_id, student_name FROM observations WHERE observation_id = ?1",
        params![observation_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let mut stmt = conn.prepare(&format!(
        "{DATUM_SELECT} WHERE d.observation_id = ?1 ORDER BY d.field_id ASC"
    ))?;
    let data = stmt
        .query_map(params![observation_id], datum_from_row)?
        .map(|row| row.map(|(_, datum)| datum))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Observation {
        observation_id,
        project_id,
        student_name,
        data,
    })
}

/// Stores a new observation for the project.
///
/// The observation row and all its accepted values are committed together.
pub fn submit(
    conn: &mut Connection,
    project_id: i64,
    submission: &ObservationSubmission,
) -> Result<Observation, ApiError> {
    let tx = db::write_transaction(conn)?;
    projects::get(&tx, project_id)?;
    let project_fields = project_fields_by_id(&tx, project_id)?;

    tx.execute(
        "INSERT INTO observations (project_id, student_name) VALUES (?1, ?2)",
        params![project_id, submission.student_name],
    )?;
    let observation_id = tx.last_insert_rowid();
    let written = write_field_data(&tx, observation_id, &project_fields, &submission.field_data)?;

    let observation = load(&tx, observation_id)?;
    tx.commit()?;

    info!(
        "Observation {} submitted to project {} ({} of {} values stored)",
        observation_id,
        project_id,
        written,
        submission.field_data.len()
    );
    Ok(observation)
}

/// Applies a patch to an existing observation.
///
/// `student_name`, when present, overwrites the stored name (including with null).
/// Each recognized `field_data` entry is upserted.
pub fn update(
    conn: &mut Connection,
    project_id: i64,
    observation_id: i64,
    patch: &ObservationPatch,
) -> Result<Observation, ApiError> {
    let tx = db::write_transaction(conn)?;
    locate(&tx, project_id, observation_id)?;
    if patch.is_empty() {
        return Err(ApiError::validation("No valid fields to update."));
    }

    if let Some(name) = &patch.student_name {
        tx.execute(
            "UPDATE observations SET student_name = ?1 WHERE observation_id = ?2",
            params![name, observation_id],
        )?;
    }
    if let Some(field_data) = &patch.field_data {
        let project_fields = project_fields_by_id(&tx, project_id)?;
        write_field_data(&tx, observation_id, &project_fields, field_data)?;
    }

    let observation = load(&tx, observation_id)?;
    tx.commit()?;
    info!("Observation {} in project {} updated", observation_id, project_id);
    Ok(observation)
}

pub fn get(conn: &Connection, project_id: i64, observation_id: i64) -> Result<Observation, ApiError> {
    locate(conn, project_id, observation_id)?;
    load(conn, observation_id)
}

/// All observations of the project, newest first, each with its data.
pub fn list_by_project(conn: &Connection, project_id: i64) -> Result<Vec<Observation>, ApiError> {
    projects::get(conn, project_id)?;

    let mut stmt = conn.prepare(
        "SELECT observation_id, student_name FROM observations
         WHERE project_id = ?1 ORDER BY observation_id DESC",
    )?;
    let mut observations = stmt
        .query_map(params![project_id], |row| {
            Ok(Observation {
                observation_id: row.get(0)?,
                project_id,
                student_name: row.get(1)?,
                data: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(&format!(
        "{DATUM_SELECT} JOIN observations o ON o.observation_id = d.observation_id
         WHERE o.project_id = ?1 ORDER BY d.observation_id, d.field_id ASC"
    ))?;
    let mut data_by_observation: HashMap<i64, Vec<ObservationDatum>> = HashMap::new();
    for row in stmt.query_map(params![project_id], datum_from_row)? {
        let (observation_id, datum) = row?;
        data_by_observation
            .entry(observation_id)
            .or_default()
            .push(datum);
    }

    for observation in &mut observations {
        if let Some(data) = data_by_observation.remove(&observation.observation_id) {
            observation.data = data;
        }
    }
    Ok(observations)
}

/// Deletes the observation's data rows, then the observation, in one transaction.
pub fn delete(conn: &mut Connection, project_id: i64, observation_id: i64) -> Result<(), ApiError> {
    let tx = db::write_transaction(conn)?;
    locate(&tx, project_id, observation_id)?;

    let data = tx.execute(
        "DELETE FROM observation_data WHERE observation_id = ?1",
        params![observation_id],
    )?;
    tx.execute(
        "DELETE FROM observations WHERE observation_id = ?1",
        params![observation_id],
    )?;
    tx.commit()?;

    info!(
        "Observation {} deleted from project {} ({} data rows)",
        observation_id, project_id, data
    );
    Ok(())
}
