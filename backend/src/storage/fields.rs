//! Field definitions: the per-project observation form.
//!
//! Editing or deleting a field does not re-coerce data already collected under
//! it. Deleting a field removes its stored values together with it.

use crate::db;
use crate::error::ApiError;
use crate::storage::projects;
use common::model::field::{FieldDefinition, FieldType};
use common::requests::{FieldPatch, NewField};
use log::info;
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::Value;

const FIELD_COLUMNS: &str = "field_id, project_id, field_name, field_label, field_type, \
                             field_options, field_required";

fn field_from_row(row: &Row<'_>) -> rusqlite::Result<FieldDefinition> {
    let type_name: String = row.get(4)?;
    let field_type = type_name
        .parse::<FieldType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let options: Option<String> = row.get(5)?;

    Ok(FieldDefinition {
        field_id: row.get(0)?,
        project_id: row.get(1)?,
        field_name: row.get(2)?,
        field_label: row.get(3)?,
        field_type,
        field_options: options.map(|raw| {
            serde_json::from_str(&raw).unwrap_or(Value::String(raw))
        }),
        field_required: row.get(6)?,
    })
}

fn options_column(options: Option<&Value>) -> Option<String> {
    options.filter(|v| !v.is_null()).map(Value::to_string)
}

fn parse_type(raw: &str) -> Result<FieldType, ApiError> {
    raw.trim().parse::<FieldType>().map_err(|_| {
        let allowed: Vec<&str> = FieldType::ALL.iter().map(|t| t.as_str()).collect();
        ApiError::validation(format!(
            "Invalid field_type '{}'. Expected one of: {}.",
            raw,
            allowed.join(", ")
        ))
    })
}

fn require_project(conn: &Connection, project_id: i64) -> Result<(), ApiError> {
    projects::get(conn, project_id).map(|_| ())
}

/// The project's fields, ascending by id.
pub fn list(conn: &Connection, project_id: i64) -> Result<Vec<FieldDefinition>, ApiError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FIELD_COLUMNS} FROM project_fields WHERE project_id = ?1 ORDER BY field_id ASC"
    ))?;
    let fields = stmt
        .query_map(params![project_id], field_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fields)
}

pub fn get(conn: &Connection, field_id: i64) -> Result<FieldDefinition, ApiError> {
    conn.query_row(
        &format!("SELECT {FIELD_COLUMNS} FROM project_fields WHERE field_id = ?1"),
        params![field_id],
        field_from_row,
    )
    .optional()?
    .ok_or_else(|| ApiError::not_found(format!("No field with ID {} exists.", field_id)))
}

/// `get`, plus a check that the field belongs to `project_id`.
pub fn get_in_project(
    conn: &Connection,
    project_id: i64,
    field_id: i64,
) -> Result<FieldDefinition, ApiError> {
    let field = get(conn, field_id)?;
    if field.project_id != project_id {
        return Err(ApiError::mismatch(format!(
            "Field {} does not belong to project {}.",
            field_id, project_id
        )));
    }
    Ok(field)
}

/// Adds a field to the project's form.
///
/// `field_name` must be non-empty and `field_type` one of the supported types.
/// The label falls back to the name and the required flag to `false`.
pub fn add(conn: &Connection, project_id: i64, req: &NewField) -> Result<FieldDefinition, ApiError> {
    let name = req
        .field_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("field_name and field_type are required."))?;
    let raw_type = req
        .field_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::validation("field_name and field_type are required."))?;
    let field_type = parse_type(raw_type)?;
    require_project(conn, project_id)?;

    let label = req
        .field_label
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(name)
        .to_string();
    let required = req.required().unwrap_or(false);

    conn.execute(
        "INSERT INTO project_fields
             (project_id, field_name, field_label, field_type, field_options, field_required)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            project_id,
            name,
            label,
            field_type.as_str(),
            options_column(req.field_options.as_ref()),
            required
        ],
    )?;
    let field_id = conn.last_insert_rowid();
    info!("Field {} ({}) added to project {}", field_id, field_type, project_id);

    get(conn, field_id)
}

/// Applies the recognized attributes present in `patch`.
pub fn update(
    conn: &Connection,
    project_id: i64,
    field_id: i64,
    patch: &FieldPatch,
) -> Result<FieldDefinition, ApiError> {
    require_project(conn, project_id)?;
    get_in_project(conn, project_id, field_id)?;
    if patch.is_empty() {
        return Err(ApiError::validation("No valid fields to update."));
    }

    let mut columns: Vec<(&str, SqlValue)> = Vec::new();
    if let Some(name) = &patch.field_name {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("field_name cannot be empty."));
        }
        columns.push(("field_name", SqlValue::Text(name.to_string())));
    }
    if let Some(label) = &patch.field_label {
        columns.push(("field_label", SqlValue::Text(label.trim().to_string())));
    }
    if let Some(raw_type) = &patch.field_type {
        let field_type = parse_type(raw_type)?;
        columns.push(("field_type", SqlValue::Text(field_type.as_str().to_string())));
    }
    if let Some(options) = &patch.field_options {
        let value = match options_column(options.as_ref()) {
            Some(text) => SqlValue::Text(text),
            None => SqlValue::Null,
        };
        columns.push(("field_options", value));
    }
    if let Some(required) = patch.required() {
        columns.push(("field_required", SqlValue::Integer(i64::from(required))));
    }

    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
        .collect();
    let sql = format!(
        "UPDATE project_fields SET {} WHERE field_id = ?{}",
        assignments.join(", "),
        columns.len() + 1
    );
    let mut values: Vec<SqlValue> = columns.into_iter().map(|(_, v)| v).collect();
    values.push(SqlValue::Integer(field_id));
    conn.execute(&sql, params_from_iter(values))?;

    get(conn, field_id)
}

/// Deletes the field and the values stored under it, in one transaction.
pub fn remove(conn: &mut Connection, project_id: i64, field_id: i64) -> Result<(), ApiError> {
    let tx = db::write_transaction(conn)?;
    require_project(&tx, project_id)?;
    get_in_project(&tx, project_id, field_id)?;

    let data = tx.execute(
        "DELETE FROM observation_data WHERE field_id = ?1",
        params![field_id],
    )?;
    tx.execute(
        "DELETE FROM project_fields WHERE field_id = ?1",
        params![field_id],
    )?;
    tx.commit()?;

    info!(
        "Field {} removed from project {} ({} stored values dropped)",
        field_id, project_id, data
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::storage::projects::ProjectCodeAllocator;
    use common::requests::NewProject;
    use serde_json::json;

    fn new_project(conn: &Connection, teacher: i64) -> i64 {
        projects::create(conn, &mut ProjectCodeAllocator::new(), teacher, &NewProject::default())
            .unwrap()
            .project_id
    }

    fn new_field(name: &str, field_type: &str) -> NewField {
        NewField {
            field_name: Some(name.to_string()),
            field_type: Some(field_type.to_string()),
            ..NewField::default()
        }
    }

    #[test]
    fn add_applies_defaults() {
        let (_dir, db) = test_database();
        let conn = db.connect().unwrap();
        let project = new_project(&conn, 1);

        let field = add(&conn, project, &new_field("species", "radio")).unwrap();
        assert_eq!(field.field_label, "species");
        assert!(!field.field_required);
        assert_eq!(field.field_type, FieldType::Radio);
        assert_eq!(field.field_options, None);
    }

    #[test]
    fn add_validates_name_and_type() {
        let (_dir, db) = test_database();
        let conn = db.connect().unwrap();
        let project = new_project(&conn, 1);

        for req in [
            new_field("  ", "text"),
            NewField {
                field_name: Some("x".into()),
                ..NewField::default()
            },
            new_field("x", "email"),
        ] {
            assert!(matches!(add(&conn, project, &req), Err(ApiError::Validation(_))));
        }
        assert!(matches!(
            add(&conn, 999, &new_field("x", "text")),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn list_is_ordered_and_project_scoped() {
        let (_dir, db) = test_database();
        let conn = db.connect().unwrap();
        let p1 = new_project(&conn, 1);
        let p2 = new_project(&conn, 1);
        let a = add(&conn, p1, &new_field("a", "text")).unwrap();
        add(&conn, p2, &new_field("other", "text")).unwrap();
        let b = add(&conn, p1, &new_field("b", "number")).unwrap();

        let ids: Vec<i64> = list(&conn, p1).unwrap().iter().map(|f| f.field_id).collect();
        assert_eq!(ids, vec![a.field_id, b.field_id]);
    }

    #[test]
    fn update_is_partial_and_checks_ownership_of_the_field() {
        let (_dir, db) = test_database();
        let conn = db.connect().unwrap();
        let p1 = new_project(&conn, 1);
        let p2 = new_project(&conn, 1);
        let field = add(
            &conn,
            p1,
            &NewField {
                field_options: Some(json!(["a", "b"])),
                ..new_field("colour", "multiselect")
            },
        )
        .unwrap();
        assert_eq!(field.field_options, Some(json!(["a", "b"])));

        let patch = FieldPatch {
            field_label: Some("Colour".into()),
            is_required: Some(true),
            ..FieldPatch::default()
        };
        let updated = update(&conn, p1, field.field_id, &patch).unwrap();
        assert_eq!(updated.field_label, "Colour");
        assert!(updated.field_required);
        assert_eq!(updated.field_name, "colour");
        assert_eq!(updated.field_options, Some(json!(["a", "b"])));

        assert!(matches!(
            update(&conn, p1, field.field_id, &FieldPatch::default()),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            update(&conn, p2, field.field_id, &patch),
            Err(ApiError::Mismatch(_))
        ));
        assert!(matches!(
            update(&conn, p1, 12345, &patch),
            Err(ApiError::NotFound(_))
        ));

        let cleared = FieldPatch {
            field_options: Some(None),
            ..FieldPatch::default()
        };
        assert_eq!(update(&conn, p1, field.field_id, &cleared).unwrap().field_options, None);
    }

    #[test]
    fn remove_deletes_the_field() {
        let (_dir, db) = test_database();
        let mut conn = db.connect().unwrap();
        let p1 = new_project(&conn, 1);
        let field = add(&conn, p1, &new_field("a", "text")).unwrap();

        remove(&mut conn, p1, field.field_id).unwrap();
        assert!(matches!(get(&conn, field.field_id), Err(ApiError::NotFound(_))));
        assert!(matches!(
            remove(&mut conn, p1, field.field_id),
            Err(ApiError::NotFound(_))
        ));
    }
}
