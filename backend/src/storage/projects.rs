//! Project rows and their student access codes.
//!
//! Codes are 8 characters drawn uniformly from `[A-Z0-9]`. `ProjectCodeAllocator`
//! draws until it finds a code no project uses yet. Since that check and the
//! insert are separate statements, `create` also relies on the UNIQUE index on
//! `project_code` and draws again when the insert loses a race.

use crate::db;
use crate::error::ApiError;
use common::model::project::Project;
use common::requests::{NewProject, ProjectPatch};
use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

pub const CODE_LENGTH: usize = 8;
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Inserts that lose a code race are retried this many times in total.
const MAX_INSERT_ATTEMPTS: usize = 32;

const PROJECT_COLUMNS: &str = "project_id, teacher_id, project_code, project_title, \
                               project_description, project_instructions";

pub struct ProjectCodeAllocator<R: Rng = ThreadRng> {
    rng: R,
}

impl ProjectCodeAllocator<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for ProjectCodeAllocator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ProjectCodeAllocator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// One uniform draw, with no uniqueness check.
    pub fn draw(&mut self) -> String {
        (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[self.rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }

    /// Draws until the code is not used by any existing project.
    pub fn allocate(&mut self, conn: &Connection) -> Result<String, ApiError> {
        loop {
            let code = self.draw();
            if code_available(conn, &code)? {
                return Ok(code);
            }
            debug!("project code {} already taken, drawing again", code);
        }
    }
}

pub fn code_available(conn: &Connection, code: &str) -> Result<bool, ApiError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM projects WHERE project_code = ?1",
        params![code],
        |row| row.get(0),
    )?;
    Ok(count == 0)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        project_id: row.get(0)?,
        teacher_id: row.get(1)?,
        project_code: row.get(2)?,
        project_title: row.get(3)?,
        project_description: row.get(4)?,
        project_instructions: row.get(5)?,
    })
}

/// Creates a project owned by `teacher_id` with a freshly allocated code.
pub fn create<R: Rng>(
    conn: &Connection,
    allocator: &mut ProjectCodeAllocator<R>,
    teacher_id: i64,
    req: &NewProject,
) -> Result<Project, ApiError> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let code = allocator.allocate(conn)?;
        let inserted = conn.execute(
            "INSERT INTO projects
                 (teacher_id, project_code, project_title, project_description, project_instructions)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                teacher_id,
                code,
                req.project_title,
                req.project_description,
                req.project_instructions
            ],
        );

        match inserted {
            Ok(_) => {
                let project_id = conn.last_insert_rowid();
                info!(
                    "Project {} created for teacher {} with code {}",
                    project_id, teacher_id, code
                );
                return Ok(Project {
                    project_id,
                    teacher_id,
                    project_code: code,
                    project_title: req.project_title.clone(),
                    project_description: req.project_description.clone(),
                    project_instructions: req.project_instructions.clone(),
                });
            }
            Err(e) if is_unique_violation(&e) && attempts < MAX_INSERT_ATTEMPTS => {
                warn!("project code {} was taken concurrently, retrying", code);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

pub fn find(conn: &Connection, project_id: i64) -> Result<Option<Project>, ApiError> {
    let project = conn
        .query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE project_id = ?1"),
            params![project_id],
            project_from_row,
        )
        .optional()?;
    Ok(project)
}

pub fn get(conn: &Connection, project_id: i64) -> Result<Project, ApiError> {
    find(conn, project_id)?
        .ok_or_else(|| ApiError::not_found(format!("No project with ID {} exists.", project_id)))
}

pub fn get_by_code(conn: &Connection, code: &str) -> Result<Project, ApiError> {
    conn.query_row(
        &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE project_code = ?1"),
        params![code.trim().to_ascii_uppercase()],
        project_from_row,
    )
    .optional()?
    .ok_or_else(|| ApiError::not_found("No project uses that code."))
}

/// The teacher's projects, newest first.
pub fn list_by_teacher(conn: &Connection, teacher_id: i64) -> Result<Vec<Project>, ApiError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE teacher_id = ?1 ORDER BY project_id DESC"
    ))?;
    let projects = stmt
        .query_map(params![teacher_id], project_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

/// Applies the attributes present in `patch`. The code is never touched.
pub fn update(conn: &Connection, project_id: i64, patch: &ProjectPatch) -> Result<Project, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::validation("No valid fields to update."));
    }

    let mut assignments = Vec::new();
    let mut values: Vec<SqlValue> = Vec::new();
    for (column, value) in [
        ("project_title", &patch.project_title),
        ("project_description", &patch.project_description),
        ("project_instructions", &patch.project_instructions),
    ] {
        if let Some(value) = value {
            values.push(value.clone().map_or(SqlValue::Null, SqlValue::Text));
            assignments.push(format!("{} = ?{}", column, values.len()));
        }
    }
    values.push(SqlValue::Integer(project_id));

    let sql = format!(
        "UPDATE projects SET {} WHERE project_id = ?{}",
        assignments.join(", "),
        values.len()
    );
    let changed = conn.execute(&sql, params_from_iter(values))?;
    if changed == 0 {
        return Err(ApiError::not_found(format!(
            "No project with ID {} exists.",
            project_id
        )));
    }
    get(conn, project_id)
}

/// Removes a project and everything under it, children first, in one transaction:
/// observation data, observations, fields, then the project row.
pub fn delete_cascade(conn: &mut Connection, project_id: i64) -> Result<(), ApiError> {
    let tx = db::write_transaction(conn)?;

    let exists: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM projects WHERE project_id = ?1)",
        params![project_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(ApiError::not_found(format!(
            "No project with ID {} exists.",
            project_id
        )));
    }

    let data = tx.execute(
        "DELETE FROM observation_data WHERE observation_id IN
             (SELECT observation_id FROM observations WHERE project_id = ?1)",
        params![project_id],
    )?;
    let observations = tx.execute(
        "DELETE FROM observations WHERE project_id = ?1",
        params![project_id],
    )?;
    let fields = tx.execute(
        "DELETE FROM project_fields WHERE project_id = ?1",
        params![project_id],
    )?;
    tx.execute(
        "DELETE FROM projects WHERE project_id = ?1",
        params![project_id],
    )?;
    tx.commit()?;

    info!(
        "Project {} deleted ({} fields, {} observations, {} data rows)",
        project_id, fields, observations, data
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn titled(title: &str) -> NewProject {
        NewProject {
            project_title: Some(title.to_string()),
            ..NewProject::default()
        }
    }

    #[test]
    fn drawn_codes_use_the_alphabet() {
        let mut allocator = ProjectCodeAllocator::with_rng(StdRng::seed_from_u64(1));
        for _ in 0..200 {
            let code = allocator.draw();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)), "{code}");
        }
    }

    #[test]
    fn allocate_skips_codes_already_in_use() {
        let (_dir, db) = test_database();
        let conn = db.connect().unwrap();

        let taken = ProjectCodeAllocator::with_rng(StdRng::seed_from_u64(9)).draw();
        conn.execute(
            "INSERT INTO projects (teacher_id, project_code) VALUES (1, ?1)",
            params![taken],
        )
        .unwrap();

        let mut allocator = ProjectCodeAllocator::with_rng(StdRng::seed_from_u64(9));
        let code = allocator.allocate(&conn).unwrap();
        assert_ne!(code, taken);
        assert!(code_available(&conn, &code).unwrap());
    }

    #[test]
    fn identical_titles_get_distinct_codes() {
        let (_dir, db) = test_database();
        let conn = db.connect().unwrap();
        let mut allocator = ProjectCodeAllocator::new();

        let a = create(&conn, &mut allocator, 1, &titled("Birds")).unwrap();
        let b = create(&conn, &mut allocator, 1, &titled("Birds")).unwrap();
        assert_ne!(a.project_code, b.project_code);
        assert_ne!(a.project_id, b.project_id);
    }

    #[test]
    fn update_requires_a_recognized_attribute() {
        let (_dir, db) = test_database();
        let conn = db.connect().unwrap();
        let project = create(&conn, &mut ProjectCodeAllocator::new(), 1, &titled("a")).unwrap();

        let err = update(&conn, project.project_id, &ProjectPatch::default()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let patch = ProjectPatch {
            project_description: Some(Some("ponds".to_string())),
            project_title: Some(None),
            ..ProjectPatch::default()
        };
        let updated = update(&conn, project.project_id, &patch).unwrap();
        assert_eq!(updated.project_title, None);
        assert_eq!(updated.project_description.as_deref(), Some("ponds"));
        assert_eq!(updated.project_code, project.project_code);
    }

    #[test]
    fn update_touches_only_the_addressed_project() {
        let (_dir, db) = test_database();
        let conn = db.connect().unwrap();
        let mut allocator = ProjectCodeAllocator::new();
        let first = create(&conn, &mut allocator, 1, &titled("first")).unwrap();
        let second = create(&conn, &mut allocator, 1, &titled("second")).unwrap();

        let patch = ProjectPatch {
            project_title: Some(Some("renamed".to_string())),
            project_instructions: Some(Some("count frogs".to_string())),
            ..ProjectPatch::default()
        };
        update(&conn, second.project_id, &patch).unwrap();

        assert_eq!(get(&conn, first.project_id).unwrap().project_title.as_deref(), Some("first"));
        let second = get(&conn, second.project_id).unwrap();
        assert_eq!(second.project_title.as_deref(), Some("renamed"));
        assert_eq!(second.project_instructions.as_deref(), Some("count frogs"));

        assert!(matches!(update(&conn, 9999, &patch), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn lists_newest_first_and_finds_by_code() {
        let (_dir, db) = test_database();
        let conn = db.connect().unwrap();
        let mut allocator = ProjectCodeAllocator::new();
        let first = create(&conn, &mut allocator, 5, &titled("one")).unwrap();
        let second = create(&conn, &mut allocator, 5, &titled("two")).unwrap();
        create(&conn, &mut allocator, 6, &titled("other")).unwrap();

        let ids: Vec<i64> = list_by_teacher(&conn, 5)
            .unwrap()
            .into_iter()
            .map(|p| p.project_id)
            .collect();
        assert_eq!(ids, vec![second.project_id, first.project_id]);

        let found = get_by_code(&conn, &first.project_code.to_lowercase()).unwrap();
        assert_eq!(found.project_id, first.project_id);
        assert!(matches!(
            get_by_code(&conn, "ZZZZZZZZ").unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn delete_of_missing_project_is_not_found() {
        let (_dir, db) = test_database();
        let mut conn = db.connect().unwrap();
        assert!(matches!(
            delete_cascade(&mut conn, 404).unwrap_err(),
            ApiError::NotFound(_)
        ));
    }
}
