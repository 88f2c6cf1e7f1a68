use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{DbStudent, DbUniversity, Student, University};

const STUDENT_COLUMNS: &str = "s.id, s.faculty_number, s.first_name, s.middle_name, s.last_name, \
     s.university_id, u.name AS university_name, u.location AS university_location";

#[instrument(skip(pool))]
pub async fn get_all_universities(pool: &Pool<Sqlite>) -> Result<Vec<University>, AppError> {
    info!("Fetching all universities");
    let rows = sqlx::query_as::<_, DbUniversity>(
        "SELECT id, name, location FROM universities ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(University::from).collect())
}

/// Absent rows come back as `Ok(None)`, not an error; the router decides
/// what a missing id means.
#[instrument(skip(pool))]
pub async fn get_university(
    pool: &Pool<Sqlite>,
    id: i64,
) -> Result<Option<University>, AppError> {
    info!("Fetching university by ID");
    let row = sqlx::query_as::<_, DbUniversity>(
        "SELECT id, name, location FROM universities WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(University::from))
}

#[instrument(skip(pool))]
pub async fn create_university(
    pool: &Pool<Sqlite>,
    name: &str,
    location: &str,
) -> Result<University, AppError> {
    info!("Creating university");
    let res = sqlx::query("INSERT INTO universities (name, location) VALUES (?, ?)")
        .bind(name)
        .bind(location)
        .execute(pool)
        .await?;

    Ok(University {
        id: res.last_insert_rowid(),
        name: name.to_string(),
        location: location.to_string(),
    })
}

#[instrument(skip(pool))]
pub async fn update_university(
    pool: &Pool<Sqlite>,
    id: i64,
    name: &str,
    location: &str,
) -> Result<(), AppError> {
    info!("Updating university");
    sqlx::query("UPDATE universities SET name = ?, location = ? WHERE id = ?")
        .bind(name)
        .bind(location)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Returns whether a row was deleted. A university still referenced by
/// students trips the foreign-key constraint, surfaced as `Conflict`.
#[instrument(skip(pool))]
pub async fn delete_university(pool: &Pool<Sqlite>, id: i64) -> Result<bool, AppError> {
    info!("Deleting university");
    let res = sqlx::query("DELETE FROM universities WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(res.rows_affected() > 0)
}

#[instrument(skip(pool))]
pub async fn university_exists(pool: &Pool<Sqlite>, id: i64) -> Result<bool, AppError> {
    let row = sqlx::query("SELECT id FROM universities WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

#[instrument(skip(pool))]
pub async fn get_all_students(pool: &Pool<Sqlite>) -> Result<Vec<Student>, AppError> {
    info!("Fetching all students");
    let query = format!(
        "SELECT {STUDENT_COLUMNS} FROM students s \
         JOIN universities u ON u.id = s.university_id \
         ORDER BY s.id"
    );
    let rows = sqlx::query_as::<_, DbStudent>(&query).fetch_all(pool).await?;

    Ok(rows.into_iter().map(Student::from).collect())
}

#[instrument(skip(pool))]
pub async fn get_student(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Student>, AppError> {
    info!("Fetching student by ID");
    let query = format!(
        "SELECT {STUDENT_COLUMNS} FROM students s \
         JOIN universities u ON u.id = s.university_id \
         WHERE s.id = ?"
    );
    let row = sqlx::query_as::<_, DbStudent>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Student::from))
}

#[instrument(skip(pool))]
pub async fn create_student(
    pool: &Pool<Sqlite>,
    faculty_number: &str,
    first_name: &str,
    middle_name: Option<&str>,
    last_name: &str,
    university_id: i64,
) -> Result<Student, AppError> {
    info!("Creating student");
    let res = sqlx::query(
        "INSERT INTO students \
         (faculty_number, first_name, middle_name, last_name, university_id) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(faculty_number)
    .bind(first_name)
    .bind(middle_name)
    .bind(last_name)
    .bind(university_id)
    .execute(pool)
    .await?;

    let id = res.last_insert_rowid();
    match get_student(pool, id).await? {
        Some(student) => Ok(student),
        None => Err(AppError::Internal(format!(
            "Student {} missing immediately after insert",
            id
        ))),
    }
}

#[instrument(skip(pool))]
pub async fn update_student(
    pool: &Pool<Sqlite>,
    id: i64,
    faculty_number: &str,
    first_name: &str,
    middle_name: Option<&str>,
    last_name: &str,
    university_id: i64,
) -> Result<(), AppError> {
    info!("Updating student");
    sqlx::query(
        "UPDATE students \
         SET faculty_number = ?, first_name = ?, middle_name = ?, last_name = ?, \
             university_id = ? \
         WHERE id = ?",
    )
    .bind(faculty_number)
    .bind(first_name)
    .bind(middle_name)
    .bind(last_name)
    .bind(university_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

#[instrument(skip(pool))]
pub async fn delete_student(pool: &Pool<Sqlite>, id: i64) -> Result<bool, AppError> {
    info!("Deleting student");
    let res = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(res.rows_affected() > 0)
}
