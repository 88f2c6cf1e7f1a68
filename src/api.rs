use rocket::State;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::db::{
    create_student, create_university, delete_student, delete_university, get_all_students,
    get_all_universities, get_student, get_university, university_exists, update_student,
    update_university,
};
use crate::error::{AppError, ErrorBody};
use crate::models::{Student, University};
use crate::validation::ValidateExt;

fn university_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("University with id {} not found", id))
}

fn student_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Student with id {} not found", id))
}

fn invalid_id(id: &str) -> AppError {
    AppError::Validation(format!("'{}' is not a valid id", id))
}

// Distinguishes an absent field from an explicit `null`: absent stays `None`
// via `#[serde(default)]`, while `null` becomes `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUniversityRequest {
    #[validate(required(message = "name is required"), length(min = 1, message = "name must not be empty"))]
    name: Option<String>,
    #[validate(required(message = "location is required"), length(min = 1, message = "location must not be empty"))]
    location: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUniversityRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: Option<String>,
    #[validate(length(min = 1, message = "location must not be empty"))]
    location: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    #[validate(required(message = "facultyNumber is required"), length(min = 1, message = "facultyNumber must not be empty"))]
    faculty_number: Option<String>,
    #[validate(required(message = "firstName is required"), length(min = 1, message = "firstName must not be empty"))]
    first_name: Option<String>,
    middle_name: Option<String>,
    #[validate(required(message = "lastName is required"), length(min = 1, message = "lastName must not be empty"))]
    last_name: Option<String>,
    #[validate(required(message = "universityId is required"))]
    university_id: Option<i64>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, message = "facultyNumber must not be empty"))]
    faculty_number: Option<String>,
    #[validate(length(min = 1, message = "firstName must not be empty"))]
    first_name: Option<String>,
    /// `null` clears the middle name; an absent field keeps the stored one.
    #[serde(default, deserialize_with = "double_option")]
    middle_name: Option<Option<String>>,
    #[validate(length(min = 1, message = "lastName must not be empty"))]
    last_name: Option<String>,
    university_id: Option<i64>,
}

#[get("/universities")]
pub async fn api_get_universities(
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<University>>, AppError> {
    let universities = get_all_universities(db).await?;
    Ok(Json(universities))
}

#[get("/universities/<id>")]
pub async fn api_get_university(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<University>, AppError> {
    match get_university(db, id).await? {
        Some(university) => Ok(Json(university)),
        None => Err(university_not_found(id)),
    }
}

#[get("/universities/<id>", rank = 2)]
pub async fn api_get_university_invalid_id(id: &str) -> AppError {
    invalid_id(id)
}

#[post("/universities", data = "<university>")]
pub async fn api_create_university(
    university: Json<CreateUniversityRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<status::Created<Json<University>>, AppError> {
    let req = university.into_inner().validated()?;

    let name = req.name.unwrap_or_default();
    let location = req.location.unwrap_or_default();

    let created = create_university(db, &name, &location).await?;
    let location_uri = format!("/api/universities/{}", created.id);

    Ok(status::Created::new(location_uri).body(Json(created)))
}

#[put("/universities/<id>", data = "<university>")]
pub async fn api_update_university(
    id: i64,
    university: Json<UpdateUniversityRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<University>, AppError> {
    let req = university.into_inner().validated()?;

    let existing = get_university(db, id)
        .await?
        .ok_or_else(|| university_not_found(id))?;

    // Only fields present in the body change; the rest carry over.
    let name = req.name.unwrap_or(existing.name);
    let location = req.location.unwrap_or(existing.location);

    update_university(db, id, &name, &location).await?;

    Ok(Json(University { id, name, location }))
}

#[put("/universities/<id>", rank = 2)]
pub async fn api_update_university_invalid_id(id: &str) -> AppError {
    invalid_id(id)
}

#[delete("/universities/<id>")]
pub async fn api_delete_university(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<status::NoContent, AppError> {
    if delete_university(db, id).await? {
        Ok(status::NoContent)
    } else {
        Err(university_not_found(id))
    }
}

#[delete("/universities/<id>", rank = 2)]
pub async fn api_delete_university_invalid_id(id: &str) -> AppError {
    invalid_id(id)
}

#[get("/students")]
pub async fn api_get_students(db: &State<Pool<Sqlite>>) -> Result<Json<Vec<Student>>, AppError> {
    let students = get_all_students(db).await?;
    Ok(Json(students))
}

#[get("/students/<id>")]
pub async fn api_get_student(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Student>, AppError> {
    match get_student(db, id).await? {
        Some(student) => Ok(Json(student)),
        None => Err(student_not_found(id)),
    }
}

#[get("/students/<id>", rank = 2)]
pub async fn api_get_student_invalid_id(id: &str) -> AppError {
    invalid_id(id)
}

#[post("/students", data = "<student>")]
pub async fn api_create_student(
    student: Json<CreateStudentRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<status::Created<Json<Student>>, AppError> {
    let req = student.into_inner().validated()?;

    let faculty_number = req.faculty_number.unwrap_or_default();
    let first_name = req.first_name.unwrap_or_default();
    let last_name = req.last_name.unwrap_or_default();
    let university_id = req.university_id.unwrap_or_default();

    // Referential check up front so a dangling universityId reads as a 400,
    // not a constraint blowup.
    if !university_exists(db, university_id).await? {
        return Err(AppError::Validation(format!(
            "University with id {} does not exist",
            university_id
        )));
    }

    let created = create_student(
        db,
        &faculty_number,
        &first_name,
        req.middle_name.as_deref(),
        &last_name,
        university_id,
    )
    .await?;
    let location_uri = format!("/api/students/{}", created.id);

    Ok(status::Created::new(location_uri).body(Json(created)))
}

#[put("/students/<id>", data = "<student>")]
pub async fn api_update_student(
    id: i64,
    student: Json<UpdateStudentRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Student>, AppError> {
    let req = student.into_inner().validated()?;

    let existing = get_student(db, id)
        .await?
        .ok_or_else(|| student_not_found(id))?;

    let faculty_number = req.faculty_number.unwrap_or(existing.faculty_number);
    let first_name = req.first_name.unwrap_or(existing.first_name);
    let middle_name = match req.middle_name {
        Some(value) => value,
        None => existing.middle_name,
    };
    let last_name = req.last_name.unwrap_or(existing.last_name);

    let university_id = match req.university_id {
        Some(university_id) => {
            if !university_exists(db, university_id).await? {
                return Err(AppError::Validation(format!(
                    "University with id {} does not exist",
                    university_id
                )));
            }
            university_id
        }
        None => existing.university_id,
    };

    update_student(
        db,
        id,
        &faculty_number,
        &first_name,
        middle_name.as_deref(),
        &last_name,
        university_id,
    )
    .await?;

    match get_student(db, id).await? {
        Some(student) => Ok(Json(student)),
        None => Err(student_not_found(id)),
    }
}

#[put("/students/<id>", rank = 2)]
pub async fn api_update_student_invalid_id(id: &str) -> AppError {
    invalid_id(id)
}

#[delete("/students/<id>")]
pub async fn api_delete_student(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<status::NoContent, AppError> {
    if delete_student(db, id).await? {
        Ok(status::NoContent)
    } else {
        Err(student_not_found(id))
    }
}

#[delete("/students/<id>", rank = 2)]
pub async fn api_delete_student_invalid_id(id: &str) -> AppError {
    invalid_id(id)
}

/// Static endpoint listing, mirroring what the API exposes.
#[get("/")]
pub fn index() -> Json<Value> {
    Json(json!({
        "message": "Student-University API Server",
        "endpoints": {
            "universities": {
                "POST /api/universities": "Create a new university",
                "GET /api/universities": "Get all universities",
                "GET /api/universities/:id": "Get a university by ID",
                "PUT /api/universities/:id": "Update a university",
                "DELETE /api/universities/:id": "Delete a university",
            },
            "students": {
                "POST /api/students": "Create a new student",
                "GET /api/students": "Get all students",
                "GET /api/students/:id": "Get a student by ID",
                "PUT /api/students/:id": "Update a student",
                "DELETE /api/students/:id": "Delete a student",
            },
        },
    }))
}

#[catch(400)]
pub fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody::new("Bad request"))
}

#[catch(404)]
pub fn not_found(req: &rocket::Request) -> Json<ErrorBody> {
    Json(ErrorBody::new(format!(
        "No route for {} {}",
        req.method(),
        req.uri()
    )))
}

// Rocket reports body deserialization failures as 422; the API contract
// only speaks 400, so re-status them here.
#[catch(422)]
pub fn unprocessable() -> status::Custom<Json<ErrorBody>> {
    status::Custom(
        Status::BadRequest,
        Json(ErrorBody::new(
            "Request body was malformed or had fields of the wrong type",
        )),
    )
}

#[catch(500)]
pub fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody::new("Internal server error"))
}
