#[macro_use]
extern crate rocket;

pub mod api;
pub mod client;
pub mod db;
pub mod env;
pub mod error;
pub mod models;
pub mod telemetry;
pub mod validation;
#[cfg(test)]
mod test;

use rocket::{Build, Rocket};
use sqlx::SqlitePool;
use tracing::info;

use api::{
    api_create_student, api_create_university, api_delete_student,
    api_delete_student_invalid_id, api_delete_university, api_delete_university_invalid_id,
    api_get_student, api_get_student_invalid_id, api_get_students, api_get_universities,
    api_get_university, api_get_university_invalid_id, api_update_student,
    api_update_student_invalid_id, api_update_university, api_update_university_invalid_id,
    bad_request, index, internal_error, not_found, unprocessable,
};
use telemetry::TelemetryFairing;

pub fn init_rocket(pool: SqlitePool) -> Rocket<Build> {
    info!("Starting campus registry");

    rocket::build()
        .manage(pool)
        .mount("/", routes![index])
        .mount(
            "/api",
            routes![
                api_get_universities,
                api_get_university,
                api_get_university_invalid_id,
                api_create_university,
                api_update_university,
                api_update_university_invalid_id,
                api_delete_university,
                api_delete_university_invalid_id,
                api_get_students,
                api_get_student,
                api_get_student_invalid_id,
                api_create_student,
                api_update_student,
                api_update_student_invalid_id,
                api_delete_student,
                api_delete_student_invalid_id,
            ],
        )
        .register(
            "/",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .attach(TelemetryFairing)
}
