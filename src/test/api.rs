#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Status};
    use serde_json::{Value, json};

    use crate::error::ErrorBody;
    use crate::models::{Student, University};
    use crate::test::{TestDbBuilder, create_standard_test_db, setup_test_client};

    #[rocket::async_test]
    async fn root_lists_available_endpoints() {
        let test_db = TestDbBuilder::new().build().await.expect("db");
        let (client, _) = setup_test_client(test_db).await;

        let response = client.get("/").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body: Value =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(body["message"], "Student-University API Server");
        assert!(body["endpoints"]["universities"]["GET /api/universities"].is_string());
        assert!(body["endpoints"]["students"]["POST /api/students"].is_string());
    }

    #[rocket::async_test]
    async fn create_university_returns_created_record() {
        let test_db = TestDbBuilder::new().build().await.expect("db");
        let (client, _) = setup_test_client(test_db).await;

        let response = client
            .post("/api/universities")
            .header(ContentType::JSON)
            .body(json!({"name": "Tech University", "location": "Boston"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Created);

        let created: University =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Tech University");
        assert_eq!(created.location, "Boston");

        // Get-by-id straight after create returns the same record.
        let response = client.get("/api/universities/1").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let fetched: University =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(fetched, created);
    }

    #[rocket::async_test]
    async fn create_university_with_missing_field_is_rejected() {
        let test_db = TestDbBuilder::new().build().await.expect("db");
        let (client, _) = setup_test_client(test_db).await;

        let response = client
            .post("/api/universities")
            .header(ContentType::JSON)
            .body(json!({"name": "Tech University"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);

        let body: ErrorBody =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(body.error, "location is required");

        let response = client.get("/api/universities").dispatch().await;
        let universities: Vec<University> =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(universities.is_empty());
    }

    #[rocket::async_test]
    async fn get_university_by_unknown_id_is_404() {
        let test_db = TestDbBuilder::new().build().await.expect("db");
        let (client, _) = setup_test_client(test_db).await;

        let response = client.get("/api/universities/99").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        let body: ErrorBody =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(body.error.contains("99"));
    }

    #[rocket::async_test]
    async fn non_numeric_id_is_a_bad_request() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        for request in [
            client.get("/api/universities/abc"),
            client.delete("/api/universities/abc"),
            client.get("/api/students/abc"),
            client.delete("/api/students/abc"),
        ] {
            let response = request.dispatch().await;
            assert_eq!(response.status(), Status::BadRequest);
            let body: ErrorBody =
                serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
            assert!(body.error.contains("abc"));
        }
    }

    #[rocket::async_test]
    async fn partial_university_update_leaves_other_fields_alone() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;
        let id = test_db.university_id("Tech University").expect("seed");

        let response = client
            .put(format!("/api/universities/{}", id))
            .header(ContentType::JSON)
            .body(json!({"location": "Cambridge"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let updated: University =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(updated.name, "Tech University");
        assert_eq!(updated.location, "Cambridge");

        let response = client.get(format!("/api/universities/{}", id)).dispatch().await;
        let fetched: University =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(fetched, updated);
    }

    #[rocket::async_test]
    async fn update_of_unknown_university_is_404() {
        let test_db = TestDbBuilder::new().build().await.expect("db");
        let (client, _) = setup_test_client(test_db).await;

        let response = client
            .put("/api/universities/7")
            .header(ContentType::JSON)
            .body(json!({"location": "Cambridge"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn delete_university_then_get_is_404() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;
        let id = test_db.university_id("State University").expect("seed");

        let response = client.delete(format!("/api/universities/{}", id)).dispatch().await;
        assert_eq!(response.status(), Status::NoContent);
        assert!(response.into_string().await.is_none());

        let response = client.get(format!("/api/universities/{}", id)).dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client.delete(format!("/api/universities/{}", id)).dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn delete_of_referenced_university_is_blocked() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;
        let id = test_db.university_id("Tech University").expect("seed");

        let response = client.delete(format!("/api/universities/{}", id)).dispatch().await;
        assert_eq!(response.status(), Status::Conflict);

        let body: ErrorBody =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(!body.error.is_empty());

        // Both the university and its student survive.
        let response = client.get(format!("/api/universities/{}", id)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let response = client.get("/api/students").dispatch().await;
        let students: Vec<Student> =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(students.len(), 1);
    }

    #[rocket::async_test]
    async fn create_student_includes_nested_university() {
        let test_db = TestDbBuilder::new()
            .university("Tech University", "Boston")
            .build()
            .await
            .expect("db");
        let (client, test_db) = setup_test_client(test_db).await;
        let university_id = test_db.university_id("Tech University").expect("seed");

        let response = client
            .post("/api/students")
            .header(ContentType::JSON)
            .body(
                json!({
                    "facultyNumber": "FN001",
                    "firstName": "John",
                    "lastName": "Doe",
                    "universityId": university_id,
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Created);
        let created: Student =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(created.faculty_number, "FN001");
        assert_eq!(created.middle_name, None);
        assert_eq!(created.university.name, "Tech University");
        assert_eq!(created.university.location, "Boston");
    }

    #[rocket::async_test]
    async fn create_student_with_unknown_university_is_rejected() {
        let test_db = TestDbBuilder::new().build().await.expect("db");
        let (client, _) = setup_test_client(test_db).await;

        let response = client
            .post("/api/students")
            .header(ContentType::JSON)
            .body(
                json!({
                    "facultyNumber": "FN001",
                    "firstName": "John",
                    "lastName": "Doe",
                    "universityId": 42,
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: ErrorBody =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(body.error.contains("42"));

        // No row was created.
        let response = client.get("/api/students").dispatch().await;
        let students: Vec<Student> =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(students.is_empty());
    }

    #[rocket::async_test]
    async fn create_student_with_missing_fields_is_rejected() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        let response = client
            .post("/api/students")
            .header(ContentType::JSON)
            .body(json!({"firstName": "John"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: ErrorBody =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(body.error.contains("facultyNumber is required"));
        assert!(body.error.contains("lastName is required"));
        assert!(body.error.contains("universityId is required"));
    }

    #[rocket::async_test]
    async fn duplicate_faculty_number_is_a_conflict() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;
        let university_id = test_db.university_id("Tech University").expect("seed");

        let response = client
            .post("/api/students")
            .header(ContentType::JSON)
            .body(
                json!({
                    "facultyNumber": "FN001",
                    "firstName": "Jane",
                    "lastName": "Smith",
                    "universityId": university_id,
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Conflict);

        let response = client.get("/api/students").dispatch().await;
        let students: Vec<Student> =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].first_name, "John");
    }

    #[rocket::async_test]
    async fn listing_students_populates_each_university() {
        let test_db = TestDbBuilder::new()
            .university("Tech University", "Boston")
            .university("State University", "New York")
            .student("FN001", "John", Some("Michael"), "Doe", "Tech University")
            .student("FN002", "Jane", None, "Smith", "State University")
            .build()
            .await
            .expect("db");
        let (client, _) = setup_test_client(test_db).await;

        let response = client.get("/api/students").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let students: Vec<Student> =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(students.len(), 2);
        for student in &students {
            assert!(!student.university.name.is_empty());
            assert!(!student.university.location.is_empty());
            assert_eq!(student.university.id, student.university_id);
        }
        assert_eq!(students[0].university.name, "Tech University");
        assert_eq!(students[1].university.name, "State University");
    }

    #[rocket::async_test]
    async fn partial_student_update_merges_fields() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;
        let id = test_db.student_id("FN001").expect("seed");

        let response = client
            .put(format!("/api/students/{}", id))
            .header(ContentType::JSON)
            .body(json!({"lastName": "Doering"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let updated: Student =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(updated.last_name, "Doering");
        assert_eq!(updated.first_name, "John");
        assert_eq!(updated.middle_name.as_deref(), Some("Michael"));
        assert_eq!(updated.faculty_number, "FN001");
        assert_eq!(updated.university.name, "Tech University");

        let response = client.get(format!("/api/students/{}", id)).dispatch().await;
        let fetched: Student =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(fetched, updated);
    }

    #[rocket::async_test]
    async fn student_can_transfer_university() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;
        let id = test_db.student_id("FN001").expect("seed");
        let state_id = test_db.university_id("State University").expect("seed");

        let response = client
            .put(format!("/api/students/{}", id))
            .header(ContentType::JSON)
            .body(json!({"universityId": state_id}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let updated: Student =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(updated.university_id, state_id);
        assert_eq!(updated.university.name, "State University");
    }

    #[rocket::async_test]
    async fn student_update_to_unknown_university_is_rejected() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;
        let id = test_db.student_id("FN001").expect("seed");

        let response = client
            .put(format!("/api/students/{}", id))
            .header(ContentType::JSON)
            .body(json!({"universityId": 42}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);

        // The student is unchanged.
        let response = client.get(format!("/api/students/{}", id)).dispatch().await;
        let fetched: Student =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(fetched.university.name, "Tech University");
    }

    #[rocket::async_test]
    async fn delete_student_then_get_is_404() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;
        let id = test_db.student_id("FN001").expect("seed");

        let response = client.delete(format!("/api/students/{}", id)).dispatch().await;
        assert_eq!(response.status(), Status::NoContent);

        let response = client.get(format!("/api/students/{}", id)).dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn created_ids_are_never_reused() {
        let test_db = TestDbBuilder::new().build().await.expect("db");
        let (client, _) = setup_test_client(test_db).await;

        let mut seen = Vec::new();
        for (name, location) in [("A U", "Here"), ("B U", "There"), ("C U", "Everywhere")] {
            let response = client
                .post("/api/universities")
                .header(ContentType::JSON)
                .body(json!({"name": name, "location": location}).to_string())
                .dispatch()
                .await;
            let created: University =
                serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
            assert!(!seen.contains(&created.id));
            seen.push(created.id);
        }

        // Delete the last one; the next id must still be fresh.
        let last = *seen.last().unwrap();
        client.delete(format!("/api/universities/{}", last)).dispatch().await;

        let response = client
            .post("/api/universities")
            .header(ContentType::JSON)
            .body(json!({"name": "D U", "location": "Nowhere"}).to_string())
            .dispatch()
            .await;
        let created: University =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(!seen.contains(&created.id));
    }

    #[rocket::async_test]
    async fn malformed_json_yields_error_body() {
        let test_db = TestDbBuilder::new().build().await.expect("db");
        let (client, _) = setup_test_client(test_db).await;

        let response = client
            .post("/api/universities")
            .header(ContentType::JSON)
            .body("{not json")
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: ErrorBody =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(!body.error.is_empty());
    }

    #[rocket::async_test]
    async fn type_mismatched_field_yields_bad_request() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db).await;

        let response = client
            .post("/api/students")
            .header(ContentType::JSON)
            .body(
                json!({
                    "facultyNumber": "FN777",
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "universityId": "not-a-number"
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: ErrorBody =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(!body.error.is_empty());
    }

    #[rocket::async_test]
    async fn student_middle_name_null_clears_while_absent_keeps() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;
        let id = test_db.student_id("FN001").expect("seed");

        // Absent field leaves the stored middle name alone.
        let response = client
            .put(format!("/api/students/{}", id))
            .header(ContentType::JSON)
            .body(json!({"firstName": "Jonathan"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let updated: Student =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(updated.middle_name.as_deref(), Some("Michael"));

        // Explicit null removes it.
        let response = client
            .put(format!("/api/students/{}", id))
            .header(ContentType::JSON)
            .body(json!({"middleName": null}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let cleared: Student =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(cleared.middle_name, None);

        let response = client.get(format!("/api/students/{}", id)).dispatch().await;
        let fetched: Student =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(fetched.middle_name, None);
    }

    #[rocket::async_test]
    async fn empty_required_string_is_rejected() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db).await;
        let id = test_db.university_id("Tech University").expect("seed");

        let response = client
            .put(format!("/api/universities/{}", id))
            .header(ContentType::JSON)
            .body(json!({"name": ""}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: ErrorBody =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(body.error, "name must not be empty");
    }
}
