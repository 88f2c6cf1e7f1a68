#[cfg(test)]
pub mod test_db {
    use std::collections::HashMap;

    use rocket::local::asynchronous::Client;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::{Pool, Sqlite};

    use crate::db::{create_student, create_university};
    use crate::error::AppError;
    use crate::init_rocket;

    #[derive(Default)]
    pub struct TestDbBuilder {
        universities: Vec<TestUniversity>,
        students: Vec<TestStudent>,
    }

    struct TestUniversity {
        name: String,
        location: String,
    }

    struct TestStudent {
        faculty_number: String,
        first_name: String,
        middle_name: Option<String>,
        last_name: String,
        university_name: String,
    }

    impl TestDbBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn university(mut self, name: &str, location: &str) -> Self {
            self.universities.push(TestUniversity {
                name: name.to_string(),
                location: location.to_string(),
            });
            self
        }

        pub fn student(
            mut self,
            faculty_number: &str,
            first_name: &str,
            middle_name: Option<&str>,
            last_name: &str,
            university_name: &str,
        ) -> Self {
            self.students.push(TestStudent {
                faculty_number: faculty_number.to_string(),
                first_name: first_name.to_string(),
                middle_name: middle_name.map(String::from),
                last_name: last_name.to_string(),
                university_name: university_name.to_string(),
            });
            self
        }

        pub async fn build(self) -> Result<TestDb, AppError> {
            // Single connection so every query sees the same in-memory store.
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .map_err(AppError::Database)?;

            sqlx::migrate!("./migrations").run(&pool).await?;

            let mut university_id_map: HashMap<String, i64> = HashMap::new();
            let mut student_id_map: HashMap<String, i64> = HashMap::new();

            for u in &self.universities {
                let created = create_university(&pool, &u.name, &u.location).await?;
                university_id_map.insert(u.name.clone(), created.id);
            }

            for s in &self.students {
                let university_id = university_id_map
                    .get(&s.university_name)
                    .copied()
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "Test fixture references unknown university {}",
                            s.university_name
                        ))
                    })?;

                let created = create_student(
                    &pool,
                    &s.faculty_number,
                    &s.first_name,
                    s.middle_name.as_deref(),
                    &s.last_name,
                    university_id,
                )
                .await?;
                student_id_map.insert(s.faculty_number.clone(), created.id);
            }

            Ok(TestDb {
                pool,
                university_id_map,
                student_id_map,
            })
        }
    }

    pub struct TestDb {
        pub pool: Pool<Sqlite>,
        pub university_id_map: HashMap<String, i64>,
        pub student_id_map: HashMap<String, i64>,
    }

    impl TestDb {
        pub fn university_id(&self, name: &str) -> Option<i64> {
            self.university_id_map.get(name).copied()
        }

        pub fn student_id(&self, faculty_number: &str) -> Option<i64> {
            self.student_id_map.get(faculty_number).copied()
        }
    }

    /// One university plus one enrolled student, enough for most tests.
    pub async fn create_standard_test_db() -> TestDb {
        TestDbBuilder::new()
            .university("Tech University", "Boston")
            .university("State University", "New York")
            .student("FN001", "John", Some("Michael"), "Doe", "Tech University")
            .build()
            .await
            .expect("Failed to build test DB")
    }

    pub async fn setup_test_client(test_db: TestDb) -> (Client, TestDb) {
        let client = Client::tracked(init_rocket(test_db.pool.clone()))
            .await
            .expect("Failed to build test client");
        (client, test_db)
    }
}
