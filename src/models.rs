use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub id: i64,
    pub name: String,
    pub location: String,
}

/// A student record as served over the API: the foreign key plus the joined
/// university row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub faculty_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub university_id: i64,
    pub university: University,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbUniversity {
    pub id: i64,
    pub name: String,
    pub location: String,
}

impl From<DbUniversity> for University {
    fn from(row: DbUniversity) -> Self {
        Self {
            id: row.id,
            name: row.name,
            location: row.location,
        }
    }
}

/// One row of the students-joined-to-universities query.
#[derive(sqlx::FromRow, Clone)]
pub struct DbStudent {
    pub id: i64,
    pub faculty_number: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub university_id: i64,
    pub university_name: String,
    pub university_location: String,
}

impl From<DbStudent> for Student {
    fn from(row: DbStudent) -> Self {
        Self {
            id: row.id,
            faculty_number: row.faculty_number,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            university_id: row.university_id,
            university: University {
                id: row.university_id,
                name: row.university_name,
                location: row.university_location,
            },
        }
    }
}
