//! Typed wrapper over the REST surface. One method per router operation;
//! each call resolves to exactly one value or one error.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::ErrorBody;
use crate::models::{Student, University};

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server replied with a non-success status; `message` carries the
    /// body's `error` string when one was present.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewUniversity {
    pub name: String,
    pub location: String,
}

#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UniversityChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub faculty_number: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub university_id: i64,
}

#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// `Some(None)` serializes as `null` and clears the stored middle name;
    /// `None` leaves the field out of the request entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_id: Option<i64>,
}

#[async_trait]
pub trait UniversityApi {
    async fn get_universities(&self) -> Result<Vec<University>, ClientError>;
    async fn get_university(&self, id: i64) -> Result<University, ClientError>;
    async fn create_university(&self, university: &NewUniversity)
    -> Result<University, ClientError>;
    async fn update_university(
        &self,
        id: i64,
        changes: &UniversityChanges,
    ) -> Result<University, ClientError>;
    async fn delete_university(&self, id: i64) -> Result<(), ClientError>;
}

#[async_trait]
pub trait StudentApi {
    async fn get_students(&self) -> Result<Vec<Student>, ClientError>;
    async fn get_student(&self, id: i64) -> Result<Student, ClientError>;
    async fn create_student(&self, student: &NewStudent) -> Result<Student, ClientError>;
    async fn update_student(
        &self,
        id: i64,
        changes: &StudentChanges,
    ) -> Result<Student, ClientError>;
    async fn delete_student(&self, id: i64) -> Result<(), ClientError>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn expect_empty(response: reqwest::Response) -> Result<(), ClientError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn api_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("request failed with status {}", status),
        };
        ClientError::Api { status, message }
    }
}

#[async_trait]
impl UniversityApi for ApiClient {
    async fn get_universities(&self) -> Result<Vec<University>, ClientError> {
        let response = self.http.get(self.url("/universities")).send().await?;
        Self::decode(response).await
    }

    async fn get_university(&self, id: i64) -> Result<University, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/universities/{}", id)))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_university(
        &self,
        university: &NewUniversity,
    ) -> Result<University, ClientError> {
        let response = self
            .http
            .post(self.url("/universities"))
            .json(university)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_university(
        &self,
        id: i64,
        changes: &UniversityChanges,
    ) -> Result<University, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/universities/{}", id)))
            .json(changes)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_university(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/universities/{}", id)))
            .send()
            .await?;
        Self::expect_empty(response).await
    }
}

#[async_trait]
impl StudentApi for ApiClient {
    async fn get_students(&self) -> Result<Vec<Student>, ClientError> {
        let response = self.http.get(self.url("/students")).send().await?;
        Self::decode(response).await
    }

    async fn get_student(&self, id: i64) -> Result<Student, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/students/{}", id)))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_student(&self, student: &NewStudent) -> Result<Student, ClientError> {
        let response = self
            .http
            .post(self.url("/students"))
            .json(student)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_student(
        &self,
        id: i64,
        changes: &StudentChanges,
    ) -> Result<Student, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/students/{}", id)))
            .json(changes)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_student(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/students/{}", id)))
            .send()
            .await?;
        Self::expect_empty(response).await
    }
}
