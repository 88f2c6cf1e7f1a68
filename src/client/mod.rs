pub mod api;
pub mod controller;
pub mod forms;

pub use api::{ApiClient, ClientError, StudentApi, UniversityApi};
pub use controller::{ControllerState, StudentController, UniversityController};
