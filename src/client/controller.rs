//! Form controllers: one per entity, owning the form, the loaded list, an
//! explicit operation state, an error slot, and at most one record being
//! edited. Transitions follow the submit/edit/delete lifecycle; every
//! operation ends back in `Idle`.

use crate::client::api::{
    ClientError, StudentApi, StudentChanges, UniversityApi, UniversityChanges,
};
use crate::client::forms::{StudentForm, UniversityForm};
use crate::models::{Student, University};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    Loading,
    Creating,
    Updating,
    Deleting,
}

/// Label/value pair for a university select widget.
#[derive(Debug, Clone, PartialEq)]
pub struct UniversityOption {
    pub label: String,
    pub value: i64,
}

fn action_error(action: &str, entity: &str, err: &ClientError) -> String {
    format!("Failed to {} {}: {}", action, entity, err)
}

#[derive(Default)]
pub struct UniversityController {
    pub form: UniversityForm,
    pub universities: Vec<University>,
    pub state: ControllerState,
    pub error: Option<String>,
    pub editing: Option<University>,
}

impl UniversityController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.state != ControllerState::Idle
    }

    pub async fn load<A: UniversityApi>(&mut self, api: &A) {
        self.state = ControllerState::Loading;
        self.error = None;
        match api.get_universities().await {
            Ok(universities) => self.universities = universities,
            Err(err) => self.error = Some(action_error("load", "universities", &err)),
        }
        self.state = ControllerState::Idle;
    }

    /// An invalid form is marked touched and submitted nowhere. Otherwise a
    /// pending edit turns the submit into an update, else a create.
    pub async fn submit<A: UniversityApi>(&mut self, api: &A) {
        if !self.form.is_valid() {
            self.form.mark_all_touched();
            return;
        }
        self.error = None;

        let payload = self.form.payload();

        match self.editing.as_ref().map(|u| u.id) {
            Some(id) => {
                self.state = ControllerState::Updating;
                let changes = UniversityChanges {
                    name: Some(payload.name),
                    location: Some(payload.location),
                };
                match api.update_university(id, &changes).await {
                    Ok(updated) => {
                        if let Some(entry) =
                            self.universities.iter_mut().find(|u| u.id == updated.id)
                        {
                            *entry = updated;
                        }
                        self.editing = None;
                        self.form.reset();
                    }
                    Err(err) => {
                        // Edit state survives the failure so the user can retry.
                        self.error = Some(action_error("update", "university", &err));
                    }
                }
            }
            None => {
                self.state = ControllerState::Creating;
                match api.create_university(&payload).await {
                    Ok(created) => {
                        self.universities.push(created);
                        self.form.reset();
                    }
                    Err(err) => {
                        self.error = Some(action_error("create", "university", &err));
                    }
                }
            }
        }
        self.state = ControllerState::Idle;
    }

    pub fn edit(&mut self, university: &University) {
        self.form.fill_from(university);
        self.editing = Some(university.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.reset();
    }

    /// Caller confirms with the user before invoking this.
    pub async fn delete<A: UniversityApi>(&mut self, api: &A, id: i64) {
        self.state = ControllerState::Deleting;
        self.error = None;
        match api.delete_university(id).await {
            Ok(()) => self.universities.retain(|u| u.id != id),
            Err(err) => self.error = Some(action_error("delete", "university", &err)),
        }
        self.state = ControllerState::Idle;
    }
}

#[derive(Default)]
pub struct StudentController {
    pub form: StudentForm,
    pub students: Vec<Student>,
    pub university_options: Vec<UniversityOption>,
    pub state: ControllerState,
    pub error: Option<String>,
    pub editing: Option<Student>,
}

impl StudentController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.state != ControllerState::Idle
    }

    pub async fn load<A: StudentApi>(&mut self, api: &A) {
        self.state = ControllerState::Loading;
        self.error = None;
        match api.get_students().await {
            Ok(students) => self.students = students,
            Err(err) => self.error = Some(action_error("load", "students", &err)),
        }
        self.state = ControllerState::Idle;
    }

    pub async fn load_universities<A: UniversityApi>(&mut self, api: &A) {
        match api.get_universities().await {
            Ok(universities) => {
                self.university_options = universities
                    .into_iter()
                    .map(|u| UniversityOption {
                        label: format!("{} ({})", u.name, u.location),
                        value: u.id,
                    })
                    .collect();
            }
            Err(err) => self.error = Some(action_error("load", "universities", &err)),
        }
    }

    pub async fn submit<A: StudentApi>(&mut self, api: &A) {
        if !self.form.is_valid() {
            self.form.mark_all_touched();
            return;
        }
        self.error = None;

        let Some(payload) = self.form.payload() else {
            self.form.mark_all_touched();
            return;
        };

        match self.editing.as_ref().map(|s| s.id) {
            Some(id) => {
                self.state = ControllerState::Updating;
                let changes = StudentChanges {
                    faculty_number: Some(payload.faculty_number),
                    first_name: Some(payload.first_name),
                    // Always sent on edit so a blanked middle name is cleared
                    // server-side rather than silently kept.
                    middle_name: Some(payload.middle_name),
                    last_name: Some(payload.last_name),
                    university_id: Some(payload.university_id),
                };
                match api.update_student(id, &changes).await {
                    Ok(updated) => {
                        if let Some(entry) = self.students.iter_mut().find(|s| s.id == updated.id)
                        {
                            *entry = updated;
                        }
                        self.editing = None;
                        self.form.reset();
                    }
                    Err(err) => {
                        self.error = Some(action_error("update", "student", &err));
                    }
                }
            }
            None => {
                self.state = ControllerState::Creating;
                match api.create_student(&payload).await {
                    Ok(created) => {
                        self.students.push(created);
                        self.form.reset();
                    }
                    Err(err) => {
                        self.error = Some(action_error("create", "student", &err));
                    }
                }
            }
        }
        self.state = ControllerState::Idle;
    }

    pub fn edit(&mut self, student: &Student) {
        self.form.fill_from(student);
        self.editing = Some(student.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.reset();
    }

    pub async fn delete<A: StudentApi>(&mut self, api: &A, id: i64) {
        self.state = ControllerState::Deleting;
        self.error = None;
        match api.delete_student(id).await {
            Ok(()) => self.students.retain(|s| s.id != id),
            Err(err) => self.error = Some(action_error("delete", "student", &err)),
        }
        self.state = ControllerState::Idle;
    }
}
