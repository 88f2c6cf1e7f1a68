//! Reactive form state for the two entity forms, independent of any
//! rendering layer. Fields track their value and whether they have been
//! touched; error messages only show for touched fields.

use crate::client::api::{NewStudent, NewUniversity};
use crate::models::{Student, University};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const MIN_LENGTH_MESSAGE: &str = "Minimum length is 2 characters";

#[derive(Debug, Clone)]
pub struct FormField {
    pub value: String,
    pub touched: bool,
    required: bool,
    min_length: usize,
}

impl FormField {
    fn new(required: bool, min_length: usize) -> Self {
        Self {
            value: String::new(),
            touched: false,
            required,
            min_length,
        }
    }

    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.touched = true;
    }

    pub fn is_valid(&self) -> bool {
        if self.value.is_empty() {
            return !self.required;
        }
        self.value.chars().count() >= self.min_length
    }

    /// Required wins over min-length: an empty value reports "required",
    /// a short one reports the length message. Untouched fields stay quiet.
    pub fn error(&self) -> Option<&'static str> {
        if !self.touched {
            return None;
        }
        if self.value.is_empty() {
            return self.required.then_some(REQUIRED_MESSAGE);
        }
        (self.value.chars().count() < self.min_length).then_some(MIN_LENGTH_MESSAGE)
    }

    fn reset(&mut self) {
        self.value.clear();
        self.touched = false;
    }

    fn fill(&mut self, value: &str) {
        self.value = value.to_string();
        self.touched = false;
    }
}

#[derive(Debug, Clone)]
pub struct UniversityForm {
    pub name: FormField,
    pub location: FormField,
}

impl Default for UniversityForm {
    fn default() -> Self {
        Self {
            name: FormField::new(true, 2),
            location: FormField::new(true, 2),
        }
    }
}

impl UniversityForm {
    pub fn is_valid(&self) -> bool {
        self.name.is_valid() && self.location.is_valid()
    }

    pub fn mark_all_touched(&mut self) {
        self.name.touched = true;
        self.location.touched = true;
    }

    pub fn reset(&mut self) {
        self.name.reset();
        self.location.reset();
    }

    pub fn fill_from(&mut self, university: &University) {
        self.name.fill(&university.name);
        self.location.fill(&university.location);
    }

    pub fn payload(&self) -> NewUniversity {
        NewUniversity {
            name: self.name.value.clone(),
            location: self.location.value.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudentForm {
    pub faculty_number: FormField,
    pub first_name: FormField,
    pub middle_name: FormField,
    pub last_name: FormField,
    pub university_id: FormField,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self {
            faculty_number: FormField::new(true, 1),
            first_name: FormField::new(true, 2),
            middle_name: FormField::new(false, 0),
            last_name: FormField::new(true, 2),
            university_id: FormField::new(true, 1),
        }
    }
}

impl StudentForm {
    pub fn is_valid(&self) -> bool {
        self.faculty_number.is_valid()
            && self.first_name.is_valid()
            && self.middle_name.is_valid()
            && self.last_name.is_valid()
            && self.university_id.is_valid()
            && self.university_id_value().is_some()
    }

    pub fn mark_all_touched(&mut self) {
        self.faculty_number.touched = true;
        self.first_name.touched = true;
        self.middle_name.touched = true;
        self.last_name.touched = true;
        self.university_id.touched = true;
    }

    pub fn reset(&mut self) {
        self.faculty_number.reset();
        self.first_name.reset();
        self.middle_name.reset();
        self.last_name.reset();
        self.university_id.reset();
    }

    pub fn fill_from(&mut self, student: &Student) {
        self.faculty_number.fill(&student.faculty_number);
        self.first_name.fill(&student.first_name);
        self.middle_name
            .fill(student.middle_name.as_deref().unwrap_or(""));
        self.last_name.fill(&student.last_name);
        self.university_id.fill(&student.university_id.to_string());
    }

    pub fn university_id_value(&self) -> Option<i64> {
        self.university_id.value.parse().ok()
    }

    /// Builds the request body; empty middle name is sent as absent.
    pub fn payload(&self) -> Option<NewStudent> {
        Some(NewStudent {
            faculty_number: self.faculty_number.value.clone(),
            first_name: self.first_name.value.clone(),
            middle_name: (!self.middle_name.value.is_empty())
                .then(|| self.middle_name.value.clone()),
            last_name: self.last_name.value.clone(),
            university_id: self.university_id_value()?,
        })
    }
}
