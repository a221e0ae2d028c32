use crate::data::{Document, FieldSpec, Schema};
use serde::{Deserialize, Serialize};

pub const STUDENT_SCHEMA: Schema = Schema {
    fields: &[
        FieldSpec::new("studentId", true, true),
        FieldSpec::new("name", true, false),
        FieldSpec::new("email", true, true),
        FieldSpec::new("password", true, false),
    ],
};

// passwords are stored and compared as given, nothing hashes them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Document for Student {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "studentId" => Some(&self.student_id),
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "password" => Some(&self.password),
            _ => None,
        }
    }
}

/// Body of `POST /register`. Every field is optional on the wire so that a missing one
/// becomes a validation failure instead of a JSON rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Document for RegisterForm {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "studentId" => self.student_id.as_deref(),
            "name" => self.name.as_deref(),
            "email" => self.email.as_deref(),
            "password" => self.password.as_deref(),
            _ => None,
        }
    }
}

impl RegisterForm {
    /// Returns the new student if every required field is present, otherwise the names of
    /// the fields that were not.
    pub fn into_student(self) -> Result<Student, Vec<&'static str>> {
        let missing = STUDENT_SCHEMA.missing_fields(&self);
        match self {
            Self {
                student_id: Some(student_id),
                name: Some(name),
                email: Some(email),
                password: Some(password),
            } if missing.is_empty() => Ok(Student {
                student_id,
                name,
                email,
                password,
            }),
            _ => Err(missing),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub student_id: Option<String>,
}

/// Fields `PUT /update/{id}` may change. `None` leaves the stored value alone.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl StudentChanges {
    /// Reads an update body the lenient way: a body that is empty or not sent as JSON
    /// changes nothing, only JSON that fails to parse is an error.
    pub fn from_body(content_type: Option<&str>, body: &[u8]) -> serde_json::Result<Self> {
        let is_json = content_type.is_some_and(|ct| ct.contains("json"));
        if !is_json || body.trim_ascii().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }

    pub fn apply_to(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(email) = self.email {
            student.email = email;
        }
    }
}

/// Match condition for [`crate::store::StudentStore::find_one`].
#[derive(Debug, Clone)]
pub struct StudentFilter {
    pub student_id: String,
    pub password: Option<String>,
}

impl StudentFilter {
    pub fn by_id(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            password: None,
        }
    }

    pub fn by_credentials(student_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            password: Some(password.into()),
        }
    }

    pub fn matches(&self, student: &Student) -> bool {
        student.student_id == self.student_id
            && self
                .password
                .as_ref()
                .is_none_or(|password| *password == student.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ada() -> Student {
        Student {
            student_id: "S1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "hunter2".into(),
        }
    }

    #[test]
    fn serialises_with_camel_case_names() {
        let value = serde_json::to_value(ada()).unwrap();
        assert_eq!(
            value,
            json!({"studentId": "S1", "name": "Ada", "email": "ada@example.com", "password": "hunter2"})
        );
    }

    #[test]
    fn register_form_with_every_field_becomes_a_student() {
        let form: RegisterForm = serde_json::from_value(
            json!({"studentId": "S1", "name": "Ada", "email": "ada@example.com", "password": "hunter2"}),
        )
        .unwrap();
        assert_eq!(form.into_student().unwrap(), ada());
    }

    #[test]
    fn register_form_reports_absent_and_blank_fields() {
        let form: RegisterForm =
            serde_json::from_value(json!({"studentId": "S1", "name": ""})).unwrap();
        assert_eq!(
            form.into_student().unwrap_err(),
            vec!["name", "email", "password"]
        );
    }

    #[test]
    fn changes_only_touch_provided_fields() {
        let mut student = ada();
        StudentChanges {
            name: Some("Grace".into()),
            email: None,
        }
        .apply_to(&mut student);

        assert_eq!(student.name, "Grace");
        assert_eq!(student.email, "ada@example.com");
        assert_eq!(student.password, "hunter2");
    }

    #[test]
    fn update_body_without_json_changes_nothing() {
        for (content_type, body) in [
            (None, &b""[..]),
            (Some("application/json"), &b"  "[..]),
            (Some("text/plain"), &br#"{"name": "Grace"}"#[..]),
        ] {
            let changes = StudentChanges::from_body(content_type, body).unwrap();
            assert!(changes.name.is_none() && changes.email.is_none());
        }
    }

    #[test]
    fn update_body_with_json_is_parsed_or_rejected() {
        let changes =
            StudentChanges::from_body(Some("application/json"), br#"{"email": "g@x.com"}"#)
                .unwrap();
        assert_eq!(changes.email.as_deref(), Some("g@x.com"));
        assert!(changes.name.is_none());

        assert!(StudentChanges::from_body(Some("application/json"), b"{name").is_err());
    }

    #[test]
    fn filter_checks_password_only_when_given() {
        let student = ada();
        assert!(StudentFilter::by_id("S1").matches(&student));
        assert!(StudentFilter::by_credentials("S1", "hunter2").matches(&student));
        assert!(!StudentFilter::by_credentials("S1", "wrong").matches(&student));
        assert!(!StudentFilter::by_id("S2").matches(&student));
    }
}
