use crate::{
    data::{
        Document,
        student::{STUDENT_SCHEMA, Student, StudentChanges, StudentFilter},
    },
    error::{DuplicateValueSnafu, MissingFieldsSnafu, RecordResult},
    store::StudentStore,
};
use async_trait::async_trait;
use snafu::ensure;
use tokio::sync::RwLock;

/// Keeps students in process memory. Every operation takes the lock once, so each is atomic
/// with respect to the others just like a single-row statement.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    students: RwLock<Vec<Student>>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }

    /// Fails if `candidate` shares a unique field with any stored student other than the one
    /// at `skip`.
    fn check_unique(
        students: &[Student],
        candidate: &Student,
        skip: Option<usize>,
    ) -> RecordResult<()> {
        for field in STUDENT_SCHEMA.unique_fields() {
            let Some(value) = candidate.field(field) else {
                continue;
            };
            let clash = students
                .iter()
                .enumerate()
                .filter(|(index, _)| Some(*index) != skip)
                .any(|(_, existing)| existing.field(field) == Some(value));

            ensure!(
                !clash,
                DuplicateValueSnafu {
                    field,
                    value: value.to_string(),
                }
            );
        }
        Ok(())
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn insert(&self, student: Student) -> RecordResult<Student> {
        let fields = STUDENT_SCHEMA.missing_fields(&student);
        ensure!(fields.is_empty(), MissingFieldsSnafu { fields });

        let mut students = self.students.write().await;
        Self::check_unique(&students, &student, None)?;
        students.push(student.clone());
        Ok(student)
    }

    async fn find_one(&self, filter: StudentFilter) -> RecordResult<Option<Student>> {
        Ok(self
            .students
            .read()
            .await
            .iter()
            .find(|student| filter.matches(student))
            .cloned())
    }

    async fn find_and_update(
        &self,
        student_id: &str,
        changes: StudentChanges,
    ) -> RecordResult<Option<Student>> {
        let mut students = self.students.write().await;
        let Some(index) = students.iter().position(|s| s.student_id == student_id) else {
            return Ok(None);
        };

        let mut updated = students[index].clone();
        changes.apply_to(&mut updated);
        Self::check_unique(&students, &updated, Some(index))?;

        students[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn find_and_delete(&self, student_id: &str) -> RecordResult<Option<Student>> {
        let mut students = self.students.write().await;
        let index = students.iter().position(|s| s.student_id == student_id);
        Ok(index.map(|index| students.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;

    fn student(id: &str, email: &str) -> Student {
        Student {
            student_id: id.into(),
            name: "Ada".into(),
            email: email.into(),
            password: "pw".into(),
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = MemoryStudentStore::new();
        let inserted = store.insert(student("S1", "a@x.com")).await.unwrap();

        let found = store.find_one(StudentFilter::by_id("S1")).await.unwrap();
        assert_eq!(found, Some(inserted));
    }

    #[tokio::test]
    async fn duplicate_id_or_email_is_rejected() {
        let store = MemoryStudentStore::new();
        store.insert(student("S1", "a@x.com")).await.unwrap();

        let err = store.insert(student("S1", "b@x.com")).await.unwrap_err();
        assert!(matches!(err, RecordError::DuplicateValue { field: "studentId", .. }));

        let err = store.insert(student("S2", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, RecordError::DuplicateValue { field: "email", .. }));

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn insert_rejects_blank_required_fields() {
        let store = MemoryStudentStore::new();
        let err = store.insert(student("S1", "")).await.unwrap_err();
        assert!(matches!(err, RecordError::MissingFields { .. }));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn credentials_filter_needs_matching_password() {
        let store = MemoryStudentStore::new();
        store.insert(student("S1", "a@x.com")).await.unwrap();

        let hit = store
            .find_one(StudentFilter::by_credentials("S1", "pw"))
            .await
            .unwrap();
        assert!(hit.is_some());

        let miss = store
            .find_one(StudentFilter::by_credentials("S1", "nope"))
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn update_returns_new_state_and_keeps_own_email() {
        let store = MemoryStudentStore::new();
        store.insert(student("S1", "a@x.com")).await.unwrap();

        let changes = StudentChanges {
            name: Some("Grace".into()),
            email: Some("a@x.com".into()),
        };
        let updated = store.find_and_update("S1", changes).await.unwrap().unwrap();
        assert_eq!(updated.name, "Grace");
        assert_eq!(updated.password, "pw");
    }

    #[tokio::test]
    async fn update_to_taken_email_fails_and_changes_nothing() {
        let store = MemoryStudentStore::new();
        store.insert(student("S1", "a@x.com")).await.unwrap();
        store.insert(student("S2", "b@x.com")).await.unwrap();

        let changes = StudentChanges {
            name: Some("Grace".into()),
            email: Some("b@x.com".into()),
        };
        assert!(store.find_and_update("S1", changes).await.is_err());

        let s1 = store.find_one(StudentFilter::by_id("S1")).await.unwrap().unwrap();
        assert_eq!(s1, student("S1", "a@x.com"));
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_id_find_nothing() {
        let store = MemoryStudentStore::new();
        assert!(
            store
                .find_and_update("S9", StudentChanges::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.find_and_delete("S9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_returns_prior_record() {
        let store = MemoryStudentStore::new();
        store.insert(student("S1", "a@x.com")).await.unwrap();

        let deleted = store.find_and_delete("S1").await.unwrap();
        assert_eq!(deleted, Some(student("S1", "a@x.com")));
        assert_eq!(store.len().await, 0);
    }
}
