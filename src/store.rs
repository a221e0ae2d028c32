use crate::{
    data::student::{Student, StudentChanges, StudentFilter},
    error::RecordResult,
};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

/// Persistence for students. Each method is a single atomic operation on one record;
/// uniqueness of `studentId` and `email` is enforced here, not by callers.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn insert(&self, student: Student) -> RecordResult<Student>;

    async fn find_one(&self, filter: StudentFilter) -> RecordResult<Option<Student>>;

    /// Returns the record as it is after the update.
    async fn find_and_update(
        &self,
        student_id: &str,
        changes: StudentChanges,
    ) -> RecordResult<Option<Student>>;

    /// Returns the record as it was before removal.
    async fn find_and_delete(&self, student_id: &str) -> RecordResult<Option<Student>>;
}
