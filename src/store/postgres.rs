use crate::{
    data::student::{STUDENT_SCHEMA, Student, StudentChanges, StudentFilter},
    error::{MakeQuerySnafu, MigrateSnafu, MissingFieldsSnafu, RecordResult},
    store::StudentStore,
};
use async_trait::async_trait;
use snafu::{ResultExt, ensure};
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// `studentId` and `email` uniqueness come from the table constraints in `migrations/`.
///
/// Migrations run on the first operation that reaches the database and are retried until
/// they succeed, so a database that is down at startup is usable once it comes up.
#[derive(Clone, Debug)]
pub struct PgStudentStore {
    pool: Pool<Postgres>,
    migrated: Arc<OnceCell<()>>,
}

impl PgStudentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            migrated: Arc::new(OnceCell::new()),
        }
    }

    pub async fn migrate(&self) -> RecordResult<()> {
        self.migrated
            .get_or_try_init(|| async {
                sqlx::migrate!().run(&self.pool).await.context(MigrateSnafu)
            })
            .await?;
        Ok(())
    }

    pub fn is_migrated(&self) -> bool {
        self.migrated.initialized()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn insert(&self, student: Student) -> RecordResult<Student> {
        let fields = STUDENT_SCHEMA.missing_fields(&student);
        ensure!(fields.is_empty(), MissingFieldsSnafu { fields });
        self.migrate().await?;

        sqlx::query_as::<_, Student>(
            "INSERT INTO public.students (student_id, name, email, password) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(student.student_id)
        .bind(student.name)
        .bind(student.email)
        .bind(student.password)
        .fetch_one(&self.pool)
        .await
        .context(MakeQuerySnafu)
    }

    async fn find_one(&self, filter: StudentFilter) -> RecordResult<Option<Student>> {
        self.migrate().await?;
        let StudentFilter {
            student_id,
            password,
        } = filter;

        let query = match password {
            Some(password) => sqlx::query_as::<_, Student>(
                "SELECT * FROM public.students WHERE student_id = $1 AND password = $2",
            )
            .bind(student_id)
            .bind(password),
            None => sqlx::query_as::<_, Student>(
                "SELECT * FROM public.students WHERE student_id = $1",
            )
            .bind(student_id),
        };

        query
            .fetch_optional(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }

    async fn find_and_update(
        &self,
        student_id: &str,
        changes: StudentChanges,
    ) -> RecordResult<Option<Student>> {
        self.migrate().await?;
        //a clashing email fails on the table's UNIQUE constraint
        sqlx::query_as::<_, Student>(
            "UPDATE public.students SET name = COALESCE($2, name), email = COALESCE($3, email) WHERE student_id = $1 RETURNING *",
        )
        .bind(student_id)
        .bind(changes.name)
        .bind(changes.email)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)
    }

    async fn find_and_delete(&self, student_id: &str) -> RecordResult<Option<Student>> {
        self.migrate().await?;
        sqlx::query_as::<_, Student>(
            "DELETE FROM public.students WHERE student_id = $1 RETURNING *",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)
    }
}
