use crate::{
    data::student::{RegisterForm, SearchQuery, Student, StudentChanges, StudentFilter},
    error::{
        BadJsonSnafu, BadQuerySnafu, MissingFieldsSnafu, MissingStudentSnafu, ParseJsonSnafu,
        RecordResult,
    },
    state::RecordState,
};
use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
};
use serde::Serialize;
use snafu::{OptionExt, ResultExt};

#[derive(Debug, Serialize)]
pub struct StudentMessage {
    pub message: &'static str,
    pub student: Student,
}

impl StudentMessage {
    pub const fn new(message: &'static str, student: Student) -> Self {
        Self { message, student }
    }
}

pub async fn post_register(
    State(state): State<RecordState>,
    form: Result<Json<RegisterForm>, JsonRejection>,
) -> RecordResult<(StatusCode, Json<StudentMessage>)> {
    let Json(form) = form.context(BadJsonSnafu)?;
    let student = match form.into_student() {
        Ok(student) => student,
        Err(fields) => return MissingFieldsSnafu { fields }.fail(),
    };

    let student = state.insert(student).await?;
    info!(student_id = %student.student_id, "Registered student");

    Ok((
        StatusCode::CREATED,
        Json(StudentMessage::new("Student registered successfully", student)),
    ))
}

pub async fn get_search(
    State(state): State<RecordState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> RecordResult<Json<Student>> {
    let Query(SearchQuery { student_id }) = query.context(BadQuerySnafu)?;
    let student_id = student_id.unwrap_or_default();

    let student = state
        .find_one(StudentFilter::by_id(student_id.as_str()))
        .await?
        .context(MissingStudentSnafu { student_id })?;

    Ok(Json(student))
}

pub async fn put_update(
    State(state): State<RecordState>,
    Path(student_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> RecordResult<Json<StudentMessage>> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok());
    let changes = StudentChanges::from_body(content_type, &body).context(ParseJsonSnafu)?;

    let student = state
        .find_and_update(&student_id, changes)
        .await?
        .context(MissingStudentSnafu { student_id })?;
    info!(student_id = %student.student_id, "Updated student");

    Ok(Json(StudentMessage::new(
        "Profile updated successfully",
        student,
    )))
}

pub async fn delete_student(
    State(state): State<RecordState>,
    Path(student_id): Path<String>,
) -> RecordResult<Json<StudentMessage>> {
    let student = state
        .find_and_delete(&student_id)
        .await?
        .context(MissingStudentSnafu { student_id })?;
    info!(student_id = %student.student_id, "Deleted student");

    Ok(Json(StudentMessage::new(
        "Student deleted successfully",
        student,
    )))
}
