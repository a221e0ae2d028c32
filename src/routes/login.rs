use crate::{
    data::student::{LoginForm, StudentFilter},
    error::{BadJsonSnafu, InvalidCredentialsSnafu, RecordResult},
    routes::students::StudentMessage,
    state::RecordState,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use snafu::{OptionExt, ResultExt};

pub async fn post_login(
    State(state): State<RecordState>,
    form: Result<Json<LoginForm>, JsonRejection>,
) -> RecordResult<Json<StudentMessage>> {
    let Json(LoginForm {
        student_id,
        password,
    }) = form.context(BadJsonSnafu)?;

    // absent fields arrive as "", which no registered student can have
    let student = state
        .find_one(StudentFilter::by_credentials(student_id, password))
        .await?
        .context(InvalidCredentialsSnafu)?;
    debug!(student_id = %student.student_id, "Login succeeded");

    Ok(Json(StudentMessage::new("Login successful", student)))
}
