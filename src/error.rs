use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use snafu::Snafu;
use std::{error::Error, num::ParseIntError};

pub type RecordResult<T> = Result<T, RecordError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RecordError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Duplicate value {value:?} for unique field `{field}`"))]
    DuplicateValue { field: &'static str, value: String },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Missing required fields: {fields:?}"))]
    MissingFields { fields: Vec<&'static str> },
    #[snafu(display("Unable to read JSON body"))]
    BadJson { source: JsonRejection },
    #[snafu(display("Unable to parse JSON body"))]
    ParseJson { source: serde_json::Error },
    #[snafu(display("Unable to read query string"))]
    BadQuery { source: QueryRejection },
    #[snafu(display("No student matched the given credentials"))]
    InvalidCredentials,
    #[snafu(display("Unable to find student with ID: {:?}", student_id))]
    MissingStudent { student_id: String },
}

impl RecordError {
    pub const fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::OpenDatabase { .. } | Self::MakeQuery { .. } | Self::MigrateError { .. } => ISE,
            Self::DuplicateValue { .. } => ISE,
            Self::BadEnvVar { .. } | Self::ParsePort { .. } => ISE,
            Self::MissingFields { .. } | Self::BadJson { .. } | Self::ParseJson { .. } => BI,
            Self::BadQuery { .. } => BI,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::MissingStudent { .. } => NF,
        }
    }

    /// Text of the innermost failure, which is what store errors surface to clients.
    fn underlying_message(&self) -> String {
        let mut current: &dyn Error = self;
        while let Some(source) = current.source() {
            current = source;
        }
        current.to_string()
    }
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::MissingFields { .. } => json!({ "message": "All fields are required" }),
            Self::BadJson { source } => {
                json!({ "message": "Invalid request body", "error": source.body_text() })
            }
            Self::ParseJson { source } => {
                json!({ "message": "Invalid request body", "error": source.to_string() })
            }
            Self::BadQuery { source } => {
                json!({ "message": "Invalid query string", "error": source.body_text() })
            }
            Self::InvalidCredentials => json!({ "message": "Invalid credentials" }),
            Self::MissingStudent { .. } => json!({ "message": "Student not found" }),
            _ => json!({ "message": "Server error", "error": self.underlying_message() }),
        };

        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            warn!(%self, "Rejected request");
        }
        (status_code, Json(body)).into_response()
    }
}
