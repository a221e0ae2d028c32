use crate::{
    routes::{
        login::post_login,
        students::{delete_student, get_search, post_register, put_update},
    },
    state::RecordState,
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

pub mod login;
pub mod students;

pub fn router(state: RecordState) -> Router {
    Router::new()
        .route("/register", post(post_register))
        .route("/login", post(post_login))
        .route("/search", get(get_search))
        .route("/update/{id}", put(put_update))
        .route("/delete/{student_id}", delete(delete_student))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
