//! Route handlers, one module per API area.

pub mod chatbot;
pub mod classifier;
pub mod hospitals;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use tracing::debug;

/// Unwrap a JSON body, treating a missing or malformed body as an empty one
/// so the request's own validation produces the error message.
pub(crate) fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            debug!(error = %rejection, "unusable JSON body");
            T::default()
        }
    }
}
