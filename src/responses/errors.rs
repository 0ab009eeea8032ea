use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

pub fn status_for(err: &ServerError) -> u16 {
    match err {
        ServerError::NotFound => 404,
        ServerError::BadRequest(_) => 400,
        ServerError::DbError(_) | ServerError::InternalError => 500,
    }
}

/// `{ "error": ... }` with the matching status, for the JSON API.
/// Storage details stay in the log.
pub fn json_error_response(err: ServerError) -> Response {
    let status = status_for(&err);
    let message = match &err {
        ServerError::NotFound => "Lead no encontrado".to_string(),
        ServerError::BadRequest(msg) => msg.clone(),
        ServerError::DbError(_) | ServerError::InternalError => {
            log::error!("API request failed: {err}");
            "Error interno del servidor".to_string()
        }
    };

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(json!({ "error": message }).to_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
