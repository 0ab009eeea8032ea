use crate::errors::ServerError;
use crate::responses::status_for;
use crate::templates::desktop_layout;
use astra::{Body, Response, ResponseBuilder};
use maud::html;

/// Convert a ServerError into a proper HTML response page
pub fn html_error_response(err: ServerError) -> Response {
    let status = status_for(&err);
    let message = match &err {
        ServerError::NotFound => "No encontrado".to_string(),
        ServerError::BadRequest(msg) => msg.clone(),
        ServerError::DbError(_) | ServerError::InternalError => {
            log::error!("Page request failed: {err}");
            "Error interno del servidor".to_string()
        }
    };

    let page = desktop_layout(
        &format!("Error {status}"),
        html! {
            main class="container narrow" {
                h1 { "Error " (status) }
                p { (message) }
                p { a href="/" { "← Volver al inicio" } }
            }
        },
    );

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(page.into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
