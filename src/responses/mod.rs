pub mod errors;
pub mod html;
pub mod json;

pub use crate::errors::ResultResp;
pub use errors::{json_error_response, status_for};
pub use html::{html_response, redirect};
pub use json::json_response;
