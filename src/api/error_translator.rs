#![forbid(unsafe_code)]

use poem_openapi::{ApiResponse, payload::PlainText};
use log::error;

use crate::utils::errors::Errors;

// ------------------- HTTP Status Codes -------------------
/// Text responses shared by the greeting endpoints that return plain strings.
#[derive(Debug, ApiResponse)]
pub enum TextResponse {
    #[oai(status = 200)]
    Http200(PlainText<String>),
    #[oai(status = 400)]
    Http400(PlainText<String>),
    #[oai(status = 500)]
    Http500(PlainText<String>),
}

pub fn make_http_200(text: String) -> TextResponse {
    TextResponse::Http200(PlainText(text))
}
pub fn make_http_400(msg: String) -> TextResponse {
    TextResponse::Http400(PlainText(msg))
}
pub fn make_http_500(msg: String) -> TextResponse {
    TextResponse::Http500(PlainText(msg))
}

// ---------------------------------------------------------------------------
// translate:
// ---------------------------------------------------------------------------
/** Map a handler result onto an HTTP response.  Invalid arguments become a 400
 * whose body is the bare message; every other error is logged and becomes a 500.
 */
pub fn translate(result: Result<String, Errors>) -> TextResponse {
    match result {
        Ok(text) => make_http_200(text),
        Err(Errors::InvalidArgument(msg)) => make_http_400(msg),
        Err(e) => {
            let msg = "ERROR: ".to_owned() + e.to_string().as_str();
            error!("{}", msg);
            make_http_500(msg)
        }
    }
}
