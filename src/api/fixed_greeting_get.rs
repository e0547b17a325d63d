#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{OpenApi, param::Query};

use crate::api::error_translator::{translate, TextResponse};
use crate::api::format_greeting;
use crate::utils::errors::Errors;
use crate::utils::greeting_utils::{self, RequestDebug};

const EMPTY_NAME_MSG: &str = "Name cannot be empty";

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct FixedGreetingApi;

struct ReqFixedGreeting
{
    name: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqFixedGreeting {
    type Req = ReqFixedGreeting;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request body:");
        s.push_str("\n    name: ");
        s.push_str(&self.name);
        s
    }
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl FixedGreetingApi {
    #[oai(path = "/greeting", method = "get")]
    async fn get_greeting(&self, http_req: &Request, name: Query<String>) -> TextResponse {
        let req = ReqFixedGreeting {name: name.0};

        // Conditional logging depending on log level.
        greeting_utils::debug_request(http_req, &req);

        translate(checked_greeting(&req.name))
    }
}

// ***************************************************************************
//                          Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// checked_greeting:
// ---------------------------------------------------------------------------
/** Format the greeting, rejecting an empty name.  No other validation. */
fn checked_greeting(name: &str) -> Result<String, Errors> {
    if name.is_empty() {
        return Err(Errors::InvalidArgument(EMPTY_NAME_MSG.to_string()));
    }
    Ok(format_greeting(name))
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_name() {
        assert_eq!(checked_greeting("Bud").unwrap(), "Hello, Bud!");
    }

    #[test]
    fn whitespace_is_not_empty() {
        assert_eq!(checked_greeting(" ").unwrap(), "Hello,  !");
    }

    #[test]
    fn empty_name_is_invalid() {
        match checked_greeting("") {
            Err(Errors::InvalidArgument(msg)) => assert_eq!(msg, "Name cannot be empty"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
