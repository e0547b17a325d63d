#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{OpenApi, payload::Json};

use crate::utils::greeting_utils::{self, RequestDebug};

// The constant list, in response order.
const FIXED_GREETINGS: [&str; 3] = ["Hello, World!", "Hello, Spring Boot!", "Hello, Thymeleaf!"];

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct FixedGreetingsListApi;

struct ReqFixedGreetingsList
{
    // No query parameters are accepted.
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqFixedGreetingsList {
    type Req = ReqFixedGreetingsList;
    fn get_request_info(&self) -> String {
        "  Request body:".to_string()
    }
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl FixedGreetingsListApi {
    #[oai(path = "/greetings", method = "get")]
    async fn list_greetings(&self, http_req: &Request) -> Json<Vec<String>> {
        // Conditional logging depending on log level.
        greeting_utils::debug_request(http_req, &ReqFixedGreetingsList {});

        Json(FIXED_GREETINGS.iter().map(|s| s.to_string()).collect())
    }
}
