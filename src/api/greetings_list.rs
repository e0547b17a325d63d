#![forbid(unsafe_code)]

use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, ApiResponse, payload::{Json, PlainText}};
use anyhow::Result;
use log::error;

use crate::utils::db_types::Greeting;
use crate::utils::greeting_utils::{self, RequestDebug};
use crate::utils::store::GreetingStore;

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct ListGreetingsApi {
    store: Arc<dyn GreetingStore>,
}

struct ReqListGreetings
{
    // No query parameters are accepted.
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqListGreetings {
    type Req = ReqListGreetings;
    fn get_request_info(&self) -> String {
        "  Request body:".to_string()
    }
}

// ------------------- HTTP Status Codes -------------------
#[derive(Debug, ApiResponse)]
enum ListResponse {
    #[oai(status = 200)]
    Http200(Json<Vec<Greeting>>),
    #[oai(status = 500)]
    Http500(PlainText<String>),
}

fn make_http_200(resp: Vec<Greeting>) -> ListResponse {
    ListResponse::Http200(Json(resp))
}
fn make_http_500(msg: String) -> ListResponse {
    ListResponse::Http500(PlainText(msg))
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl ListGreetingsApi {
    #[oai(path = "/greetings", method = "get")]
    async fn list_greetings(&self, http_req: &Request) -> ListResponse {
        let req = ReqListGreetings {};

        // -------------------- Process Request ----------------------
        match self.process(http_req, &req).await {
            Ok(r) => make_http_200(r),
            Err(e) => {
                let msg = "ERROR: ".to_owned() + e.to_string().as_str();
                error!("{}", msg);
                make_http_500(msg)
            }
        }
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl ListGreetingsApi {
    pub fn new(store: Arc<dyn GreetingStore>) -> Self {
        Self {store}
    }

    async fn process(&self, http_req: &Request, req: &ReqListGreetings) -> Result<Vec<Greeting>> {
        // Conditional logging depending on log level.
        greeting_utils::debug_request(http_req, req);

        self.store.find_all().await
    }
}
