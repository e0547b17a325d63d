#![forbid(unsafe_code)]

use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, ApiResponse, param::Query, payload::{Json, PlainText}};
use anyhow::Result;
use log::{error, info};

use crate::utils::db_types::Greeting;
use crate::utils::greeting_utils::{self, RequestDebug};
use crate::utils::store::GreetingStore;

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct CreateGreetingApi {
    store: Arc<dyn GreetingStore>,
}

struct ReqCreateGreeting
{
    content: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqCreateGreeting {
    type Req = ReqCreateGreeting;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request body:");
        s.push_str("\n    content: ");
        s.push_str(&self.content);
        s
    }
}

// ------------------- HTTP Status Codes -------------------
#[derive(Debug, ApiResponse)]
enum CreateResponse {
    #[oai(status = 200)]
    Http200(Json<Greeting>),
    #[oai(status = 500)]
    Http500(PlainText<String>),
}

fn make_http_200(resp: Greeting) -> CreateResponse {
    CreateResponse::Http200(Json(resp))
}
fn make_http_500(msg: String) -> CreateResponse {
    CreateResponse::Http500(PlainText(msg))
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl CreateGreetingApi {
    /// The content query parameter is required; its absence is rejected with 400.
    #[oai(path = "/greeting", method = "post")]
    async fn create_greeting(&self, http_req: &Request, content: Query<String>) -> CreateResponse {
        let req = ReqCreateGreeting {content: content.0};

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
impl CreateGreetingApi {
    pub fn new(store: Arc<dyn GreetingStore>) -> Self {
        Self {store}
    }

    async fn process(&self, http_req: &Request, req: &ReqCreateGreeting) -> Result<Greeting> {
        // Conditional logging depending on log level.
        greeting_utils::debug_request(http_req, req);

        // No deduplication, every call appends.
        let saved = self.store.save(Greeting::new(&req.content)).await?;
        info!("Greeting {} created.", saved.id().unwrap_or_default());
        Ok(saved)
    }
}
