#![forbid(unsafe_code)]

use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, param::Query};

use crate::api::error_translator::{translate, TextResponse};
use crate::api::{format_greeting, DEFAULT_NAME};
use crate::utils::db_types::Greeting;
use crate::utils::errors::Errors;
use crate::utils::greeting_utils::{self, RequestDebug};
use crate::utils::store::GreetingStore;

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct GetGreetingApi {
    store: Arc<dyn GreetingStore>,
}

struct ReqGetGreeting
{
    name: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqGetGreeting {
    type Req = ReqGetGreeting;
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
impl GetGreetingApi {
    #[oai(path = "/greeting", method = "get")]
    async fn get_greeting(&self, http_req: &Request, name: Query<Option<String>>) -> TextResponse {
        // Package the request parameters.  An empty name falls back to the default.
        let req = ReqGetGreeting {
            name: name.0.filter(|n| !n.is_empty()).unwrap_or_else(|| DEFAULT_NAME.to_string()),
        };

        // -------------------- Process Request ----------------------
        translate(self.process(http_req, &req).await)
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl GetGreetingApi {
    pub fn new(store: Arc<dyn GreetingStore>) -> Self {
        Self {store}
    }

    /// Build the greeting, save it and return the saved content.
    async fn process(&self, http_req: &Request, req: &ReqGetGreeting) -> Result<String, Errors> {
        // Conditional logging depending on log level.
        greeting_utils::debug_request(http_req, req);

        let greeting = Greeting::new(&format_greeting(&req.name));
        let saved = self.store.save(greeting).await
            .map_err(|e| Errors::StoreError(e.to_string()))?;
        Ok(saved.content().to_string())
    }
}
