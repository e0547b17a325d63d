// This file contains the greeting database structs and related definitions.
#![forbid(unsafe_code)]

use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::utils::greeting_utils::{timestamp_utc, timestamp_utc_to_str};

// ---------------------------------------------------------------------------
// greetings:
// ---------------------------------------------------------------------------
/// A greeting record.  The identifier is assigned by the store on first save.
#[derive(Object, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    id: Option<i64>,
    content: String,
    created: String,
}

impl Greeting {
    pub fn new(content: &str) -> Greeting {
        Greeting {
            id: None,
            content: content.to_string(),
            created: timestamp_utc_to_str(timestamp_utc()),
        }
    }

    /// Rebuild a greeting read back from a store.
    pub fn from_parts(id: i64, content: String, created: String) -> Greeting {
        Greeting { id: Some(id), content, created }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
    }

    pub(crate) fn with_id(mut self, id: i64) -> Greeting {
        self.id = Some(id);
        self
    }
}

impl Default for Greeting {
    fn default() -> Self {
        Greeting::new("")
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::Greeting;

    #[test]
    fn greeting_constructor() {
        let greeting = Greeting::new("Hello, Test!");
        assert_eq!(greeting.content(), "Hello, Test!");
        assert_eq!(greeting.id(), None);
        assert!(greeting.created().ends_with('Z'));
    }

    #[test]
    fn greeting_setters_and_getters() {
        let mut greeting = Greeting::default();
        assert_eq!(greeting.content(), "");
        greeting.set_content("Test Content");
        assert_eq!(greeting.content(), "Test Content");
    }

    #[test]
    fn greeting_json_shape() {
        let greeting = Greeting::from_parts(7, "Hi".to_string(), "2024-10-19T00:00:00.000000Z".to_string());
        let v = serde_json::to_value(&greeting).unwrap();
        assert_eq!(v["id"], 7);
        assert_eq!(v["content"], "Hi");
        assert_eq!(v["created"], "2024-10-19T00:00:00.000000Z");
    }
}
