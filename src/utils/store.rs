#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::RwLock;

use crate::utils::db_types::Greeting;
use crate::utils::errors::Errors;

// ***************************************************************************
//                              Store Capability
// ***************************************************************************
/// Persistence capability used by the greeting handlers.
///
/// `save` assigns the next identifier to a greeting that has none and
/// replaces the stored record when it already has one.  `find_all` yields
/// greetings in identifier order.
#[async_trait]
pub trait GreetingStore: Send + Sync {
    async fn save(&self, greeting: Greeting) -> Result<Greeting>;
    async fn find_all(&self) -> Result<Vec<Greeting>>;
}

// ***************************************************************************
//                              In-Memory Store
// ***************************************************************************
#[derive(Debug, Default)]
pub struct MemoryGreetingStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: i64,
    greetings: Vec<Greeting>,
}

impl MemoryGreetingStore {
    pub fn new() -> Self {
        MemoryGreetingStore::default()
    }
}

#[async_trait]
impl GreetingStore for MemoryGreetingStore {
    async fn save(&self, greeting: Greeting) -> Result<Greeting> {
        let mut inner = self.inner.write()
            .map_err(|e| anyhow!(Errors::StoreError(e.to_string())))?;

        let saved = match greeting.id() {
            None => {
                inner.next_id += 1;
                let saved = greeting.with_id(inner.next_id);
                inner.greetings.push(saved.clone());
                saved
            },
            Some(id) => {
                // Explicit ids must not be handed out again.
                if id > inner.next_id {
                    inner.next_id = id;
                }
                match inner.greetings.iter().position(|g| g.id() == Some(id)) {
                    Some(i) => inner.greetings[i].set_content(greeting.content()),
                    None => {
                        inner.greetings.push(greeting.clone());
                        inner.greetings.sort_by_key(|g| g.id());
                    },
                }
                greeting
            },
        };

        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<Greeting>> {
        let inner = self.inner.read()
            .map_err(|e| anyhow!(Errors::StoreError(e.to_string())))?;
        Ok(inner.greetings.clone())
    }
}
