use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::repository::traits::KeyValueStore;

/// Volatile store for embedding and tests. Can be told to fail every call.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
            failing: true,
        }
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.values.borrow_mut().insert(key.to_string(), value.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        if self.failing {
            return Err(anyhow!("Store unavailable while loading '{}'", key));
        }
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        if self.failing {
            return Err(anyhow!("Store unavailable while saving '{}'", key));
        }
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
