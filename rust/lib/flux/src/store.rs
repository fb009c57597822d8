use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::pattern;
use crate::value::StateValue;

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

struct Subscription {
    pattern: String,
    handler: ChangeHandler,
}

/// Path-addressed view state with pattern subscriptions.
///
/// - `set(path, value)` stores a value and notifies matching subscribers.
/// - `get(path)` reads the current value (Arc clone).
/// - `remove(path)` drops a value without notifying.
/// - `subscribe(pattern, handler)` registers a change handler.
///
/// Handlers run synchronously on the writer's task, after the value lock
/// has been released, so a handler may read the store.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    subscriptions: RwLock<Vec<Subscription>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            subscriptions: RwLock::new(Vec::new()),
        }
    }

    /// Set a typed value at `path` and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    fn set_value(&self, path: &str, value: StateValue) {
        {
            let mut values = self.values.write().unwrap();
            values.insert(path.to_string(), value.clone());
        }
        let handlers: Vec<ChangeHandler> = {
            let subs = self.subscriptions.read().unwrap();
            subs.iter()
                .filter(|s| pattern::matches(&s.pattern, path))
                .map(|s| s.handler.clone())
                .collect()
        };
        for handler in handlers {
            handler(path, &value);
        }
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        let values = self.values.read().unwrap();
        values.get(path).cloned()
    }

    /// Typed read: clone the value at `path` if it has type `T`.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.downcast_ref::<T>().cloned())
    }

    /// Remove the value at `path`. Does NOT notify subscribers.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        let mut values = self.values.write().unwrap();
        values.remove(path)
    }

    /// Subscribe to changes on paths matching `pattern`.
    ///
    /// Subscriptions live as long as the store.
    pub fn subscribe<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        if !pattern::is_valid(pattern) {
            tracing::warn!(pattern, "subscription pattern is malformed and may never match");
        }
        let mut subs = self.subscriptions.write().unwrap();
        subs.push(Subscription {
            pattern: pattern.to_string(),
            handler: Arc::new(handler),
        });
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
