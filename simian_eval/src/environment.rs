use std::{cell::RefCell, collections::HashMap, rc::Rc};

use log::debug;

use crate::types::Value;

/// A lexical scope. Closures and in-flight calls share scopes through
/// `Rc`, and parent links only ever point at ancestors.
#[derive(Debug, Default)]
pub struct Env {
    values: HashMap<String, Value>,
    pub parent: Option<Rc<RefCell<Env>>>,
}

impl Env {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn with_parent(parent: Rc<RefCell<Env>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            parent: Some(parent),
            ..Default::default()
        }))
    }

    /// Binds in this scope only, shadowing any outer binding.
    pub fn set(&mut self, name: &str, value: Value) {
        debug!("Set {name} -> {value}");
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        debug!("Get {name}");
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        if let Some(parent) = &self.parent {
            debug!("Get {name} from parent");
            return parent.borrow().get(name);
        }
        None
    }
}
