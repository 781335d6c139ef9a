use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::value::Value;

/// A shared map from string keys to values.
///
/// Keys enumerate in ascending order.
#[derive(Clone, Default)]
pub struct Mapping {
    entries: Rc<RefCell<BTreeMap<Rc<str>, Value>>>,
}

impl Mapping {
    pub fn new() -> Self {
        Mapping::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn insert(&self, key: impl Into<Rc<str>>, value: Value) -> Option<Value> {
        self.entries.borrow_mut().insert(key.into(), value)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.borrow_mut().remove(key)
    }

    pub fn keys(&self) -> Vec<Rc<str>> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Copies the current entries out, in enumeration order.
    pub fn entries(&self) -> Vec<(Rc<str>, Value)> {
        self.entries
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn ptr_eq(&self, other: &Mapping) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.entries) as *const () as usize
    }
}

impl<K> FromIterator<(K, Value)> for Mapping
where
    K: Into<Rc<str>>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
    {
        Mapping {
            entries: Rc::new(RefCell::new(
                iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            )),
        }
    }
}

impl std::fmt::Debug for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&Value::Mapping(self.clone()), f)
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        Value::Mapping(self.clone()) == Value::Mapping(other.clone())
    }
}
