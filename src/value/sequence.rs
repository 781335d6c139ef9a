use std::{cell::RefCell, rc::Rc};

use crate::{
    error::{Error, Result},
    value::Value,
};

/// A shared, ordered list of values.
#[derive(Clone, Default)]
pub struct Sequence {
    items: Rc<RefCell<Vec<Value>>>,
}

impl Sequence {
    pub fn new() -> Self {
        Sequence::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    /// Like `get`, but reads past the end as `Missing`.
    pub fn at(&self, index: usize) -> Value {
        self.get(index).unwrap_or_default()
    }

    pub fn push(&self, value: Value) {
        self.items.borrow_mut().push(value);
    }

    pub fn set(&self, index: usize, value: Value) -> Result<()> {
        let mut items = self.items.borrow_mut();
        *items
            .get_mut(index)
            .ok_or_else(|| Error::new_invalid_argument_error("Index out of bounds."))? = value;
        Ok(())
    }

    /// Copies the current elements out.
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.items) as *const () as usize
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(items: Vec<Value>) -> Self {
        Sequence {
            items: Rc::new(RefCell::new(items)),
        }
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Sequence::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Extend<Value> for Sequence {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.items.borrow_mut().extend(iter);
    }
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&Value::Sequence(self.clone()), f)
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        Value::Sequence(self.clone()) == Value::Sequence(other.clone())
    }
}
