//! The traversal primitives every other operation is built from.

use std::{fmt, rc::Rc};

use crate::{
    error::{Error, Result},
    value::{Mapping, Sequence, Value},
};

/// Where an entry sits in its collection.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(Rc<str>),
}

impl Key {
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }

    /// The key as a property name. Indexes are written in decimal.
    pub fn to_name(&self) -> Rc<str> {
        match self {
            Key::Index(i) => i.to_string().into(),
            Key::Name(name) => name.clone(),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => fmt::Debug::fmt(i, f),
            Key::Name(name) => fmt::Debug::fmt(&**name, f),
        }
    }
}

/// A value that can enumerate its entries.
///
/// Implementations enumerate a snapshot taken when the visit starts, so the
/// visitor may mutate the collection it is visiting. The first error returned
/// by the visitor ends the visit and is passed back unchanged.
pub trait Collection {
    fn visit_entries(&self, visitor: &mut dyn FnMut(&Value, &Key) -> Result<()>) -> Result<()>;
}

impl Collection for Sequence {
    fn visit_entries(&self, visitor: &mut dyn FnMut(&Value, &Key) -> Result<()>) -> Result<()> {
        let len = self.len();
        for index in 0..len {
            // The visitor may have shortened the sequence.
            let Some(item) = self.get(index) else {
                break;
            };
            visitor(&item, &Key::Index(index))?;
        }
        Ok(())
    }
}

impl Collection for Mapping {
    fn visit_entries(&self, visitor: &mut dyn FnMut(&Value, &Key) -> Result<()>) -> Result<()> {
        for (key, value) in self.entries() {
            visitor(&value, &Key::Name(key))?;
        }
        Ok(())
    }
}

impl Collection for Value {
    fn visit_entries(&self, visitor: &mut dyn FnMut(&Value, &Key) -> Result<()>) -> Result<()> {
        match self {
            Value::Sequence(s) => s.visit_entries(visitor),
            Value::Mapping(m) => m.visit_entries(visitor),
            _ => Err(Error::new_type_error(format!(
                "Value is not a collection: {self}"
            ))),
        }
    }
}

/// Calls `callback(value, key, collection)` for every entry of `collection`.
///
/// Sequences are visited in index order, mappings in key order.
pub fn each<C, F>(collection: &C, mut callback: F) -> Result<()>
where
    C: Collection + ?Sized,
    F: FnMut(&Value, &Key, &C) -> Result<()>,
{
    collection.visit_entries(&mut |value, key| callback(value, key, collection))
}

/// Folds every entry of `collection` into an accumulator.
///
/// Without an initial value (`None`, or `Some(Value::Missing)`), the first
/// entry seeds the accumulator and folding starts from the second one. An
/// empty collection with no initial value reduces to `Value::Missing`.
pub fn reduce<C, F>(collection: &C, mut iterator: F, initial: Option<Value>) -> Result<Value>
where
    C: Collection + ?Sized,
    F: FnMut(Value, &Value) -> Result<Value>,
{
    let mut accumulator = initial.filter(|value| !value.is_missing());
    each(collection, |item, _, _| {
        accumulator = Some(match accumulator.take() {
            Some(acc) => iterator(acc, item)?,
            None => item.clone(),
        });
        Ok(())
    })?;
    Ok(accumulator.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mapping, seq};

    #[test]
    fn each_visits_sequence_in_order() -> anyhow::Result<()> {
        let items = seq!["a", "b", "c"];
        let mut seen = Vec::new();
        each(&items, |value, key, collection| {
            assert!(collection.strict_eq(&items));
            seen.push((key.as_index(), value.clone()));
            Ok(())
        })?;
        assert_eq!(
            seen,
            vec![
                (Some(0), Value::from("a")),
                (Some(1), Value::from("b")),
                (Some(2), Value::from("c")),
            ]
        );
        Ok(())
    }

    #[test]
    fn each_visits_mapping_entries() -> anyhow::Result<()> {
        let record = mapping! { "b" => 2, "a" => 1 };
        let mut seen = Vec::new();
        each(&record, |value, key, _| {
            seen.push(format!("{key:?}={value}"));
            Ok(())
        })?;
        assert_eq!(seen, vec![r#""a"=1"#, r#""b"=2"#]);
        Ok(())
    }

    #[test]
    fn each_on_empty_collections_does_nothing() -> anyhow::Result<()> {
        let mut calls = 0;
        each(&seq![], |_, _, _| {
            calls += 1;
            Ok(())
        })?;
        each(&mapping! {}, |_, _, _| {
            calls += 1;
            Ok(())
        })?;
        assert_eq!(calls, 0);
        Ok(())
    }

    #[test]
    fn each_rejects_non_collections() {
        let result = each(&Value::from(3), |_, _, _| Ok(()));
        assert!(matches!(result, Err(Error::Type(_))));
    }

    #[test]
    fn each_stops_at_first_callback_error() {
        let mut visited = 0;
        let result = each(&seq![1, 2, 3], |_, key, _| {
            visited += 1;
            if key.as_index() == Some(1) {
                return Err(Error::new_invalid_argument_error("stop"));
            }
            Ok(())
        });
        assert!(matches!(result, Err(Error::InvalidArgument(m)) if m == "stop"));
        assert_eq!(visited, 2);
    }

    #[test]
    fn caller_errors_pass_through_unchanged() {
        let result = reduce(
            &seq![1, 2],
            |_, _| {
                Err(Error::new_other(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such record",
                )))
            },
            None,
        );
        let Err(Error::Other(inner)) = &result else {
            panic!("expected a wrapped caller error, got {result:?}");
        };
        let io_error = inner.downcast_ref::<std::io::Error>();
        assert_eq!(io_error.map(|e| e.kind()), Some(std::io::ErrorKind::NotFound));
        assert_eq!(inner.to_string(), "no such record");
    }

    #[test]
    fn each_tolerates_mutation_during_visit() -> anyhow::Result<()> {
        let items = Sequence::from(vec![Value::from(1), Value::from(2)]);
        each(&items, |value, _, collection| {
            collection.push(value.clone());
            Ok(())
        })?;
        assert_eq!(items.len(), 4);
        Ok(())
    }

    #[test]
    fn reduce_with_initial_value() -> anyhow::Result<()> {
        let sum = reduce(
            &seq![1, 2, 3],
            |total, x| total.add_owned(x.clone()),
            Some(Value::from(0)),
        )?;
        assert_eq!(sum, Value::from(6));
        Ok(())
    }

    #[test]
    fn reduce_seeds_with_first_element() -> anyhow::Result<()> {
        let mut calls = 0;
        let sum = reduce(
            &seq![1, 2, 3],
            |total, x| {
                calls += 1;
                total.add_owned(x.clone())
            },
            None,
        )?;
        assert_eq!(sum, Value::from(6));
        assert_eq!(calls, 2);
        Ok(())
    }

    #[test]
    fn reduce_treats_missing_initial_as_absent() -> anyhow::Result<()> {
        let first = reduce(&seq![5, 6], |acc, _| Ok(acc), Some(Value::Missing))?;
        assert_eq!(first, Value::from(5));
        Ok(())
    }

    #[test]
    fn reduce_empty_without_initial_is_missing() -> anyhow::Result<()> {
        let result = reduce(&seq![], |total, x| total.add_owned(x.clone()), None)?;
        assert!(result.is_missing());
        Ok(())
    }

    #[test]
    fn reduce_over_mapping_values() -> anyhow::Result<()> {
        let total = reduce(
            &mapping! { "x" => 10, "y" => 5 },
            |total, x| total.add_owned(x.clone()),
            Some(Value::from(0)),
        )?;
        assert_eq!(total, Value::from(15));
        Ok(())
    }
}
