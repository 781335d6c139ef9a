//! Collection operations derived from [`each`] and [`reduce`].

use crate::{
    collection::{each, reduce, Collection},
    error::{Error, Result},
    value::{Function, Sequence, Value},
};

/// Returns its argument.
pub fn identity(value: &Value) -> Value {
    value.clone()
}

fn truthy(value: &Value) -> Result<bool> {
    Ok(value.is_truthy())
}

/// With no count, the first element (`Missing` when empty). With a count, a
/// new sequence of up to that many leading elements.
pub fn first(seq: &Sequence, n: Option<usize>) -> Result<Value> {
    let Some(n) = n else {
        return Ok(seq.at(0));
    };
    let result = Sequence::new();
    each(seq, |item, key, _| {
        if key.as_index().is_some_and(|index| index < n) {
            result.push(item.clone());
        }
        Ok(())
    })?;
    Ok(Value::Sequence(result))
}

/// With no count, the last element (`Missing` when empty). With a count, a
/// new sequence of up to that many trailing elements.
pub fn last(seq: &Sequence, n: Option<usize>) -> Result<Value> {
    let len = seq.len();
    let Some(n) = n else {
        return Ok(len.checked_sub(1).map(|index| seq.at(index)).unwrap_or_default());
    };
    let start = len.saturating_sub(n);
    let result = Sequence::new();
    each(seq, |item, key, _| {
        if key.as_index().is_some_and(|index| index >= start) {
            result.push(item.clone());
        }
        Ok(())
    })?;
    Ok(Value::Sequence(result))
}

/// The index of the first element strictly equal to `target`.
pub fn index_of(seq: &Sequence, target: &Value) -> Result<Option<usize>> {
    let mut found = None;
    each(seq, |item, key, _| {
        if found.is_none() && item.strict_eq(target) {
            found = key.as_index();
        }
        Ok(())
    })?;
    Ok(found)
}

pub fn filter<C, P>(collection: &C, mut predicate: P) -> Result<Sequence>
where
    C: Collection + ?Sized,
    P: FnMut(&Value) -> Result<bool>,
{
    let result = Sequence::new();
    each(collection, |item, _, _| {
        if predicate(item)? {
            result.push(item.clone());
        }
        Ok(())
    })?;
    Ok(result)
}

pub fn reject<C, P>(collection: &C, mut predicate: P) -> Result<Sequence>
where
    C: Collection + ?Sized,
    P: FnMut(&Value) -> Result<bool>,
{
    filter(collection, |item| Ok(!predicate(item)?))
}

/// Drops every value strictly equal to an earlier one.
pub fn uniq<C>(collection: &C) -> Result<Sequence>
where
    C: Collection + ?Sized,
{
    let result = Sequence::new();
    each(collection, |item, _, _| {
        if index_of(&result, item)?.is_none() {
            result.push(item.clone());
        }
        Ok(())
    })?;
    Ok(result)
}

/// Collects `func(value)` for every value, in visiting order. Mappings map
/// to a sequence as well.
pub fn map<C, F>(collection: &C, mut func: F) -> Result<Sequence>
where
    C: Collection + ?Sized,
    F: FnMut(&Value) -> Result<Value>,
{
    let result = Sequence::new();
    each(collection, |item, _, _| {
        result.push(func(item)?);
        Ok(())
    })?;
    Ok(result)
}

pub fn pluck<C>(collection: &C, property: &str) -> Result<Sequence>
where
    C: Collection + ?Sized,
{
    map(collection, |item| item.property(property))
}

/// What [`invoke`] calls on each element.
#[derive(Clone, Copy, Debug)]
pub enum Method<'a> {
    /// A method looked up by name on each element.
    Named(&'a str),
    Function(&'a Function),
}

impl<'a> From<&'a str> for Method<'a> {
    fn from(name: &'a str) -> Self {
        Method::Named(name)
    }
}

impl<'a> From<&'a Function> for Method<'a> {
    fn from(func: &'a Function) -> Self {
        Method::Function(func)
    }
}

/// Calls a method on every element with the element as receiver, collecting
/// the results.
pub fn invoke<'a, C>(
    collection: &C,
    method: impl Into<Method<'a>>,
    args: &[Value],
) -> Result<Sequence>
where
    C: Collection + ?Sized,
{
    let method = method.into();
    map(collection, |item| match method {
        Method::Function(func) => func.call(item, args),
        Method::Named(name) => match item.property(name)? {
            Value::Function(func) => func.call(item, args),
            _ => Err(Error::new_method_not_found_error(name)),
        },
    })
}

pub fn contains<C>(collection: &C, target: &Value) -> Result<bool>
where
    C: Collection + ?Sized,
{
    let found = reduce(
        collection,
        |was_found, item| {
            if was_found.is_truthy() {
                return Ok(was_found);
            }
            Ok(Value::Bool(item.strict_eq(target)))
        },
        Some(Value::Bool(false)),
    )?;
    Ok(found.is_truthy())
}

fn every_by<C, P>(collection: &C, mut predicate: P) -> Result<bool>
where
    C: Collection + ?Sized,
    P: FnMut(&Value) -> Result<bool>,
{
    let all = reduce(
        collection,
        |result, item| {
            if !result.is_truthy() {
                return Ok(result);
            }
            Ok(Value::Bool(predicate(item)?))
        },
        Some(Value::Bool(true)),
    )?;
    Ok(all.is_truthy())
}

/// True if every value passes `predicate`, or is truthy when no predicate is
/// given. Once a value fails, the predicate is not called again.
pub fn every<C>(
    collection: &C,
    predicate: Option<&mut dyn FnMut(&Value) -> Result<bool>>,
) -> Result<bool>
where
    C: Collection + ?Sized,
{
    match predicate {
        Some(predicate) => every_by(collection, predicate),
        None => every_by(collection, truthy),
    }
}

fn some_by<C, P>(collection: &C, mut predicate: P) -> Result<bool>
where
    C: Collection + ?Sized,
    P: FnMut(&Value) -> Result<bool>,
{
    let mut negated = |item: &Value| -> Result<bool> { Ok(!predicate(item)?) };
    Ok(!every(collection, Some(&mut negated))?)
}

/// True if any value passes `predicate`, or is truthy when no predicate is
/// given.
pub fn some<C>(
    collection: &C,
    predicate: Option<&mut dyn FnMut(&Value) -> Result<bool>>,
) -> Result<bool>
where
    C: Collection + ?Sized,
{
    match predicate {
        Some(predicate) => some_by(collection, predicate),
        None => some_by(collection, truthy),
    }
}
