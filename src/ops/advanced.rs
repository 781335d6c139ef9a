//! Collection operations that need some bookkeeping beyond a single pass.

use rand::{seq::SliceRandom, Rng};

use crate::{
    collection::{each, Collection},
    error::{Error, Result},
    ops::derived::{contains, every, filter, map, some, uniq},
    value::{Sequence, Value},
};

// `open` holds the sequences currently being descended into.
fn flatten_into<C>(collection: &C, open: &mut Vec<Sequence>, result: &Sequence) -> Result<()>
where
    C: Collection + ?Sized,
{
    each(collection, |item, _, _| {
        match item {
            Value::Sequence(nested) => {
                if open.iter().any(|seq| seq.ptr_eq(nested)) {
                    return Err(Error::new_invalid_argument_error(
                        "Cannot flatten a sequence that contains itself.",
                    ));
                }
                open.push(nested.clone());
                flatten_into(nested, open, result)?;
                open.pop();
            }
            _ => result.push(item.clone()),
        }
        Ok(())
    })
}

/// Flattens nested sequences, depth first. Mappings are leaves.
///
/// A sequence that contains itself, directly or through other sequences, is
/// an `InvalidArgument` error.
pub fn flatten<C>(collection: &C) -> Result<Sequence>
where
    C: Collection + ?Sized,
{
    let result = Sequence::new();
    flatten_into(collection, &mut Vec::new(), &result)?;
    Ok(result)
}

/// Pairs up elements by index. Shorter inputs are padded with `Missing`.
pub fn zip(seqs: &[Sequence]) -> Result<Sequence> {
    let len = seqs.iter().map(Sequence::len).max().unwrap_or(0);
    let result = Sequence::new();
    for index in 0..len {
        result.push(Value::Sequence(
            seqs.iter().map(|seq| seq.at(index)).collect(),
        ));
    }
    Ok(result)
}

/// Values found in every input, each reported once, in the order of the
/// first input.
pub fn intersection(seqs: &[Sequence]) -> Result<Sequence> {
    let Some((first, rest)) = seqs.split_first() else {
        return Ok(Sequence::new());
    };
    let others: Sequence = rest.iter().cloned().map(Value::Sequence).collect();
    filter(&uniq(first)?, |item| {
        let mut holds_item = |other: &Value| -> Result<bool> { contains(other, item) };
        every(&others, Some(&mut holds_item))
    })
}

/// Values of `first` not found in any of `others`. Duplicates in `first`
/// are kept.
pub fn difference(first: &Sequence, others: &[Sequence]) -> Result<Sequence> {
    let others: Sequence = others.iter().cloned().map(Value::Sequence).collect();
    filter(first, |item| {
        let mut holds_item = |other: &Value| -> Result<bool> { contains(other, item) };
        Ok(!some(&others, Some(&mut holds_item))?)
    })
}

/// How [`sort_by`] derives the key for each element.
pub enum SortCriterion<'a> {
    /// Sort by a named property of each element.
    Property(&'a str),
    Key(&'a mut dyn FnMut(&Value) -> Result<Value>),
}

impl<'a> From<&'a str> for SortCriterion<'a> {
    fn from(name: &'a str) -> Self {
        SortCriterion::Property(name)
    }
}

/// Stable sort by a derived key, compared with [`Value::default_cmp`].
pub fn sort_by<'a, C>(
    collection: &C,
    criterion: impl Into<SortCriterion<'a>>,
) -> Result<Sequence>
where
    C: Collection + ?Sized,
{
    let keys = match criterion.into() {
        SortCriterion::Property(name) => map(collection, |item| item.property(name))?,
        SortCriterion::Key(key_fn) => map(collection, key_fn)?,
    };
    let items = map(collection, |item| Ok(item.clone()))?;

    let mut keyed: Vec<(Value, Value)> =
        keys.to_vec().into_iter().zip(items.to_vec()).collect();
    keyed.sort_by(|(k1, _), (k2, _)| k1.default_cmp(k2));
    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}

/// A new sequence with the same values in random order.
pub fn shuffle<C>(collection: &C) -> Result<Sequence>
where
    C: Collection + ?Sized,
{
    shuffle_with(collection, &mut rand::thread_rng())
}

pub fn shuffle_with<C, R>(collection: &C, rng: &mut R) -> Result<Sequence>
where
    C: Collection + ?Sized,
    R: Rng + ?Sized,
{
    let mut items = map(collection, |item| Ok(item.clone()))?.to_vec();
    items.shuffle(rng);
    Ok(Sequence::from(items))
}
