//! Functional utilities over dynamically typed values: iteration and
//! folding, collection operations, mapping merges, and function decorators
//! driven by a pluggable timer.

pub mod collection;
pub mod decorators;
pub mod error;
pub mod ops;
pub mod pure_values;
pub mod timer;
pub mod value;

pub use collection::{each, reduce, Collection, Key};
pub use decorators::{
    defer, delay, memoize, memoize_with, once, throttle, throttle_with, ThrottleOptions,
    Throttled,
};
pub use error::{Error, Result};
pub use ops::*;
pub use timer::{EventLoop, TimerCallback, TimerHandle, TimerService};
#[cfg(feature = "tokio")]
pub use timer::TokioTimer;
pub use value::{Function, Mapping, NativeFunction, Sequence, Value};

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::seq;

    fn is_even(item: &Value) -> Result<bool> {
        Ok(item.as_compact_integer()? % 2 == 0)
    }

    #[test]
    fn filter_and_reject_partition() -> anyhow::Result<()> {
        let items = seq![1, 2, 3, 4, 5, 6, 7];
        let kept = filter(&items, is_even)?;
        let dropped = reject(&items, is_even)?;

        assert_eq!(kept.len() + dropped.len(), 7);
        for item in kept.to_vec() {
            assert!(!contains(&dropped, &item)?);
        }
        let mut rejoined = kept.to_vec();
        rejoined.extend(dropped.to_vec());
        rejoined.sort_by(Value::default_cmp);
        assert_eq!(Value::from(rejoined), items);
        Ok(())
    }

    #[test]
    fn some_is_not_every_not() -> anyhow::Result<()> {
        for items in [seq![], seq![1, 3], seq![1, 2], seq![2, 4]] {
            let mut even = |item: &Value| -> Result<bool> { is_even(item) };
            let mut odd = |item: &Value| -> Result<bool> { Ok(!is_even(item)?) };
            assert_eq!(
                some(&items, Some(&mut even))?,
                !every(&items, Some(&mut odd))?
            );
        }
        Ok(())
    }

    #[test]
    fn uniq_is_idempotent() -> anyhow::Result<()> {
        let items = seq![1, 2, 1, "a", 2.0, "a", Value::Null, Value::Null];
        let once_unique = uniq(&items)?;
        assert_eq!(uniq(&once_unique)?, once_unique);
        assert_eq!(Value::from(once_unique), seq![1, 2, "a", Value::Null]);
        Ok(())
    }

    #[test]
    fn sum_with_reduce() -> anyhow::Result<()> {
        let sum = |total: Value, item: &Value| total.add_owned(item.clone());
        assert_eq!(reduce(&seq![1, 2, 3], sum, Some(Value::from(0)))?, Value::from(6));
        assert!(reduce(&seq![], sum, None)?.is_missing());
        Ok(())
    }

    #[test]
    fn once_counts_a_single_call() -> anyhow::Result<()> {
        let count = Rc::new(Cell::new(0));
        let increment = once(&{
            let count = count.clone();
            Function::from_fn(move |_, _| {
                count.set(count.get() + 1);
                Ok(Value::from(count.get() as i64))
            })
        });
        for _ in 0..3 {
            assert_eq!(increment.call_unbound(&[])?, Value::from(1));
        }
        assert_eq!(count.get(), 1);
        Ok(())
    }

    #[test]
    fn pipeline_over_parsed_records() -> anyhow::Result<()> {
        let people = Value::parse(
            r#"((map (name . "moe") (age . 40))
                (map (name . "larry") (age . 50))
                (map (name . "curly") (age . 60)))"#,
        )?;
        let over_45 = |person: &Value| -> Result<bool> {
            Ok(person.property("age")?.as_compact_integer()? > 45)
        };
        let older = filter(&people, |person| over_45(person))?;
        let names = pluck(&sort_by(&older, "name")?, "name")?;
        assert_eq!(Value::from(names), seq!["curly", "larry"]);
        Ok(())
    }
}
