//! Merging mappings into a target mapping in place.

use crate::{collection::each, error::Result, value::Mapping};

/// Copies every entry of every source into `target`, later sources winning.
/// Returns `target`.
pub fn extend(target: &Mapping, sources: &[Mapping]) -> Result<Mapping> {
    for source in sources {
        each(source, |value, key, _| {
            target.insert(key.to_name(), value.clone());
            Ok(())
        })?;
    }
    Ok(target.clone())
}

/// Like [`extend`], but only fills keys that are absent from `target` (or
/// hold `Missing`), so the first source to provide a key wins. Returns
/// `target`.
pub fn defaults(target: &Mapping, sources: &[Mapping]) -> Result<Mapping> {
    for source in sources {
        each(source, |value, key, _| {
            let key = key.to_name();
            if target.get(&key).map_or(true, |existing| existing.is_missing()) {
                target.insert(key, value.clone());
            }
            Ok(())
        })?;
    }
    Ok(target.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mapping, value::Value};

    fn mapping_of(value: Value) -> Mapping {
        value.as_mapping().cloned().unwrap_or_default()
    }

    #[test]
    fn extend_overwrites() -> anyhow::Result<()> {
        let target = mapping_of(mapping! { "a" => 1 });
        let result = extend(&target, &[mapping_of(mapping! { "a" => 2, "b" => 3 })])?;
        assert!(result.ptr_eq(&target));
        assert_eq!(Value::from(target), mapping! { "a" => 2, "b" => 3 });
        Ok(())
    }

    #[test]
    fn extend_later_sources_win() -> anyhow::Result<()> {
        let target = Mapping::new();
        extend(
            &target,
            &[
                mapping_of(mapping! { "a" => 1, "b" => 1 }),
                mapping_of(mapping! { "b" => 2 }),
            ],
        )?;
        assert_eq!(Value::from(target), mapping! { "a" => 1, "b" => 2 });
        Ok(())
    }

    #[test]
    fn extend_with_itself() -> anyhow::Result<()> {
        let target = mapping_of(mapping! { "a" => 1 });
        extend(&target, &[target.clone()])?;
        assert_eq!(target.len(), 1);
        Ok(())
    }

    #[test]
    fn defaults_fills_missing_only() -> anyhow::Result<()> {
        let target = mapping_of(mapping! { "a" => 1 });
        let result = defaults(&target, &[mapping_of(mapping! { "a" => 2, "b" => 3 })])?;
        assert!(result.ptr_eq(&target));
        assert_eq!(Value::from(target), mapping! { "a" => 1, "b" => 3 });
        Ok(())
    }

    #[test]
    fn defaults_first_source_wins() -> anyhow::Result<()> {
        let target = mapping_of(mapping! { "gap" => Value::Missing, "zero" => 0 });
        defaults(
            &target,
            &[
                mapping_of(mapping! { "gap" => "first", "zero" => 9 }),
                mapping_of(mapping! { "gap" => "second", "new" => true }),
            ],
        )?;
        assert_eq!(
            Value::from(target),
            mapping! { "gap" => "first", "zero" => 0, "new" => true }
        );
        Ok(())
    }

    #[test]
    fn merging_leaves_sources_untouched() -> anyhow::Result<()> {
        let source = mapping_of(mapping! { "a" => 1 });
        extend(&Mapping::new(), &[source.clone()])?;
        defaults(&Mapping::new(), &[source.clone()])?;
        assert_eq!(Value::from(source), mapping! { "a" => 1 });
        Ok(())
    }
}
