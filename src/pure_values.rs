//! Numeric values carried by [`Value`](crate::Value).

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};

#[derive(Clone, Debug)]
enum IntegerInner {
    Compact(i64),
    Big(Rc<BigInt>),
}

/// An integer that is stored inline while it fits in an `i64`, and spills
/// into a big integer otherwise.
///
/// Constructors normalize, so a `Big` integer never holds a value that would
/// fit in the compact form.
#[derive(Clone, Debug)]
pub struct Integer(IntegerInner);

impl Integer {
    pub fn to_compact_integer(&self) -> Option<i64> {
        match &self.0 {
            IntegerInner::Compact(i) => Some(*i),
            IntegerInner::Big(i) => i.to_i64(),
        }
    }

    pub fn to_f64(&self) -> f64 {
        match &self.0 {
            IntegerInner::Compact(i) => *i as f64,
            IntegerInner::Big(i) => i.to_f64().unwrap_or(f64::NAN),
        }
    }

    pub fn to_big(&self) -> BigInt {
        match &self.0 {
            IntegerInner::Compact(i) => BigInt::from(*i),
            IntegerInner::Big(i) => (**i).clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.0, IntegerInner::Compact(0))
    }

    /// Compares exactly against a float, without rounding the integer
    /// through `f64`. Returns `None` when `f` is NaN.
    pub fn cmp_f64(&self, f: f64) -> Option<Ordering> {
        if f.is_nan() {
            return None;
        }
        if f.is_infinite() {
            return Some(if f > 0.0 {
                Ordering::Less
            } else {
                Ordering::Greater
            });
        }
        let floor = f.floor();
        let whole = BigInt::from_f64(floor)?;
        Some(match self.to_big().cmp(&whole) {
            Ordering::Equal if f > floor => Ordering::Less,
            ordering => ordering,
        })
    }

    pub fn add_owned(self, other: Self) -> Self {
        if let (Some(i1), Some(i2)) = (self.to_compact_integer(), other.to_compact_integer()) {
            if let Some(sum) = i1.checked_add(i2) {
                return Integer::from(sum);
            }
        }
        Integer::from(self.to_big() + other.to_big())
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(i1), Some(i2)) = (self.to_compact_integer(), other.to_compact_integer()) {
            i1 == i2
        } else if let (IntegerInner::Big(i1), IntegerInner::Big(i2)) = (&self.0, &other.0) {
            i1 == i2
        } else {
            false
        }
    }
}

impl Eq for Integer {}

impl Hash for Integer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            IntegerInner::Compact(i) => i.hash(state),
            IntegerInner::Big(i) => i.hash(state),
        }
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (IntegerInner::Compact(i1), IntegerInner::Compact(i2)) => i1.cmp(i2),
            _ => self.to_big().cmp(&other.to_big()),
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            IntegerInner::Compact(i) => fmt::Display::fmt(i, f),
            IntegerInner::Big(i) => fmt::Display::fmt(i, f),
        }
    }
}

impl From<i64> for Integer {
    fn from(i: i64) -> Self {
        Integer(IntegerInner::Compact(i))
    }
}

impl From<u64> for Integer {
    fn from(i: u64) -> Self {
        Integer::from(BigInt::from(i))
    }
}

impl From<BigInt> for Integer {
    fn from(i: BigInt) -> Self {
        Integer(if let Some(i) = i.to_i64() {
            IntegerInner::Compact(i)
        } else {
            IntegerInner::Big(Rc::new(i))
        })
    }
}

#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct Float(f64);

impl Float {
    pub fn new(value: f64) -> Self {
        Float(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn add_owned(self, other: Self) -> Self {
        Float(self.0 + other.0)
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
