use std::{cmp::Ordering, fmt, rc::Rc};

use crate::{
    error::{Error, Result},
    pure_values::{Float, Integer},
};

mod function;
pub mod literal;
mod mapping;
mod sequence;

pub use function::{Function, NativeFunction};
pub use mapping::Mapping;
pub use sequence::Sequence;

/// A dynamically typed value.
///
/// Sequences, mappings and functions are shared handles: cloning the value
/// clones the reference, not the contents.
///
/// The `==` operator compares structure, which is what tests usually want.
/// Library operations never use it; they compare with [`Value::strict_eq`].
#[derive(Clone, Default)]
pub enum Value {
    /// The "no value" marker.
    #[default]
    Missing,
    Null,
    Bool(bool),
    Integer(Integer),
    Float(Float),
    String(Rc<str>),
    Sequence(Sequence),
    Mapping(Mapping),
    Function(Function),
}

impl Value {
    pub fn new_string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn new_function<F>(func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + 'static,
    {
        Value::Function(Function::from_fn(func))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(Error::new_type_error("Value is not a boolean.")),
        }
    }

    pub fn as_int(&self) -> Result<&Integer> {
        match self {
            Value::Integer(i) => Ok(i),
            _ => Err(Error::new_type_error("Value is not an integer.")),
        }
    }

    pub fn as_compact_integer(&self) -> Result<i64> {
        self.as_int()?
            .to_compact_integer()
            .ok_or_else(|| Error::new_invalid_argument_error("Integer value is too large."))
    }

    pub fn as_float(&self) -> Result<&Float> {
        match self {
            Value::Float(f) => Ok(f),
            _ => Err(Error::new_type_error("Value is not a float.")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(Error::new_type_error("Value is not a string.")),
        }
    }

    pub fn as_sequence(&self) -> Result<&Sequence> {
        match self {
            Value::Sequence(s) => Ok(s),
            _ => Err(Error::new_type_error("Value is not a sequence.")),
        }
    }

    pub fn as_mapping(&self) -> Result<&Mapping> {
        match self {
            Value::Mapping(m) => Ok(m),
            _ => Err(Error::new_type_error("Value is not a mapping.")),
        }
    }

    pub fn as_function(&self) -> Result<&Function> {
        match self {
            Value::Function(f) => Ok(f),
            _ => Err(Error::new_type_error("Value is not a function.")),
        }
    }

    pub fn add_owned(self, other: Self) -> Result<Self> {
        match (self, other) {
            (Value::Integer(i1), Value::Integer(i2)) => Ok(Value::Integer(i1.add_owned(i2))),
            (Value::Float(f1), Value::Float(f2)) => Ok(Value::Float(f1.add_owned(f2))),
            (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i)) => {
                Ok(Value::Float(f.add_owned(Float::new(i.to_f64()))))
            }
            _ => Err(Error::new_invalid_argument_error(
                "Addition is only supported for integers and floats.",
            )),
        }
    }

    /// Returns true if the two values are the same concrete value, or are the same
    /// reference.
    ///
    /// Integers and floats are one numeric kind here, so `1` and `1.0` are
    /// equal, and `NaN` is not equal to anything.
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Missing, Value::Missing) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(b1), Value::Bool(b2)) => b1 == b2,
            (Value::Integer(i1), Value::Integer(i2)) => i1 == i2,
            (Value::Float(f1), Value::Float(f2)) => f1.value() == f2.value(),
            (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i)) => {
                i.cmp_f64(f.value()) == Some(Ordering::Equal)
            }
            (Value::String(s1), Value::String(s2)) => s1 == s2,
            (Value::Sequence(s1), Value::Sequence(s2)) => s1.ptr_eq(s2),
            (Value::Mapping(m1), Value::Mapping(m2)) => m1.ptr_eq(m2),
            (Value::Function(f1), Value::Function(f2)) => f1.ptr_eq(f2),
            _ => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Missing | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Integer(i) => !i.is_zero(),
            Value::Float(f) => !(f.value() == 0.0 || f.value().is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Sequence(_) | Value::Mapping(_) | Value::Function(_) => true,
        }
    }

    /// Reads a named property.
    ///
    /// Mappings look the name up, sequences understand canonical decimal
    /// indexes (`"1"`, but not `"01"` or `"+1"`) and `length`, strings understand `length`. Anything else has no
    /// properties, except `Missing` and `Null`, which are an error to read
    /// from.
    pub fn property(&self, name: &str) -> Result<Value> {
        Ok(match self {
            Value::Missing | Value::Null => {
                return Err(Error::new_type_error(format!(
                    "Cannot read property `{name}` of {self}."
                )))
            }
            Value::Mapping(m) => m.get(name).unwrap_or_default(),
            Value::Sequence(s) if name == "length" => Value::from(s.len()),
            Value::Sequence(s) => match parse_index(name) {
                Some(index) => s.at(index),
                None => Value::Missing,
            },
            Value::String(s) if name == "length" => Value::from(s.chars().count()),
            _ => Value::Missing,
        })
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Integer(_) | Value::Float(_) => 1,
            Value::String(_) => 2,
            Value::Sequence(_) => 3,
            Value::Mapping(_) => 4,
            Value::Function(_) => 5,
            Value::Null => 6,
            Value::Missing => 7,
        }
    }

    /// A total order over all values, used when sorting by derived keys.
    pub fn default_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Integer(i1), Value::Integer(i2)) => i1.cmp(i2),
            // NaN sorts after every other number.
            (Value::Integer(i), Value::Float(f)) => {
                i.cmp_f64(f.value()).unwrap_or(Ordering::Less)
            }
            (Value::Float(f), Value::Integer(i)) => i
                .cmp_f64(f.value())
                .map_or(Ordering::Greater, Ordering::reverse),
            (Value::Float(f1), Value::Float(f2)) => {
                let (n1, n2) = (f1.value(), f2.value());
                match (n1.is_nan(), n2.is_nan()) {
                    (false, false) => n1.partial_cmp(&n2).unwrap_or(Ordering::Equal),
                    (nan1, nan2) => nan1.cmp(&nan2),
                }
            }
            (Value::Bool(b1), Value::Bool(b2)) => b1.cmp(b2),
            (Value::String(s1), Value::String(s2)) => s1.cmp(s2),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

/// Parses a property name written the way an index prints.
fn parse_index(name: &str) -> Option<usize> {
    let canonical =
        name == "0" || (!name.starts_with('0') && name.bytes().all(|b| b.is_ascii_digit()));
    if !canonical {
        return None;
    }
    name.parse().ok()
}

/// Structural equality. Sequences and mappings that contain themselves
/// recurse without bound.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Sequence(s1), Value::Sequence(s2)) => {
                s1.ptr_eq(s2) || s1.to_vec() == s2.to_vec()
            }
            (Value::Mapping(m1), Value::Mapping(m2)) => {
                m1.ptr_eq(m2) || m1.entries() == m2.entries()
            }
            _ => self.strict_eq(other),
        }
    }
}

/// Prints the literal form. Like `==`, this does not terminate on a
/// sequence or mapping that contains itself.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => f.write_str("missing"),
            Value::Null => f.write_str("null"),
            Value::Bool(true) => f.write_str("#t"),
            Value::Bool(false) => f.write_str("#f"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{:?}", &**s),
            Value::Sequence(s) => {
                f.write_str("(")?;
                for (index, item) in s.to_vec().iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Value::Mapping(m) => {
                f.write_str("(map")?;
                for (key, value) in m.entries() {
                    write!(f, " ({:?} . {value})", &*key)?;
                }
                f.write_str(")")
            }
            Value::Function(_) => f.write_str("#<function>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(Integer::from(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::from(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Integer(Integer::from(i as u64))
    }
}

impl From<Integer> for Value {
    fn from(i: Integer) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(Float::new(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<Rc<str>> for Value {
    fn from(s: Rc<str>) -> Self {
        Value::String(s)
    }
}

impl From<Sequence> for Value {
    fn from(s: Sequence) -> Self {
        Value::Sequence(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(Sequence::from(items))
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

/// Builds a sequence value from a list of expressions convertible into
/// [`Value`].
#[macro_export]
macro_rules! seq {
    ($($e:expr),* $(,)?) => {
        {
            let items: Vec<$crate::Value> = vec![$($crate::Value::from($e)),*];
            $crate::Value::Sequence($crate::Sequence::from(items))
        }
    };
}

/// Builds a mapping value from `key => value` pairs.
#[macro_export]
macro_rules! mapping {
    ($($k:expr => $v:expr),* $(,)?) => {
        {
            let mapping = $crate::Mapping::new();
            $(mapping.insert($k, $crate::Value::from($v));)*
            $crate::Value::Mapping(mapping)
        }
    };
}
