use std::{
    cell::RefCell,
    collections::HashMap,
    hash::{Hash, Hasher},
    rc::Rc,
};

use num_bigint::BigInt;
use num_traits::FromPrimitive;
use tracing::trace;

use crate::{
    error::Result,
    pure_values::Integer,
    value::{Function, NativeFunction, Value},
};

/// A cache key that groups values the same way [`Value::strict_eq`] does.
///
/// Integral floats share a key with the equal integer. All NaNs share one
/// key even though no NaN is strictly equal to another.
enum MemoKey {
    Missing,
    Null,
    Bool(bool),
    Integer(Integer),
    Float(u64),
    String(Rc<str>),
    // Holding the value keeps the referent alive, so its address cannot be
    // reused by another value while the entry exists.
    Reference(Value),
}

impl MemoKey {
    fn from_float(f: f64) -> Self {
        if f.is_nan() {
            return MemoKey::Float(f64::NAN.to_bits());
        }
        if f.fract() == 0.0 {
            if let Some(i) = BigInt::from_f64(f) {
                return MemoKey::Integer(Integer::from(i));
            }
        }
        MemoKey::Float(f.to_bits())
    }

    fn reference_addr(value: &Value) -> usize {
        match value {
            Value::Sequence(s) => s.addr(),
            Value::Mapping(m) => m.addr(),
            Value::Function(f) => f.addr(),
            _ => 0,
        }
    }
}

impl From<Value> for MemoKey {
    fn from(value: Value) -> Self {
        match value {
            Value::Missing => MemoKey::Missing,
            Value::Null => MemoKey::Null,
            Value::Bool(b) => MemoKey::Bool(b),
            Value::Integer(i) => MemoKey::Integer(i),
            Value::Float(f) => MemoKey::from_float(f.value()),
            Value::String(s) => MemoKey::String(s),
            Value::Sequence(_) | Value::Mapping(_) | Value::Function(_) => {
                MemoKey::Reference(value)
            }
        }
    }
}

impl PartialEq for MemoKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MemoKey::Missing, MemoKey::Missing) | (MemoKey::Null, MemoKey::Null) => true,
            (MemoKey::Bool(b1), MemoKey::Bool(b2)) => b1 == b2,
            (MemoKey::Integer(i1), MemoKey::Integer(i2)) => i1 == i2,
            (MemoKey::Float(f1), MemoKey::Float(f2)) => f1 == f2,
            (MemoKey::String(s1), MemoKey::String(s2)) => s1 == s2,
            (MemoKey::Reference(r1), MemoKey::Reference(r2)) => r1.strict_eq(r2),
            _ => false,
        }
    }
}

impl Eq for MemoKey {}

impl Hash for MemoKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            MemoKey::Missing | MemoKey::Null => {}
            MemoKey::Bool(b) => b.hash(state),
            MemoKey::Integer(i) => i.hash(state),
            MemoKey::Float(bits) => bits.hash(state),
            MemoKey::String(s) => s.hash(state),
            MemoKey::Reference(value) => MemoKey::reference_addr(value).hash(state),
        }
    }
}

struct Memoized {
    func: Function,
    resolver: Option<Function>,
    cache: RefCell<HashMap<MemoKey, Value>>,
}

impl NativeFunction for Memoized {
    fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value> {
        let key = match &self.resolver {
            Some(resolver) => resolver.call(receiver, args)?,
            None => args.first().cloned().unwrap_or_default(),
        };
        let key = MemoKey::from(key);

        let cached = self.cache.borrow().get(&key).cloned();
        if let Some(result) = cached {
            trace!("Memo hit");
            return Ok(result);
        }
        trace!("Memo miss");
        let result = self.func.call(receiver, args)?;
        self.cache.borrow_mut().insert(key, result.clone());
        Ok(result)
    }
}

/// Wraps `func` so that results are cached by the first argument.
///
/// Only the first argument participates in the key. Sequences, mappings and
/// functions are keyed by identity, everything else by value.
pub fn memoize(func: &Function) -> Function {
    Function::new(Memoized {
        func: func.clone(),
        resolver: None,
        cache: RefCell::new(HashMap::new()),
    })
}

/// Like [`memoize`], but the cache key is whatever `resolver` returns when
/// called with the same receiver and arguments.
pub fn memoize_with(func: &Function, resolver: &Function) -> Function {
    Function::new(Memoized {
        func: func.clone(),
        resolver: Some(resolver.clone()),
        cache: RefCell::new(HashMap::new()),
    })
}
