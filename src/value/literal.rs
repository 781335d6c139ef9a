//! A text format for writing values, based on S-expressions.
//!
//! ```text
//! (1 (2 (3 (4))) 5)            ; a nested sequence
//! (map (name . "moe") (age . 40))
//! (#t #f null missing 1.5 "text")
//! ```

use std::rc::Rc;

use num_bigint::BigInt;

use crate::{
    pure_values::Integer,
    value::{Mapping, Sequence, Value},
};

#[derive(thiserror::Error, Debug)]
pub enum LiteralError {
    #[error(transparent)]
    Lexpr(#[from] lexpr::parse::Error),

    #[error("Unexpected value type")]
    UnexpectedValueType,

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Invalid mapping entry")]
    InvalidMappingEntry,
}

type Result<T> = std::result::Result<T, LiteralError>;

pub fn from_str(text: &str) -> Result<Value> {
    let expr = lexpr::from_str(text)?;
    parse_value(&expr)
}

fn parse_number(number: &lexpr::Number) -> Result<Value> {
    if let Some(i) = number.as_i64() {
        Ok(Value::from(i))
    } else if let Some(u) = number.as_u64() {
        Ok(Value::Integer(Integer::from(BigInt::from(u))))
    } else if let Some(f) = number.as_f64() {
        Ok(Value::from(f))
    } else {
        Err(LiteralError::UnexpectedValueType)
    }
}

fn parse_symbol(symbol: &str) -> Result<Value> {
    match symbol {
        "missing" => Ok(Value::Missing),
        "null" => Ok(Value::Null),
        _ => Err(LiteralError::UnknownSymbol(symbol.to_string())),
    }
}

fn parse_value(expr: &lexpr::Value) -> Result<Value> {
    Ok(match expr {
        lexpr::Value::Nil => Value::Null,
        // The empty list.
        lexpr::Value::Null => Value::Sequence(Sequence::new()),
        lexpr::Value::Bool(b) => Value::Bool(*b),
        lexpr::Value::Number(n) => parse_number(n)?,
        lexpr::Value::String(s) => Value::new_string(&**s),
        lexpr::Value::Symbol(s) => parse_symbol(s)?,
        lexpr::Value::Vector(items) => Value::Sequence(parse_items(items.iter())?),
        lexpr::Value::Cons(cons) => {
            if cons.car().as_symbol() == Some("map") {
                Value::Mapping(parse_mapping(cons.cdr())?)
            } else {
                let items = expr.list_iter().ok_or(LiteralError::UnexpectedValueType)?;
                Value::Sequence(parse_items(items)?)
            }
        }
        _ => return Err(LiteralError::UnexpectedValueType),
    })
}

fn parse_items<'a>(items: impl Iterator<Item = &'a lexpr::Value>) -> Result<Sequence> {
    items.map(parse_value).collect()
}

fn parse_mapping(entries: &lexpr::Value) -> Result<Mapping> {
    let mapping = Mapping::new();
    for entry in entries.list_iter().ok_or(LiteralError::UnexpectedValueType)? {
        // Each entry has the form (<key> . <value>)
        let cons = entry.as_cons().ok_or(LiteralError::InvalidMappingEntry)?;
        let key: Rc<str> = match cons.car() {
            lexpr::Value::Symbol(s) | lexpr::Value::String(s) => (&**s).into(),
            _ => return Err(LiteralError::InvalidMappingEntry),
        };
        mapping.insert(key, parse_value(cons.cdr())?);
    }
    Ok(mapping)
}

impl Value {
    /// Reads a value from its literal text form.
    pub fn parse(text: &str) -> Result<Value> {
        from_str(text)
    }
}
