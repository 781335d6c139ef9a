use std::rc::Rc;

use crate::{error::Result, value::Value};

/// Something that can be called with a receiver and an argument list.
///
/// Implementations that need state across calls keep it behind interior
/// mutability, since calls only get `&self`.
pub trait NativeFunction {
    fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value>;
}

impl<F> NativeFunction for F
where
    F: Fn(&Value, &[Value]) -> Result<Value>,
{
    fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value> {
        self(receiver, args)
    }
}

/// A shared handle to a callable. Two handles are the same function only if
/// they point at the same callable.
#[derive(Clone)]
pub struct Function(Rc<dyn NativeFunction>);

impl Function {
    pub fn new<T>(func: T) -> Self
    where
        T: NativeFunction + 'static,
    {
        Function(Rc::new(func))
    }

    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + 'static,
    {
        Function(Rc::new(func))
    }

    pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value> {
        self.0.call(receiver, args)
    }

    /// Calls with no receiver bound.
    pub fn call_unbound(&self, args: &[Value]) -> Result<Value> {
        self.call(&Value::Missing, args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("#<function>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_receive_receiver_and_args() -> anyhow::Result<()> {
        let describe = Function::from_fn(|receiver, args| {
            Ok(Value::from(format!("{receiver}:{}", args.len())))
        });
        assert_eq!(
            describe.call(&Value::from(7), &[Value::Null, Value::Null])?,
            Value::from("7:2")
        );
        assert_eq!(describe.call_unbound(&[])?, Value::from("missing:0"));
        Ok(())
    }

    #[test]
    fn identity_is_by_reference() {
        let f = Function::from_fn(|_, _| Ok(Value::Missing));
        let g = Function::from_fn(|_, _| Ok(Value::Missing));
        assert!(f.ptr_eq(&f.clone()));
        assert!(!f.ptr_eq(&g));
    }
}
