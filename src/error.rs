use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An error where the wrong kind of value is used in an operation.
    #[error("Type error: {0}")]
    Type(String),

    /// An argument that has the right kind but an unusable value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// An error raised by caller-supplied code.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn new_type_error<'a>(message: impl Into<Cow<'a, str>>) -> Self {
        Self::Type(message.into().into_owned())
    }

    pub fn new_invalid_argument_error<'a>(message: impl Into<Cow<'a, str>>) -> Self {
        Self::InvalidArgument(message.into().into_owned())
    }

    pub fn new_method_not_found_error<'a>(name: impl Into<Cow<'a, str>>) -> Self {
        Self::MethodNotFound(name.into().into_owned())
    }

    pub fn new_other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Other(Box::new(error))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
