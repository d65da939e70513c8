use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    /// Feature the store cannot express: distinct, an unsupported part
    /// keyword, or a result shape that does not combine with the tree.
    Unsupported(String),
    /// Predicate tree composed with OR across more than one group.
    Malformed(String),
    /// Fewer positional arguments than value-consuming parts.
    TooFewParameters(String),
    UnknownProperty {
        kind: &'static str,
        property: String,
    },
    Serialize(String),
    Deserialize(String),
    Storage(String),
    TypeMismatch,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Unsupported(err) => write!(f, "Unsupported: {}", err),
            Error::Malformed(err) => write!(f, "Malformed query: {}", err),
            Error::TooFewParameters(method) => write!(
                f,
                "Too few parameters are provided for query method: {}",
                method
            ),
            Error::UnknownProperty { kind, property } => {
                write!(f, "Unknown property `{}` on kind `{}`", property, kind)
            }
            Error::Serialize(err) => write!(f, "Serialization error: {}", err),
            Error::Deserialize(err) => write!(f, "Deserialization error: {}", err),
            Error::Storage(err) => write!(f, "Storage error: {}", err),
            Error::TypeMismatch => write!(f, "Type mismatch"),
        }
    }
}

impl std::error::Error for Error {}
