use crate::CollectionKind;

/// Errors returned by the grouping operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested collection kind is not one of the supported behaviors.
    ///
    /// Raised before any input is consumed.
    #[error("unsupported collection kind `{name}`")]
    UnsupportedCollectionKind { name: String },

    /// A value could not be hashed while grouping into a hashing kind.
    #[error("value of type `{type_name}` at position {position} cannot be grouped into a {kind}: it is not hashable")]
    ValueConstraintViolation {
        kind: CollectionKind,
        position: usize,
        type_name: &'static str,
    },
}

impl Error {
    pub(crate) fn unsupported(name: impl Into<String>) -> Self {
        Error::UnsupportedCollectionKind { name: name.into() }
    }

    pub(crate) fn violation(kind: CollectionKind, position: usize, cause: Unhashable) -> Self {
        Error::ValueConstraintViolation {
            kind,
            position,
            type_name: cause.type_name,
        }
    }
}

/// A value has no stable hash and cannot be stored in a hashing container.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("value of type `{type_name}` is not hashable")]
pub struct Unhashable {
    type_name: &'static str,
}

impl Unhashable {
    /// Creates an `Unhashable` error naming the type `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Name of the type whose value was rejected.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_keeps_kind_position_and_type() {
        let err = Error::violation(CollectionKind::Counter, 7, Unhashable::of::<f64>());

        assert_eq!(
            err,
            Error::ValueConstraintViolation {
                kind: CollectionKind::Counter,
                position: 7,
                type_name: "f64",
            }
        );
        assert_eq!(
            err.to_string(),
            "value of type `f64` at position 7 cannot be grouped into a counter: it is not hashable"
        );
    }

    #[test]
    fn unsupported_names_the_kind() {
        assert_eq!(
            Error::unsupported("deque").to_string(),
            "unsupported collection kind `deque`"
        );
    }
}
