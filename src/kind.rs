use crate::Error;
use std::fmt;
use std::str::FromStr;

/// The closed set of accumulation behaviors a grouping can use.
///
/// # Examples
///
/// ```
/// use collection_dict::CollectionKind;
///
/// let kind: CollectionKind = "list".parse().unwrap();
///
/// assert_eq!(kind, CollectionKind::Sequence);
/// assert!(kind.preserves_order());
/// assert!("deque".parse::<CollectionKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Values are appended in arrival order, duplicates kept.
    Sequence,
    /// Values are deduplicated.
    Set,
    /// Values are deduplicated into a read-only set.
    FrozenSet,
    /// Values are kept in arrival order in a fixed-size sequence.
    FixedTuple,
    /// Occurrences of each value are counted.
    Counter,
}

impl CollectionKind {
    /// Every supported kind.
    pub const ALL: [CollectionKind; 5] = [
        CollectionKind::Sequence,
        CollectionKind::Set,
        CollectionKind::FrozenSet,
        CollectionKind::FixedTuple,
        CollectionKind::Counter,
    ];

    /// Canonical name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Sequence => "sequence",
            CollectionKind::Set => "set",
            CollectionKind::FrozenSet => "frozenset",
            CollectionKind::FixedTuple => "fixed-tuple",
            CollectionKind::Counter => "counter",
        }
    }

    /// Returns `true` if values grouped with this kind must be hashable.
    pub const fn requires_hashing(self) -> bool {
        matches!(
            self,
            CollectionKind::Set | CollectionKind::FrozenSet | CollectionKind::Counter
        )
    }

    /// Returns `true` if containers of this kind keep the arrival order of values.
    pub const fn preserves_order(self) -> bool {
        matches!(self, CollectionKind::Sequence | CollectionKind::FixedTuple)
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Error> {
        const NAMES: &[(&str, CollectionKind)] = &[
            ("sequence", CollectionKind::Sequence),
            ("list", CollectionKind::Sequence),
            ("vec", CollectionKind::Sequence),
            ("set", CollectionKind::Set),
            ("frozenset", CollectionKind::FrozenSet),
            ("frozen-set", CollectionKind::FrozenSet),
            ("fixed-tuple", CollectionKind::FixedTuple),
            ("tuple", CollectionKind::FixedTuple),
            ("counter", CollectionKind::Counter),
            ("multiset", CollectionKind::Counter),
        ];

        NAMES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|&(_, kind)| kind)
            .ok_or_else(|| Error::unsupported(name))
    }
}

/// Conversion into a [`CollectionKind`], failing for unsupported kinds.
pub trait IntoCollectionKind {
    /// Resolves the kind.
    fn into_kind(self) -> Result<CollectionKind, Error>;
}

impl IntoCollectionKind for CollectionKind {
    fn into_kind(self) -> Result<CollectionKind, Error> {
        Ok(self)
    }
}

impl IntoCollectionKind for &str {
    fn into_kind(self) -> Result<CollectionKind, Error> {
        self.parse()
    }
}

impl IntoCollectionKind for String {
    fn into_kind(self) -> Result<CollectionKind, Error> {
        self.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in CollectionKind::ALL {
            assert_eq!(kind.as_str().parse::<CollectionKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn aliases_are_case_insensitive() {
        assert_eq!("LIST".parse(), Ok(CollectionKind::Sequence));
        assert_eq!("Tuple".parse(), Ok(CollectionKind::FixedTuple));
        assert_eq!("MultiSet".parse(), Ok(CollectionKind::Counter));
        assert_eq!("frozen-set".into_kind(), Ok(CollectionKind::FrozenSet));
    }

    #[test]
    fn unknown_names_are_unsupported() {
        for name in ["dict", "deque", "", "list[int]"] {
            assert_eq!(
                name.into_kind(),
                Err(Error::UnsupportedCollectionKind { name: name.into() })
            );
        }
    }

    #[test]
    fn hashing_and_ordering_partition_the_kinds() {
        for kind in CollectionKind::ALL {
            assert_ne!(kind.requires_hashing(), kind.preserves_order());
        }
    }
}
