//! Group key-value pairs into per-key collections, and reverse (multi)mappings.
//!
//! ---
//!
//! [`group_by`] turns a stream of pairs:
//!  - `a -> 1`
//!  - `b -> 2`
//!  - `a -> 3`
//!
//! into a map from every distinct key to a collection of its values:
//!  - `a -> 1, 3`
//!  - `b -> 2`
//!
//! The collection is picked from a closed set of [`CollectionKind`]s:
//! sequences, sets, frozen sets, fixed-size tuples and counters.
//! Keys keep the order in which they were first seen.
//!
//! ---
//!
//! [`reverse_mapping`] and [`reverse_multimapping`] invert a mapping with the
//! same machinery, mapping every value to the keys that pointed at it.
//!
//! ---
//!
//! The input is consumed once and never buffered. Immutable kinds
//! ([`FrozenSet`], boxed slices) are staged in a mutable structure and built
//! once per key at the end, so every kind does amortized constant work per
//! pair.
//!
//! When the collection type is known at compile time, [`group_into`] gathers
//! values straight into any type implementing [`Collection`], including
//! caller-defined ones.
//!
//! # Examples
//!
//! ```
//! use collection_dict::{group_by, CollectionKind};
//!
//! let groups = group_by(CollectionKind::Set, [("a", 1), ("b", 2), ("a", 3)]).unwrap();
//!
//! let a = groups["a"].as_set().unwrap();
//! assert!(a.contains(&1) && a.contains(&3));
//! assert_eq!(groups["b"].len(), 1);
//! ```

mod collection;
mod element;
mod error;
mod kind;
mod reverse;

/// Multiset implementation counting occurrences per value.
pub mod counter;

/// Runtime-dispatched grouping and its result containers.
pub mod grouper;

/// Hash sets over possibly unhashable values.
pub mod set;

#[cfg(feature = "serde")]
mod serde;

pub use collection::{Collection, Stage};
pub use counter::Counter;
pub use element::Element;
pub use error::{Error, Unhashable};
pub use grouper::{group_by, group_into, group_into_with_hasher, Grouped, Grouper, ResultMap};
pub use kind::{CollectionKind, IntoCollectionKind};
pub use reverse::{
    reverse_mapping, reverse_mapping_into, reverse_multimapping, reverse_multimapping_into,
};
pub use set::{FrozenSet, ValueSet};
