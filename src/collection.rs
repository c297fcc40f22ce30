use crate::{CollectionKind, Counter, Element, FrozenSet, Unhashable, ValueSet};
use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

mod sealed {
    pub trait Sealed {}
}

/// Mutable structure a grouping accumulates one key's values into.
///
/// Sealed: the only staging types are `Vec<V>` (ordered kinds),
/// [`ValueSet`] and `HashSet` (set kinds) and [`Counter`].
pub trait Stage<V>: sealed::Sealed + Sized {
    /// Creates the staging structure for the first value seen for a key.
    fn start(value: V) -> Result<Self, Unhashable>;

    /// Adds a further value for the same key.
    fn push(&mut self, value: V) -> Result<(), Unhashable>;
}

impl<V> sealed::Sealed for Vec<V> {}

impl<V> Stage<V> for Vec<V> {
    fn start(value: V) -> Result<Self, Unhashable> {
        Ok(vec![value])
    }

    fn push(&mut self, value: V) -> Result<(), Unhashable> {
        Vec::push(self, value);
        Ok(())
    }
}

impl<V, S> sealed::Sealed for ValueSet<V, S> {}

impl<V, S> Stage<V> for ValueSet<V, S>
where
    V: Element,
    S: BuildHasher + Default,
{
    fn start(value: V) -> Result<Self, Unhashable> {
        let mut set = ValueSet::with_hasher(S::default());
        set.insert(value)?;
        Ok(set)
    }

    fn push(&mut self, value: V) -> Result<(), Unhashable> {
        self.insert(value).map(drop)
    }
}

impl<V, S> sealed::Sealed for HashSet<V, S> {}

impl<V, S> Stage<V> for HashSet<V, S>
where
    V: Hash + Eq,
    S: BuildHasher + Default,
{
    fn start(value: V) -> Result<Self, Unhashable> {
        let mut set = HashSet::with_hasher(S::default());
        set.insert(value);
        Ok(set)
    }

    fn push(&mut self, value: V) -> Result<(), Unhashable> {
        self.insert(value);
        Ok(())
    }
}

impl<V, S> sealed::Sealed for Counter<V, S> {}

impl<V, S> Stage<V> for Counter<V, S>
where
    V: Element,
    S: BuildHasher + Default,
{
    fn start(value: V) -> Result<Self, Unhashable> {
        let mut counter = Counter::with_hasher(S::default());
        counter.add(value)?;
        Ok(counter)
    }

    fn push(&mut self, value: V) -> Result<(), Unhashable> {
        self.add(value).map(drop)
    }
}

/// An output collection that grouped values can be gathered into.
///
/// Each implementation picks one of the base behaviors through
/// [`KIND`](Collection::KIND) and its [`Staging`](Collection::Staging) type.
/// Values are accumulated in the staging structure and
/// [`materialize`](Collection::materialize) runs once per key after the whole
/// input has been consumed.
///
/// # Examples
///
/// A caller-defined sequence type:
///
/// ```
/// use collection_dict::{group_into, Collection, CollectionKind};
///
/// #[derive(Debug, PartialEq)]
/// struct Trail(Vec<u32>);
///
/// impl Collection<u32> for Trail {
///     const KIND: CollectionKind = CollectionKind::Sequence;
///     type Staging = Vec<u32>;
///
///     fn materialize(staging: Vec<u32>) -> Self {
///         Trail(staging)
///     }
/// }
///
/// let trails = group_into::<Trail, _, _, _>([("x", 1_u32), ("y", 5), ("x", 2)]).unwrap();
///
/// assert_eq!(trails["x"], Trail(vec![1, 2]));
/// assert_eq!(trails["y"], Trail(vec![5]));
/// ```
pub trait Collection<V>: Sized {
    /// The base behavior this collection is built with.
    const KIND: CollectionKind;

    /// Where values are accumulated before materializing.
    type Staging: Stage<V>;

    /// Builds the final collection for one key.
    fn materialize(staging: Self::Staging) -> Self;
}

impl<V> Collection<V> for Vec<V> {
    const KIND: CollectionKind = CollectionKind::Sequence;
    type Staging = Vec<V>;

    fn materialize(staging: Vec<V>) -> Self {
        staging
    }
}

impl<V> Collection<V> for Box<[V]> {
    const KIND: CollectionKind = CollectionKind::FixedTuple;
    type Staging = Vec<V>;

    fn materialize(staging: Vec<V>) -> Self {
        staging.into_boxed_slice()
    }
}

impl<V> Collection<V> for Arc<[V]> {
    const KIND: CollectionKind = CollectionKind::FixedTuple;
    type Staging = Vec<V>;

    fn materialize(staging: Vec<V>) -> Self {
        staging.into()
    }
}

impl<V, S> Collection<V> for ValueSet<V, S>
where
    V: Element,
    S: BuildHasher + Default,
{
    const KIND: CollectionKind = CollectionKind::Set;
    type Staging = ValueSet<V, S>;

    fn materialize(staging: ValueSet<V, S>) -> Self {
        staging
    }
}

impl<V, S> Collection<V> for FrozenSet<V, S>
where
    V: Element,
    S: BuildHasher + Default,
{
    const KIND: CollectionKind = CollectionKind::FrozenSet;
    type Staging = ValueSet<V, S>;

    fn materialize(staging: ValueSet<V, S>) -> Self {
        FrozenSet::from(staging)
    }
}

impl<V, S> Collection<V> for HashSet<V, S>
where
    V: Hash + Eq,
    S: BuildHasher + Default,
{
    const KIND: CollectionKind = CollectionKind::Set;
    type Staging = HashSet<V, S>;

    fn materialize(staging: HashSet<V, S>) -> Self {
        staging
    }
}

impl<V, S> Collection<V> for Counter<V, S>
where
    V: Element,
    S: BuildHasher + Default,
{
    const KIND: CollectionKind = CollectionKind::Counter;
    type Staging = Counter<V, S>;

    fn materialize(staging: Counter<V, S>) -> Self {
        staging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_all<C: Collection<V>, V>(values: Vec<V>) -> C {
        let mut values = values.into_iter();
        let first = values.next().expect("at least one value");
        let mut staging = <C::Staging as Stage<V>>::start(first).unwrap();
        for value in values {
            staging.push(value).unwrap();
        }
        C::materialize(staging)
    }

    #[test]
    fn ordered_collections_keep_arrival_order() {
        let vec: Vec<_> = stage_all(vec![3, 1, 3]);
        let boxed: Box<[_]> = stage_all(vec![3, 1, 3]);
        let shared: Arc<[_]> = stage_all(vec![3, 1, 3]);

        assert_eq!(vec, [3, 1, 3]);
        assert_eq!(&*boxed, [3, 1, 3]);
        assert_eq!(&*shared, [3, 1, 3]);
    }

    #[test]
    fn set_collections_deduplicate() {
        let set: ValueSet<_> = stage_all(vec![3, 1, 3]);
        let frozen: FrozenSet<_> = stage_all(vec![3, 1, 3]);
        let std_set: HashSet<_> = stage_all(vec![3, 1, 3]);

        assert_eq!(set, ValueSet::from([1, 3]));
        assert_eq!(frozen.len(), 2);
        assert_eq!(std_set, HashSet::from([1, 3]));
    }

    #[test]
    fn std_sets_stage_values_directly() {
        #[derive(Debug, Hash, PartialEq, Eq)]
        struct Label(&'static str);

        let labels: HashSet<_> = stage_all(vec![Label("b"), Label("a"), Label("b")]);

        assert_eq!(labels, HashSet::from([Label("a"), Label("b")]));
    }

    #[test]
    fn counter_counts() {
        let counter: Counter<_> = stage_all(vec![3, 1, 3]);

        assert_eq!(counter.count(&3), 2);
        assert_eq!(counter.count(&1), 1);
    }

    #[test]
    fn kinds_match_behaviors() {
        assert_eq!(<Vec<u8> as Collection<u8>>::KIND, CollectionKind::Sequence);
        assert_eq!(<Box<[u8]> as Collection<u8>>::KIND, CollectionKind::FixedTuple);
        assert_eq!(<FrozenSet<u8> as Collection<u8>>::KIND, CollectionKind::FrozenSet);
        assert_eq!(<HashSet<u8> as Collection<u8>>::KIND, CollectionKind::Set);
        assert_eq!(<Counter<u8> as Collection<u8>>::KIND, CollectionKind::Counter);
    }
}
