use crate::element::make_hash;
use crate::{Element, Unhashable};
use hashbrown::raw::{RawIntoIter, RawIter, RawTable};
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::BuildHasher;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Hash set over [`Element`] values.
///
/// Every value is stored next to its hash; growing the table never calls
/// [`Element::try_hash`] again.
///
/// # Examples
///
/// ```
/// use collection_dict::ValueSet;
///
/// let mut set = ValueSet::new();
///
/// assert_eq!(set.insert("a"), Ok(true));
/// assert_eq!(set.insert("a"), Ok(false));
/// assert_eq!(set.insert("b"), Ok(true));
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(&"b"));
/// ```
#[derive(Clone)]
pub struct ValueSet<V, S = RandomState> {
    hash_builder: S,
    table: RawTable<(u64, V)>,
}

impl<V> ValueSet<V, RandomState> {
    /// Creates an empty `ValueSet` with a capacity of 0.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::default())
    }

    /// Creates an empty `ValueSet` with at least the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::default())
    }
}

impl<V, S> ValueSet<V, S> {
    /// Creates an empty `ValueSet` which will use the given hash builder to hash values.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self {
            hash_builder,
            table: RawTable::new(),
        }
    }

    /// Creates an empty `ValueSet` with at least the specified capacity, using the given hash builder to hash values.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            hash_builder,
            table: RawTable::with_capacity(capacity),
        }
    }

    /// Returns the number of values the set can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns a reference to the set's [`BuildHasher`].
    pub const fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Clears the set, removing all values. Keeps the allocated memory for reuse.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// An iterator visiting all values in arbitrary order.
    pub fn iter(&self) -> Iter<'_, V> {
        unsafe {
            Iter {
                iter: self.table.iter(),
                phantom: PhantomData,
            }
        }
    }
}

impl<V, S> ValueSet<V, S>
where
    V: Element,
    S: BuildHasher,
{
    /// Adds a value to the set. Returns whether the value was newly inserted.
    ///
    /// Fails without touching the set if the value is not hashable.
    pub fn insert(&mut self, value: V) -> Result<bool, Unhashable> {
        let hash = make_hash(&self.hash_builder, &value)?;
        Ok(self.insert_hashed(hash, value))
    }

    /// Returns `true` if the set contains the value.
    ///
    /// An unhashable value is never contained.
    pub fn contains(&self, value: &V) -> bool {
        match make_hash(&self.hash_builder, value) {
            Ok(hash) => self.table.get(hash, equivalent_entry(hash, value)).is_some(),
            Err(_) => false,
        }
    }

    fn insert_hashed(&mut self, hash: u64, value: V) -> bool {
        if self.table.get(hash, equivalent_entry(hash, &value)).is_some() {
            return false;
        }

        self.table.insert(hash, (hash, value), |x| x.0);
        true
    }
}

impl<V, S> Default for ValueSet<V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<V, S> PartialEq for ValueSet<V, S>
where
    V: Element,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<V, S> Eq for ValueSet<V, S>
where
    V: Element,
    S: BuildHasher,
{
}

impl<V, S> Debug for ValueSet<V, S>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// # Panics
///
/// Panics if a value is not hashable. Use [`ValueSet::insert`] to handle that case.
impl<V, S> FromIterator<V> for ValueSet<V, S>
where
    V: Element,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut set = Self::with_hasher(Default::default());
        set.extend(iter);
        set
    }
}

/// # Panics
///
/// Panics if a value is not hashable. Use [`ValueSet::insert`] to handle that case.
impl<V, S> Extend<V> for ValueSet<V, S>
where
    V: Element,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            if let Err(err) = self.insert(value) {
                panic!("{err}");
            }
        }
    }
}

impl<V, const N: usize> From<[V; N]> for ValueSet<V, RandomState>
where
    V: Element,
{
    fn from(arr: [V; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, V, S> IntoIterator for &'a ValueSet<V, S> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<V, S> IntoIterator for ValueSet<V, S> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter {
            iter: self.table.into_iter(),
        }
    }
}

/// Read-only set of [`Element`] values.
///
/// Produced by grouping with [`CollectionKind::FrozenSet`](crate::CollectionKind::FrozenSet).
/// It offers no way to add or remove values.
///
/// # Examples
///
/// ```
/// use collection_dict::{FrozenSet, ValueSet};
///
/// let set = FrozenSet::from(ValueSet::from([1, 2, 2]));
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(&1));
/// ```
#[derive(Clone)]
pub struct FrozenSet<V, S = RandomState> {
    set: ValueSet<V, S>,
}

impl<V, S> FrozenSet<V, S> {
    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// An iterator visiting all values in arbitrary order.
    pub fn iter(&self) -> Iter<'_, V> {
        self.set.iter()
    }

    /// Returns the underlying [`ValueSet`] for read-only access.
    pub fn as_value_set(&self) -> &ValueSet<V, S> {
        &self.set
    }

    /// Returns the values as a mutable [`ValueSet`].
    pub fn into_inner(self) -> ValueSet<V, S> {
        self.set
    }
}

impl<V, S> FrozenSet<V, S>
where
    V: Element,
    S: BuildHasher,
{
    /// Returns `true` if the set contains the value.
    pub fn contains(&self, value: &V) -> bool {
        self.set.contains(value)
    }
}

impl<V, S> From<ValueSet<V, S>> for FrozenSet<V, S> {
    fn from(set: ValueSet<V, S>) -> Self {
        Self { set }
    }
}

impl<V, S> Default for FrozenSet<V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self {
            set: ValueSet::default(),
        }
    }
}

impl<V, S> PartialEq for FrozenSet<V, S>
where
    V: Element,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.set == other.set
    }
}

impl<V, S> Eq for FrozenSet<V, S>
where
    V: Element,
    S: BuildHasher,
{
}

impl<V, S> Debug for FrozenSet<V, S>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("frozen")?;
        self.set.fmt(f)
    }
}

impl<'a, V, S> IntoIterator for &'a FrozenSet<V, S> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<V, S> IntoIterator for FrozenSet<V, S> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        self.set.into_iter()
    }
}

/// An iterator over the values of a `ValueSet` or `FrozenSet`.
pub struct Iter<'a, V> {
    iter: RawIter<(u64, V)>,
    phantom: PhantomData<&'a V>,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            phantom: PhantomData,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.iter.next().map(|bucket| unsafe { &bucket.as_ref().1 })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V: Debug> Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the values of a `ValueSet` or `FrozenSet`.
pub struct IntoIter<V> {
    iter: RawIntoIter<(u64, V)>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<V> FusedIterator for IntoIter<V> {}

fn equivalent_entry<V>(hash: u64, value: &V) -> impl Fn(&(u64, V)) -> bool + '_
where
    V: Element,
{
    move |x| x.0 == hash && value.equivalent(&x.1)
}
