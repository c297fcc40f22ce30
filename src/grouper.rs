use crate::collection::{Collection, Stage};
use crate::{counter, set};
use crate::{CollectionKind, Counter, Element, Error, FrozenSet, IntoCollectionKind, ValueSet};
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Grouping result: every distinct key with its container, in first-seen key order.
pub type ResultMap<K, C, S = RandomState> = IndexMap<K, C, S>;

/// Container produced for one key when the kind is chosen at runtime.
#[derive(Clone)]
pub enum Grouped<V> {
    /// Every value in arrival order.
    Sequence(Vec<V>),
    /// The distinct values.
    Set(ValueSet<V>),
    /// The distinct values, read-only.
    FrozenSet(FrozenSet<V>),
    /// Every value in arrival order, with a fixed length.
    FixedTuple(Box<[V]>),
    /// Each distinct value with its number of occurrences.
    Counter(Counter<V>),
}

impl<V> Grouped<V> {
    /// The kind this container was built with.
    pub fn kind(&self) -> CollectionKind {
        match self {
            Grouped::Sequence(_) => CollectionKind::Sequence,
            Grouped::Set(_) => CollectionKind::Set,
            Grouped::FrozenSet(_) => CollectionKind::FrozenSet,
            Grouped::FixedTuple(_) => CollectionKind::FixedTuple,
            Grouped::Counter(_) => CollectionKind::Counter,
        }
    }

    /// Number of elements, counting every occurrence in a counter.
    pub fn len(&self) -> usize {
        match self {
            Grouped::Sequence(values) => values.len(),
            Grouped::Set(values) => values.len(),
            Grouped::FrozenSet(values) => values.len(),
            Grouped::FixedTuple(values) => values.len(),
            Grouped::Counter(counter) => counter.total(),
        }
    }

    /// Returns `true` if the container holds no elements.
    ///
    /// Never the case for containers returned by a grouping.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The values in arrival order, for the ordered kinds.
    pub fn as_slice(&self) -> Option<&[V]> {
        match self {
            Grouped::Sequence(values) => Some(&values[..]),
            Grouped::FixedTuple(values) => Some(&values[..]),
            _ => None,
        }
    }

    /// The distinct values, for the set kinds.
    pub fn as_set(&self) -> Option<&ValueSet<V>> {
        match self {
            Grouped::Set(values) => Some(values),
            Grouped::FrozenSet(values) => Some(values.as_value_set()),
            _ => None,
        }
    }

    /// The value counts, for the counter kind.
    pub fn as_counter(&self) -> Option<&Counter<V>> {
        match self {
            Grouped::Counter(counter) => Some(counter),
            _ => None,
        }
    }
}

impl<V> PartialEq for Grouped<V>
where
    V: Element + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Grouped::Sequence(a), Grouped::Sequence(b)) => a == b,
            (Grouped::Set(a), Grouped::Set(b)) => a == b,
            (Grouped::FrozenSet(a), Grouped::FrozenSet(b)) => a == b,
            (Grouped::FixedTuple(a), Grouped::FixedTuple(b)) => a == b,
            (Grouped::Counter(a), Grouped::Counter(b)) => a == b,
            _ => false,
        }
    }
}

impl<V> Debug for Grouped<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grouped::Sequence(values) => values.fmt(f),
            Grouped::Set(values) => values.fmt(f),
            Grouped::FrozenSet(values) => values.fmt(f),
            Grouped::FixedTuple(values) => values.fmt(f),
            Grouped::Counter(counter) => counter.fmt(f),
        }
    }
}

/// Yields every element; counter values repeat by their count.
impl<V> IntoIterator for Grouped<V>
where
    V: Clone,
{
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        let inner = match self {
            Grouped::Sequence(values) => Inner::Ordered(values.into_iter()),
            Grouped::FixedTuple(values) => Inner::Ordered(values.into_vec().into_iter()),
            Grouped::Set(values) => Inner::Set(values.into_iter()),
            Grouped::FrozenSet(values) => Inner::Set(values.into_iter()),
            Grouped::Counter(counter) => Inner::Counter(counter.into_iter()),
        };
        IntoIter { inner }
    }
}

/// An owning iterator over the elements of a [`Grouped`] container.
pub struct IntoIter<V> {
    inner: Inner<V>,
}

enum Inner<V> {
    Ordered(std::vec::IntoIter<V>),
    Set(set::IntoIter<V>),
    Counter(counter::IntoIter<V>),
}

impl<V: Clone> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        match &mut self.inner {
            Inner::Ordered(iter) => iter.next(),
            Inner::Set(iter) => iter.next(),
            Inner::Counter(iter) => iter.next(),
        }
    }
}

impl<V: Clone> FusedIterator for IntoIter<V> {}

/// Groups key-value pairs with a kind chosen at runtime.
///
/// The kind is resolved once, when the `Grouper` is built; every call to
/// [`group`](Grouper::group) then runs a single accumulation strategy over the
/// whole input.
///
/// # Examples
///
/// ```
/// use collection_dict::{CollectionKind, Grouper};
///
/// let grouper = Grouper::new(CollectionKind::Counter).with_capacity(2);
/// let counts = grouper.group([("a", 1), ("a", 1), ("a", 2)]).unwrap();
///
/// let a = counts["a"].as_counter().unwrap();
/// assert_eq!(a.count(&1), 2);
/// assert_eq!(a.count(&2), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Grouper<S = RandomState> {
    kind: CollectionKind,
    hash_builder: S,
    capacity: usize,
}

impl Grouper<RandomState> {
    /// Creates a grouper for the given kind.
    #[must_use]
    pub fn new(kind: CollectionKind) -> Self {
        Self::with_hasher(kind, RandomState::default())
    }

    /// Creates a grouper, failing if the kind is not supported.
    ///
    /// ```
    /// use collection_dict::{Error, Grouper};
    ///
    /// assert!(Grouper::try_new("set").is_ok());
    /// assert_eq!(
    ///     Grouper::try_new("deque").unwrap_err(),
    ///     Error::UnsupportedCollectionKind { name: "deque".into() },
    /// );
    /// ```
    pub fn try_new(kind: impl IntoCollectionKind) -> Result<Self, Error> {
        match kind.into_kind() {
            Ok(kind) => Ok(Self::new(kind)),
            Err(err) => {
                debug!(error = %err, "rejected collection kind");
                Err(err)
            }
        }
    }
}

impl<S> Grouper<S> {
    /// Creates a grouper whose result maps use the given hash builder for keys.
    pub const fn with_hasher(kind: CollectionKind, hash_builder: S) -> Self {
        Self {
            kind,
            hash_builder,
            capacity: 0,
        }
    }

    /// Reserves room for at least `capacity` distinct keys in each result.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// The kind this grouper builds.
    pub const fn kind(&self) -> CollectionKind {
        self.kind
    }
}

impl<S> Grouper<S>
where
    S: BuildHasher + Clone,
{
    /// Groups the pairs by key.
    ///
    /// The pairs are consumed once, in order. Fails with
    /// [`Error::ValueConstraintViolation`] at the first value a hashing kind
    /// cannot store.
    pub fn group<K, V, I>(&self, pairs: I) -> Result<ResultMap<K, Grouped<V>, S>, Error>
    where
        K: Hash + Eq,
        V: Element,
        I: IntoIterator<Item = (K, V)>,
    {
        let hash_builder = self.hash_builder.clone();
        let capacity = self.capacity;

        match self.kind {
            CollectionKind::Sequence => accumulate(pairs, hash_builder, capacity, Grouped::Sequence),
            CollectionKind::Set => accumulate(pairs, hash_builder, capacity, Grouped::Set),
            CollectionKind::FrozenSet => accumulate(pairs, hash_builder, capacity, Grouped::FrozenSet),
            CollectionKind::FixedTuple => {
                accumulate(pairs, hash_builder, capacity, Grouped::FixedTuple)
            }
            CollectionKind::Counter => accumulate(pairs, hash_builder, capacity, Grouped::Counter),
        }
    }
}

/// Groups key-value pairs into containers of the given kind.
///
/// Fails with [`Error::UnsupportedCollectionKind`] before touching `pairs` if
/// the kind is not supported.
///
/// # Examples
///
/// ```
/// use collection_dict::{group_by, CollectionKind};
///
/// let groups = group_by(CollectionKind::Sequence, [("a", 1), ("a", 1), ("b", 2)]).unwrap();
///
/// assert_eq!(groups["a"].as_slice(), Some(&[1, 1][..]));
/// assert_eq!(groups["b"].as_slice(), Some(&[2][..]));
/// ```
pub fn group_by<K, V, I>(
    kind: impl IntoCollectionKind,
    pairs: I,
) -> Result<ResultMap<K, Grouped<V>>, Error>
where
    K: Hash + Eq,
    V: Element,
    I: IntoIterator<Item = (K, V)>,
{
    Grouper::try_new(kind)?.group(pairs)
}

/// Groups key-value pairs into the collection type `C`.
///
/// # Examples
///
/// ```
/// use collection_dict::group_into;
/// use std::collections::HashSet;
///
/// let groups = group_into::<HashSet<_>, _, _, _>([("a", 1), ("b", 2), ("a", 3)]).unwrap();
///
/// assert_eq!(groups["a"], HashSet::from([1, 3]));
/// assert_eq!(groups["b"], HashSet::from([2]));
/// ```
pub fn group_into<C, K, V, I>(pairs: I) -> Result<ResultMap<K, C>, Error>
where
    C: Collection<V>,
    K: Hash + Eq,
    I: IntoIterator<Item = (K, V)>,
{
    group_into_with_hasher(pairs, RandomState::default())
}

/// Like [`group_into`], with the given hash builder for the result's keys.
pub fn group_into_with_hasher<C, K, V, I, S>(
    pairs: I,
    hash_builder: S,
) -> Result<ResultMap<K, C, S>, Error>
where
    C: Collection<V>,
    K: Hash + Eq,
    I: IntoIterator<Item = (K, V)>,
    S: BuildHasher + Clone,
{
    accumulate(pairs, hash_builder, 0, |collection: C| collection)
}

/// Streams `pairs` into one staging structure per key, then materializes every
/// key's collection and hands it to `wrap`.
fn accumulate<C, K, V, I, S, T>(
    pairs: I,
    hash_builder: S,
    capacity: usize,
    wrap: fn(C) -> T,
) -> Result<ResultMap<K, T, S>, Error>
where
    C: Collection<V>,
    K: Hash + Eq,
    I: IntoIterator<Item = (K, V)>,
    S: BuildHasher + Clone,
{
    let mut staged: IndexMap<K, C::Staging, S> =
        IndexMap::with_capacity_and_hasher(capacity, hash_builder.clone());
    let mut consumed = 0;

    for (position, (key, value)) in pairs.into_iter().enumerate() {
        let pushed = match staged.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value),
            Entry::Vacant(entry) => <C::Staging as Stage<V>>::start(value).map(|staging| {
                entry.insert(staging);
            }),
        };

        if let Err(cause) = pushed {
            let err = Error::violation(C::KIND, position, cause);
            debug!(kind = %C::KIND, position, error = %err, "grouping aborted");
            return Err(err);
        }
        consumed = position + 1;
    }

    let mut result = IndexMap::with_capacity_and_hasher(staged.len(), hash_builder);
    result.extend(
        staged
            .into_iter()
            .map(|(key, staging)| (key, wrap(C::materialize(staging)))),
    );

    trace!(kind = %C::KIND, pairs = consumed, keys = result.len(), "grouped pairs");
    Ok(result)
}
