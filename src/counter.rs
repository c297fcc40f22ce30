use crate::element::make_hash;
use crate::{Element, Unhashable};
use hashbrown::raw::{RawIntoIter, RawIter, RawTable};
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::BuildHasher;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Multiset that counts the occurrences of each [`Element`] value.
///
/// # Examples
///
/// ```
/// use collection_dict::Counter;
///
/// let mut counter = Counter::new();
/// counter.add('a').unwrap();
/// counter.add('a').unwrap();
/// counter.add('b').unwrap();
///
/// assert_eq!(counter.count(&'a'), 2);
/// assert_eq!(counter.count(&'z'), 0);
/// assert_eq!(counter.len(), 2);
/// assert_eq!(counter.total(), 3);
/// ```
#[derive(Clone)]
pub struct Counter<V, S = RandomState> {
    hash_builder: S,
    table: RawTable<(u64, V, usize)>,
    total: usize,
}

impl<V> Counter<V, RandomState> {
    /// Creates an empty `Counter`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::default())
    }
}

impl<V, S> Counter<V, S> {
    /// Creates an empty `Counter` which will use the given hash builder to hash values.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self {
            hash_builder,
            table: RawTable::new(),
            total: 0,
        }
    }

    /// Returns the number of distinct values.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns the number of occurrences of all values together.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns `true` if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// An iterator visiting every distinct value with its count, in arbitrary order.
    pub fn iter(&self) -> Iter<'_, V> {
        unsafe {
            Iter {
                iter: self.table.iter(),
                phantom: PhantomData,
            }
        }
    }

    /// Consumes the counter, yielding every distinct value with its count.
    pub fn into_counts(self) -> IntoCounts<V> {
        IntoCounts {
            iter: self.table.into_iter(),
        }
    }

    /// Returns the distinct values ordered from most to least frequent.
    ///
    /// Values with equal counts appear in arbitrary order.
    pub fn most_common(&self) -> Vec<(&V, usize)> {
        let mut counts: Vec<_> = self.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

impl<V, S> Counter<V, S>
where
    V: Element,
    S: BuildHasher,
{
    /// Counts one more occurrence of the value, returning its new count.
    ///
    /// Fails without touching the counter if the value is not hashable.
    pub fn add(&mut self, value: V) -> Result<usize, Unhashable> {
        let hash = make_hash(&self.hash_builder, &value)?;
        self.total += 1;

        if let Some(entry) = self.table.get_mut(hash, equivalent_entry(hash, &value)) {
            entry.2 += 1;
            return Ok(entry.2);
        }

        self.table.insert(hash, (hash, value, 1), |x| x.0);
        Ok(1)
    }

    /// Returns how often the value was counted.
    pub fn count(&self, value: &V) -> usize {
        match make_hash(&self.hash_builder, value) {
            Ok(hash) => self
                .table
                .get(hash, equivalent_entry(hash, value))
                .map_or(0, |x| x.2),
            Err(_) => 0,
        }
    }

    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn add_many(&mut self, value: V, count: usize) -> Result<(), Unhashable> {
        let hash = make_hash(&self.hash_builder, &value)?;
        if count == 0 {
            return Ok(());
        }
        self.total += count;

        match self.table.get_mut(hash, equivalent_entry(hash, &value)) {
            Some(entry) => entry.2 += count,
            None => {
                self.table.insert(hash, (hash, value, count), |x| x.0);
            }
        }

        Ok(())
    }
}

impl<V, S> Default for Counter<V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<V, S> PartialEq for Counter<V, S>
where
    V: Element,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.total == other.total
            && self.iter().all(|(value, count)| other.count(value) == count)
    }
}

impl<V, S> Eq for Counter<V, S>
where
    V: Element,
    S: BuildHasher,
{
}

impl<V, S> Debug for Counter<V, S>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V, S> IntoIterator for &'a Counter<V, S> {
    type Item = (&'a V, usize);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

/// Yields every counted occurrence, so a value counted `n` times appears `n` times.
impl<V, S> IntoIterator for Counter<V, S>
where
    V: Clone,
{
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter {
            counts: self.into_counts(),
            current: None,
        }
    }
}

/// An iterator over the values of a `Counter` and their counts.
pub struct Iter<'a, V> {
    iter: RawIter<(u64, V, usize)>,
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
    type Item = (&'a V, usize);

    fn next(&mut self) -> Option<(&'a V, usize)> {
        self.iter.next().map(|bucket| unsafe {
            let entry = bucket.as_ref();
            (&entry.1, entry.2)
        })
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

/// An owning iterator over the values of a `Counter` and their counts.
pub struct IntoCounts<V> {
    iter: RawIntoIter<(u64, V, usize)>,
}

impl<V> Iterator for IntoCounts<V> {
    type Item = (V, usize);

    fn next(&mut self) -> Option<(V, usize)> {
        self.iter.next().map(|(_, value, count)| (value, count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoCounts<V> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<V> FusedIterator for IntoCounts<V> {}

/// An owning iterator repeating every value of a `Counter` by its count.
pub struct IntoIter<V> {
    counts: IntoCounts<V>,
    current: Option<(V, usize)>,
}

impl<V: Clone> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        loop {
            match self.current.take() {
                Some((value, 1)) => return Some(value),
                Some((value, remaining)) => {
                    self.current = Some((value.clone(), remaining - 1));
                    return Some(value);
                }
                None => self.current = Some(self.counts.next()?),
            }
        }
    }
}

impl<V: Clone> FusedIterator for IntoIter<V> {}

fn equivalent_entry<V>(hash: u64, value: &V) -> impl Fn(&(u64, V, usize)) -> bool + '_
where
    V: Element,
{
    move |x| x.0 == hash && value.equivalent(&x.1)
}
