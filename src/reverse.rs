use crate::{group_by, group_into, Collection, Element, Error, Grouped, IntoCollectionKind, ResultMap};
use std::hash::Hash;

/// Inverts a single-valued mapping: every value maps to the keys that pointed at it.
///
/// Entries are visited in the mapping's iteration order, so with an ordered
/// kind the keys of each group keep that order. The original keys become the
/// grouped values and must satisfy the kind's value constraint.
///
/// # Examples
///
/// ```
/// use collection_dict::{reverse_mapping, CollectionKind};
///
/// let mapping = [("x", 1), ("y", 1), ("z", 2)];
/// let reversed = reverse_mapping(CollectionKind::Sequence, mapping).unwrap();
///
/// assert_eq!(reversed[&1].as_slice(), Some(&["x", "y"][..]));
/// assert_eq!(reversed[&2].as_slice(), Some(&["z"][..]));
/// ```
pub fn reverse_mapping<K, V, M>(
    kind: impl IntoCollectionKind,
    mapping: M,
) -> Result<ResultMap<V, Grouped<K>>, Error>
where
    K: Element,
    V: Hash + Eq,
    M: IntoIterator<Item = (K, V)>,
{
    group_by(kind, swap(mapping))
}

/// Inverts a multi-valued mapping: every value maps to the keys whose
/// collections contained it.
///
/// The per-key collections may be any iterable. A key is repeated once for
/// every occurrence of a value in its collection, so reversing twice with
/// [`CollectionKind::Counter`](crate::CollectionKind::Counter) restores the
/// original value counts.
///
/// # Examples
///
/// ```
/// use collection_dict::{reverse_multimapping, CollectionKind};
///
/// let multimapping = vec![("a", vec![1, 2]), ("b", vec![2])];
/// let reversed = reverse_multimapping(CollectionKind::Set, multimapping).unwrap();
///
/// let two = reversed[&2].as_set().unwrap();
/// assert!(two.contains(&"a") && two.contains(&"b"));
/// assert_eq!(reversed[&1].len(), 1);
/// ```
pub fn reverse_multimapping<K, V, M, I>(
    kind: impl IntoCollectionKind,
    multimapping: M,
) -> Result<ResultMap<V, Grouped<K>>, Error>
where
    K: Element + Clone,
    V: Hash + Eq,
    M: IntoIterator<Item = (K, I)>,
    I: IntoIterator<Item = V>,
{
    group_by(kind, flatten_swapped(multimapping))
}

/// Like [`reverse_mapping`], gathering the keys into the collection type `C`.
pub fn reverse_mapping_into<C, K, V, M>(mapping: M) -> Result<ResultMap<V, C>, Error>
where
    C: Collection<K>,
    V: Hash + Eq,
    M: IntoIterator<Item = (K, V)>,
{
    group_into(swap(mapping))
}

/// Like [`reverse_multimapping`], gathering the keys into the collection type `C`.
///
/// ```
/// use collection_dict::{reverse_multimapping_into, Counter};
///
/// let tags = vec![("post-1", vec!["rust", "rust", "ops"]), ("post-2", vec!["rust"])];
/// let posts = reverse_multimapping_into::<Counter<_>, _, _, _, _>(tags).unwrap();
///
/// assert_eq!(posts["rust"].count(&"post-1"), 2);
/// assert_eq!(posts["ops"].total(), 1);
/// ```
pub fn reverse_multimapping_into<C, K, V, M, I>(multimapping: M) -> Result<ResultMap<V, C>, Error>
where
    C: Collection<K>,
    K: Clone,
    V: Hash + Eq,
    M: IntoIterator<Item = (K, I)>,
    I: IntoIterator<Item = V>,
{
    group_into(flatten_swapped(multimapping))
}

fn swap<K, V, M>(mapping: M) -> impl Iterator<Item = (V, K)>
where
    M: IntoIterator<Item = (K, V)>,
{
    mapping.into_iter().map(|(key, value)| (value, key))
}

fn flatten_swapped<K, V, M, I>(multimapping: M) -> impl Iterator<Item = (V, K)>
where
    K: Clone,
    M: IntoIterator<Item = (K, I)>,
    I: IntoIterator<Item = V>,
{
    multimapping.into_iter().flat_map(|(key, values)| {
        values
            .into_iter()
            .map(move |value| (value, key.clone()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CollectionKind, Counter};
    use std::collections::HashSet;

    #[test]
    fn reverse_mapping_keeps_mapping_order() {
        let reversed =
            reverse_mapping(CollectionKind::Sequence, [("x", 1), ("y", 1), ("z", 2)]).unwrap();

        assert_eq!(reversed.keys().copied().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(reversed[&1].as_slice(), Some(&["x", "y"][..]));
    }

    #[test]
    fn reverse_mapping_into_sets() {
        let reversed =
            reverse_mapping_into::<HashSet<_>, _, _, _>([(1, 'a'), (2, 'b'), (3, 'a')]).unwrap();

        assert_eq!(reversed[&'a'], HashSet::from([1, 3]));
        assert_eq!(reversed[&'b'], HashSet::from([2]));
    }

    #[test]
    fn reverse_multimapping_accepts_mixed_iterables() {
        type Chars = Box<dyn Iterator<Item = char>>;
        let multimapping: Vec<(u8, Chars)> = vec![
            (1, Box::new("ab".chars()) as Chars),
            (2, Box::new(HashSet::from(['b']).into_iter()) as Chars),
        ];
        let reversed = reverse_multimapping(CollectionKind::Sequence, multimapping).unwrap();

        assert_eq!(reversed[&'a'].as_slice(), Some(&[1][..]));
        assert_eq!(reversed[&'b'].as_slice(), Some(&[1, 2][..]));
    }

    #[test]
    fn empty_collections_contribute_nothing() {
        let reversed =
            reverse_multimapping(CollectionKind::Counter, vec![(1, vec![]), (2, vec![7])]).unwrap();

        assert_eq!(reversed.len(), 1);
        assert_eq!(reversed[&7].as_counter().map(|c| c.count(&2)), Some(1));
    }

    #[test]
    fn counter_round_trip_restores_counts() {
        let original = vec![("a", vec![1, 1, 2]), ("b", vec![2, 3])];

        let once = reverse_multimapping_into::<Counter<_>, _, _, _, _>(original).unwrap();
        let twice = reverse_multimapping_into::<Counter<_>, _, _, _, _>(once).unwrap();

        assert_eq!(twice["a"].count(&1), 2);
        assert_eq!(twice["a"].count(&2), 1);
        assert_eq!(twice["b"].count(&3), 1);
        assert_eq!(twice["b"].total(), 2);
    }

    #[test]
    fn unsupported_kind_is_reported() {
        let err = reverse_mapping("deque", [(1, 2)]).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedCollectionKind {
                name: "deque".into()
            }
        );
    }
}
