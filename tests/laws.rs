use collection_dict::{
    group_by, group_into, reverse_mapping, reverse_multimapping, CollectionKind, Counter, Error,
    Grouped,
};
use quickcheck_macros::quickcheck;
use std::cell::Cell;
use std::collections::{HashMap, HashSet};

const ORDERED: [CollectionKind; 2] = [CollectionKind::Sequence, CollectionKind::FixedTuple];
const HASHING: [CollectionKind; 3] = [
    CollectionKind::Set,
    CollectionKind::FrozenSet,
    CollectionKind::Counter,
];

fn values_of(pairs: &[(u8, u8)], key: u8) -> Vec<u8> {
    pairs
        .iter()
        .filter(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .collect()
}

#[test]
fn empty_input_gives_empty_result() {
    for kind in CollectionKind::ALL {
        let result = group_by(kind, std::iter::empty::<(String, u8)>()).unwrap();
        assert!(result.is_empty());
    }
}

#[quickcheck]
fn ordered_kinds_keep_every_value_in_arrival_order(pairs: Vec<(u8, u8)>) -> bool {
    ORDERED.iter().all(|&kind| {
        let result = group_by(kind, pairs.clone()).unwrap();
        result
            .iter()
            .all(|(&key, grouped)| grouped.as_slice() == Some(&values_of(&pairs, key)[..]))
    })
}

#[quickcheck]
fn no_key_is_dropped_and_keys_keep_first_seen_order(pairs: Vec<(u8, u8)>) -> bool {
    let mut first_seen = Vec::new();
    for (key, _) in &pairs {
        if !first_seen.contains(key) {
            first_seen.push(*key);
        }
    }

    CollectionKind::ALL.iter().all(|&kind| {
        let result = group_by(kind, pairs.clone()).unwrap();
        result.keys().copied().eq(first_seen.iter().copied())
            && result.values().all(|grouped| !grouped.is_empty())
    })
}

#[quickcheck]
fn set_kinds_hold_distinct_values(pairs: Vec<(u8, u8)>) -> bool {
    [CollectionKind::Set, CollectionKind::FrozenSet]
        .iter()
        .all(|&kind| {
            let result = group_by(kind, pairs.clone()).unwrap();
            result.iter().all(|(&key, grouped)| {
                let expected: HashSet<u8> = values_of(&pairs, key).into_iter().collect();
                let set = grouped.as_set().unwrap();
                set.len() == expected.len() && expected.iter().all(|v| set.contains(v))
            })
        })
}

#[quickcheck]
fn counter_holds_exact_frequencies(pairs: Vec<(u8, u8)>) -> bool {
    let result = group_by(CollectionKind::Counter, pairs.clone()).unwrap();

    result.iter().all(|(&key, grouped)| {
        let counter = grouped.as_counter().unwrap();
        let values = values_of(&pairs, key);
        counter.total() == values.len()
            && values
                .iter()
                .all(|v| counter.count(v) == values.iter().filter(|x| *x == v).count())
    })
}

#[quickcheck]
fn hashing_kinds_ignore_input_order(pairs: Vec<(u8, u8)>, ranks: Vec<u32>) -> bool {
    let mut ranked: Vec<(u32, (u8, u8))> = ranks
        .into_iter()
        .chain(0..)
        .zip(pairs.iter().copied())
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);
    let shuffled: Vec<(u8, u8)> = ranked.into_iter().map(|(_, pair)| pair).collect();

    HASHING.iter().all(|&kind| {
        let original = group_by(kind, pairs.clone()).unwrap();
        let reordered = group_by(kind, shuffled.clone()).unwrap();
        original.len() == reordered.len()
            && original
                .iter()
                .all(|(key, grouped)| reordered.get(key) == Some(grouped))
    })
}

#[quickcheck]
fn typed_and_runtime_groupings_agree(pairs: Vec<(u8, u8)>) -> bool {
    let typed = group_into::<Vec<u8>, _, _, _>(pairs.clone()).unwrap();
    let runtime = group_by(CollectionKind::Sequence, pairs).unwrap();

    typed.len() == runtime.len()
        && typed
            .iter()
            .zip(&runtime)
            .all(|((tk, tv), (rk, rv))| tk == rk && rv == &Grouped::Sequence(tv.clone()))
}

#[quickcheck]
fn reverse_mapping_lists_keys_in_mapping_order(mapping: HashMap<u8, u8>) -> bool {
    let entries: Vec<(u8, u8)> = mapping.iter().map(|(&k, &v)| (k, v)).collect();
    let result = reverse_mapping(CollectionKind::Sequence, entries.clone()).unwrap();

    result.iter().all(|(&value, grouped)| {
        let keys: Vec<u8> = entries
            .iter()
            .filter(|(_, v)| *v == value)
            .map(|(k, _)| *k)
            .collect();
        grouped.as_slice() == Some(&keys[..])
    })
}

#[quickcheck]
fn counter_reversal_twice_restores_distribution(multimapping: HashMap<u8, Vec<u8>>) -> bool {
    let once = reverse_multimapping(CollectionKind::Counter, multimapping.clone()).unwrap();
    let twice = reverse_multimapping(CollectionKind::Counter, once).unwrap();

    let non_empty = multimapping.values().filter(|values| !values.is_empty()).count();
    twice.len() == non_empty
        && multimapping
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .all(|(key, values)| {
                let mut expected = Counter::new();
                for value in values {
                    expected.add(*value).unwrap();
                }
                twice[key] == Grouped::Counter(expected)
            })
}

#[quickcheck]
fn unsupported_kinds_never_consume_input(name: String) -> bool {
    if name.parse::<CollectionKind>().is_ok() {
        return true;
    }

    let pulled = Cell::new(0);
    let pairs = std::iter::from_fn(|| {
        pulled.set(pulled.get() + 1);
        Some((0u8, 0u8))
    });

    let rejected = matches!(
        group_by(name.as_str(), pairs),
        Err(Error::UnsupportedCollectionKind { .. })
    );
    rejected && pulled.get() == 0
}
