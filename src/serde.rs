use crate::{CollectionKind, Counter, Element, FrozenSet, Grouped, ValueSet};
use serde::de::{self, Error as _, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::BuildHasher;
use std::marker::PhantomData;

impl Serialize for CollectionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CollectionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KindVisitor;

        impl<'de> Visitor<'de> for KindVisitor {
            type Value = CollectionKind;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a collection kind name")
            }

            fn visit_str<E>(self, name: &str) -> Result<CollectionKind, E>
            where
                E: de::Error,
            {
                name.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(KindVisitor)
    }
}

impl<V, H> Serialize for ValueSet<V, H>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self)
    }
}

impl<'de, V, S> Deserialize<'de> for ValueSet<V, S>
where
    V: Deserialize<'de> + Element,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SeqVisitor<V, S> {
            marker: PhantomData<ValueSet<V, S>>,
        }

        impl<'de, V, S> Visitor<'de> for SeqVisitor<V, S>
        where
            V: Deserialize<'de> + Element,
            S: BuildHasher + Default,
        {
            type Value = ValueSet<V, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a sequence")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut values =
                    ValueSet::with_capacity_and_hasher(seq.size_hint().unwrap_or(0), S::default());

                while let Some(value) = seq.next_element()? {
                    values.insert(value).map_err(A::Error::custom)?;
                }

                Ok(values)
            }
        }

        let visitor = SeqVisitor {
            marker: PhantomData,
        };

        deserializer.deserialize_seq(visitor)
    }
}

impl<V, H> Serialize for FrozenSet<V, H>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_value_set().serialize(serializer)
    }
}

impl<'de, V, S> Deserialize<'de> for FrozenSet<V, S>
where
    V: Deserialize<'de> + Element,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ValueSet::<V, S>::deserialize(deserializer).map(FrozenSet::from)
    }
}

impl<V, H> Serialize for Counter<V, H>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self)
    }
}

impl<'de, V, S> Deserialize<'de> for Counter<V, S>
where
    V: Deserialize<'de> + Element,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapVisitor<V, S> {
            marker: PhantomData<Counter<V, S>>,
        }

        impl<'de, V, S> Visitor<'de> for MapVisitor<V, S>
        where
            V: Deserialize<'de> + Element,
            S: BuildHasher + Default,
        {
            type Value = Counter<V, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of values to positive counts")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut counter = Counter::with_hasher(S::default());

                while let Some((value, count)) = map.next_entry::<V, usize>()? {
                    if count == 0 {
                        return Err(A::Error::invalid_value(
                            de::Unexpected::Unsigned(0),
                            &"a positive count",
                        ));
                    }
                    counter.add_many(value, count).map_err(A::Error::custom)?;
                }

                Ok(counter)
            }
        }

        let visitor = MapVisitor {
            marker: PhantomData,
        };

        deserializer.deserialize_map(visitor)
    }
}

impl<V> Serialize for Grouped<V>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Grouped::Sequence(values) => values.serialize(serializer),
            Grouped::Set(values) => values.serialize(serializer),
            Grouped::FrozenSet(values) => values.serialize(serializer),
            Grouped::FixedTuple(values) => values.serialize(serializer),
            Grouped::Counter(counter) => counter.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group_by;
    use std::collections::BTreeMap;

    #[test]
    fn kind_serializes_as_its_name() {
        assert_eq!(
            serde_json::to_string(&CollectionKind::FixedTuple).unwrap(),
            "\"fixed-tuple\""
        );
        assert_eq!(
            serde_json::from_str::<CollectionKind>("\"list\"").unwrap(),
            CollectionKind::Sequence
        );
        assert!(serde_json::from_str::<CollectionKind>("\"deque\"").is_err());
    }

    #[test]
    fn set_deserialization_deduplicates() {
        let set: ValueSet<u32> = serde_json::from_str("[1, 2, 2, 3]").unwrap();

        assert_eq!(set, ValueSet::from([1, 2, 3]));
        let frozen: FrozenSet<u32> = serde_json::from_str("[4, 4]").unwrap();
        assert_eq!(frozen.len(), 1);
    }

    #[test]
    fn counter_round_trips_through_json() {
        let mut counter = Counter::new();
        for word in ["a", "b", "a"] {
            counter.add(word.to_owned()).unwrap();
        }

        let json = serde_json::to_string(&counter).unwrap();
        let parsed: BTreeMap<String, usize> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, BTreeMap::from([("a".to_owned(), 2), ("b".to_owned(), 1)]));

        let back: Counter<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counter);
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert!(serde_json::from_str::<Counter<String>>(r#"{"a": 0}"#).is_err());
    }

    #[test]
    fn grouped_serializes_like_its_container() {
        let groups = group_by(CollectionKind::Sequence, [("k", 2), ("k", 1)]).unwrap();
        assert_eq!(serde_json::to_string(&groups["k"]).unwrap(), "[2,1]");

        let groups = group_by(CollectionKind::Counter, [("k", "x"), ("k", "x")]).unwrap();
        assert_eq!(serde_json::to_string(&groups["k"]).unwrap(), r#"{"x":2}"#);
    }
}
