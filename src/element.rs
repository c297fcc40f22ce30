use crate::Unhashable;
use std::hash::{BuildHasher, Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

/// Values that can be stored in the hashing kinds (set, frozen set, counter).
///
/// The standard scalar types, strings, floats, and references, boxes,
/// options, vectors and tuples of elements are `Element`s. Floats reject NaN
/// and treat `-0.0` and `0.0` as the same element.
///
/// Other types opt in with an impl. The default methods reject every value,
/// so an empty impl lets a type be grouped into sequences while grouping it
/// into a hashing kind fails with [`Error::ValueConstraintViolation`].
///
/// # Examples
///
/// A type with a stable identity forwards to its `Hash` and `Eq` impls:
///
/// ```
/// use collection_dict::{Element, Unhashable, ValueSet};
/// use std::hash::{Hash, Hasher};
///
/// #[derive(Debug, Hash, PartialEq, Eq)]
/// struct Sku(u32);
///
/// impl Element for Sku {
///     fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
///         self.hash(state);
///         Ok(())
///     }
///
///     fn equivalent(&self, other: &Self) -> bool {
///         self == other
///     }
/// }
///
/// let mut skus = ValueSet::new();
/// assert_eq!(skus.insert(Sku(7)), Ok(true));
/// assert_eq!(skus.insert(Sku(7)), Ok(false));
/// ```
///
/// [`Error::ValueConstraintViolation`]: crate::Error::ValueConstraintViolation
pub trait Element {
    /// Feeds the identity of the value into `state`, or reports that the
    /// value has none.
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        let _ = state;
        Err(Unhashable::of::<Self>())
    }

    /// Returns `true` if both values are the same element.
    ///
    /// Only consulted for values whose [`try_hash`](Element::try_hash) succeeded.
    fn equivalent(&self, other: &Self) -> bool {
        let _ = other;
        false
    }
}

macro_rules! hashable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
                    self.hash(state);
                    Ok(())
                }

                fn equivalent(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

hashable! {
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    bool, char, str, String, (),
}

macro_rules! float {
    ($($ty:ty),*) => {
        $(
            impl Element for $ty {
                fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
                    if self.is_nan() {
                        return Err(Unhashable::of::<Self>());
                    }
                    // -0.0 + 0.0 is 0.0
                    (*self + 0.0).to_bits().hash(state);
                    Ok(())
                }

                fn equivalent(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

float!(f32, f64);

macro_rules! pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T> Element for $ptr<T>
            where
                T: ?Sized + Element,
            {
                fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
                    (**self).try_hash(state)
                }

                fn equivalent(&self, other: &Self) -> bool {
                    (**self).equivalent(&**other)
                }
            }
        )*
    };
}

pointer!(Box, Rc, Arc);

impl<T> Element for &T
where
    T: ?Sized + Element,
{
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        (**self).try_hash(state)
    }

    fn equivalent(&self, other: &Self) -> bool {
        (**self).equivalent(*other)
    }
}

impl<T> Element for Option<T>
where
    T: Element,
{
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        match self {
            Some(value) => {
                state.write_u8(1);
                value.try_hash(state)
            }
            None => {
                state.write_u8(0);
                Ok(())
            }
        }
    }

    fn equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.equivalent(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> Element for [T]
where
    T: Element,
{
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        state.write_usize(self.len());
        self.iter().try_for_each(|value| value.try_hash(state))
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.equivalent(b))
    }
}

impl<T> Element for Vec<T>
where
    T: Element,
{
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        self.as_slice().try_hash(state)
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.as_slice().equivalent(other.as_slice())
    }
}

macro_rules! tuple {
    ($($idx:tt $name:ident),+) => {
        impl<$($name),+> Element for ($($name,)+)
        where
            $($name: Element,)+
        {
            fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
                $(self.$idx.try_hash(state)?;)+
                Ok(())
            }

            fn equivalent(&self, other: &Self) -> bool {
                true $(&& self.$idx.equivalent(&other.$idx))+
            }
        }
    };
}

tuple!(0 A);
tuple!(0 A, 1 B);
tuple!(0 A, 1 B, 2 C);
tuple!(0 A, 1 B, 2 C, 3 D);
tuple!(0 A, 1 B, 2 C, 3 D, 4 E);
tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);

pub(crate) fn make_hash<T, S>(hash_builder: &S, value: &T) -> Result<u64, Unhashable>
where
    T: ?Sized + Element,
    S: BuildHasher,
{
    let mut state = hash_builder.build_hasher();
    value.try_hash(&mut state)?;
    Ok(state.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::RandomState;

    struct Opaque;

    impl Element for Opaque {}

    #[test]
    fn hashable_types_hash_like_std() {
        let s = RandomState::new();
        let mut state = s.build_hasher();
        "abc".hash(&mut state);

        assert_eq!(make_hash(&s, "abc"), Ok(state.finish()));
        assert!(1_i32.equivalent(&1));
        assert!(!1_i32.equivalent(&2));
    }

    #[test]
    fn empty_impl_rejects_every_value() {
        let err = make_hash(&RandomState::new(), &Opaque).unwrap_err();

        assert!(err.type_name().ends_with("Opaque"));
        assert!(!Opaque.equivalent(&Opaque));
    }

    #[test]
    fn floats_reject_nan_and_merge_signed_zero() {
        let s = RandomState::new();

        assert_eq!(make_hash(&s, &f64::NAN), Err(Unhashable::of::<f64>()));
        assert_eq!(make_hash(&s, &f32::NAN), Err(Unhashable::of::<f32>()));
        assert_eq!(make_hash(&s, &-0.0_f64), make_hash(&s, &0.0_f64));
        assert!((-0.0_f64).equivalent(&0.0));
        assert!(make_hash(&s, &1.5_f64).is_ok());
    }

    #[test]
    fn compound_values_hash_through_their_parts() {
        let s = RandomState::new();

        assert!(make_hash(&s, &vec![1.0_f64, 2.0]).is_ok());
        assert_eq!(make_hash(&s, &vec![1.0, f64::NAN]), Err(Unhashable::of::<f64>()));
        assert!(make_hash(&s, &Some(Opaque)).is_err());
        assert!(make_hash(&s, &None::<Opaque>).is_ok());
        assert!(make_hash(&s, &("id", 0.5_f32)).is_ok());
        assert!(make_hash(&s, &(1_u8, Opaque)).is_err());

        assert!(vec![Some(1_u8)].equivalent(&vec![Some(1)]));
        assert!(!vec![1_u8].equivalent(&vec![1, 1]));
        assert!(("a", -0.0_f64).equivalent(&("a", 0.0)));
        assert!(Box::new("x").equivalent(&Box::new("x")));
        assert!(Arc::<str>::from("x").equivalent(&Arc::from("x")));
    }
}
