//! [`Reflect`] implementations for standard scalar, container, and pointer
//! types, so user code only has to describe its own records.

use crate::value::{Checkable, Reflect, Scalar, Shape};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

impl Reflect for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Bool(*self))
    }
}

impl Reflect for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Char(*self))
    }
}

macro_rules! reflect_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(Scalar::Int(i64::from(*self)))
                }
            }
        )*
    };
}

macro_rules! reflect_uint {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(Scalar::Uint(u64::from(*self)))
                }
            }
        )*
    };
}

reflect_int!(i8, i16, i32, i64);
reflect_uint!(u8, u16, u32, u64);

impl Reflect for isize {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Int(*self as i64))
    }
}

impl Reflect for usize {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Uint(*self as u64))
    }
}

impl Reflect for f32 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Float(f64::from(*self)))
    }
}

impl Reflect for f64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Float(*self))
    }
}

impl Reflect for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self.clone()))
    }
}

impl Reflect for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self.to_owned()))
    }
}

// Plain references delegate transparently: a `&T` field behaves as the `T`
// it points at, self-check capability included.
impl<T: Reflect + ?Sized> Reflect for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn as_checkable(&self) -> Option<&dyn Checkable> {
        (**self).as_checkable()
    }
}

// Owning and shared pointers are indirections: the walker unwraps them and
// marks the node as found behind one.
impl<T: Reflect> Reflect for Box<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Optional(Some(&**self))
    }
}

// Boxed trait objects make heterogeneous sequences and maps possible. The
// walker resolves the indirection, so the inner value's own capabilities
// apply.
impl Reflect for Box<dyn Reflect> {
    fn shape(&self) -> Shape<'_> {
        Shape::Optional(Some(&**self))
    }
}

impl<T: Reflect> Reflect for Arc<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Optional(Some(&**self))
    }
}

impl<T: Reflect> Reflect for Rc<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Optional(Some(&**self))
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Optional(self.as_ref().map(|v| v as &dyn Reflect))
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Reflect).collect())
    }
}

impl<T: Reflect> Reflect for [T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Reflect).collect())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Reflect).collect())
    }
}

impl<K: fmt::Display, V: Reflect> Reflect for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| (k.to_string(), v as &dyn Reflect))
                .collect(),
        )
    }
}

// HashMap iteration order varies between runs; entries are sorted by rendered
// key so one traversal's order is fixed.
impl<K: fmt::Display, V: Reflect, S: BuildHasher> Reflect for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        let mut entries: Vec<(String, &dyn Reflect)> = self
            .iter()
            .map(|(k, v)| (k.to_string(), v as &dyn Reflect))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Shape::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn option_none_is_absent_indirection() {
        let none: Option<String> = None;
        match none.shape() {
            Shape::Optional(inner) => assert!(inner.is_none()),
            _ => panic!("expected optional shape"),
        }
    }

    #[test]
    fn boxed_value_wraps_inner() {
        let boxed = Box::new(7_i32);
        match boxed.shape() {
            Shape::Optional(Some(inner)) => assert_eq!(Value::present(inner).render(), "7"),
            _ => panic!("expected present optional shape"),
        }
    }

    #[test]
    fn hashmap_entries_sorted_by_key() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), 2_i32);
        map.insert("a".to_string(), 1_i32);
        map.insert("c".to_string(), 3_i32);

        match map.shape() {
            Shape::Map(entries) => {
                let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, ["a", "b", "c"]);
            }
            _ => panic!("expected map shape"),
        }
    }

    #[test]
    fn reference_delegates() {
        let s = "hello".to_string();
        let r = &s;
        match r.shape() {
            Shape::Scalar(Scalar::Str(v)) => assert_eq!(v, "hello"),
            _ => panic!("expected scalar shape"),
        }
    }
}
