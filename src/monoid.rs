//! Accumulation for [`Writer`](crate::effects::writer::Writer) output.
//!
//! A `Semigroup` has an associative `combine`; a `Monoid` adds an identity
//! element. The writer handler starts every accumulator at
//! [`Monoid::empty`] and folds each `tell` in with [`Semigroup::combine`].
//!
//! # Laws
//!
//! ```text
//! a.combine(b).combine(c) == a.combine(b.combine(c))   (associativity)
//! a.combine(M::empty()) == a                           (right identity)
//! M::empty().combine(a) == a                           (left identity)
//! ```
//!
//! # Examples
//!
//! ```
//! use undertow::monoid::{Monoid, Semigroup, Sum};
//!
//! let v1 = vec![1, 2, 3];
//! let empty: Vec<i32> = Monoid::empty();
//! assert_eq!(v1.clone().combine(empty), v1);
//!
//! assert_eq!(Sum(2).combine(Sum(3)), Sum(5));
//! ```

use std::ops::Add;

/// A type with an associative binary operation.
///
/// `combine` takes both sides by value; clone first to keep an original.
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively.
    fn combine(self, other: Self) -> Self;
}

/// A [`Semigroup`] with an identity element.
pub trait Monoid: Semigroup {
    /// The identity element.
    fn empty() -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

impl<T> Monoid for Vec<T> {
    fn empty() -> Self {
        Vec::new()
    }
}

impl Semigroup for String {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

impl Monoid for String {
    fn empty() -> Self {
        String::new()
    }
}

impl Semigroup for () {
    fn combine(self, _: Self) -> Self {}
}

impl Monoid for () {
    fn empty() -> Self {}
}

// Lifts the inner semigroup; None is the identity.
impl<T: Semigroup> Semigroup for Option<T> {
    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Some(a), Some(b)) => Some(a.combine(b)),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

impl<T: Semigroup> Monoid for Option<T> {
    fn empty() -> Self {
        None
    }
}

macro_rules! impl_monoid_tuple {
    ($($idx:tt $T:ident),+) => {
        impl<$($T: Semigroup),+> Semigroup for ($($T,)+) {
            #[inline]
            fn combine(self, other: Self) -> Self {
                ($(self.$idx.combine(other.$idx),)+)
            }
        }

        impl<$($T: Monoid),+> Monoid for ($($T,)+) {
            fn empty() -> Self {
                ($($T::empty(),)+)
            }
        }
    };
}

impl_monoid_tuple!(0 T1, 1 T2);
impl_monoid_tuple!(0 T1, 1 T2, 2 T3);
impl_monoid_tuple!(0 T1, 1 T2, 2 T3, 3 T4);

/// Numbers under addition.
///
/// ```
/// use undertow::monoid::{Monoid, Semigroup, Sum};
///
/// let total = [Sum(1), Sum(2), Sum(3)]
///     .into_iter()
///     .fold(Sum::empty(), Semigroup::combine);
/// assert_eq!(total, Sum(6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Sum<T>(pub T);

impl<T: Add<Output = T>> Semigroup for Sum<T> {
    fn combine(self, other: Self) -> Self {
        Sum(self.0 + other.0)
    }
}

impl<T: Add<Output = T> + Default> Monoid for Sum<T> {
    fn empty() -> Self {
        Sum(T::default())
    }
}
