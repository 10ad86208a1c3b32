//! Tagged unions whose alternatives are named by a separate fieldless enum.
//!
//! The data type is an ordinary Rust enum declared through [`enum_variant!`],
//! so dispatch is a native `match`: it is exhaustive, binds payloads by
//! reference or by value following the scrutinee, and `break`/`return` work
//! inside arms. On top of that, the tag can be queried as a value and a single
//! alternative can be selected generically through its marker type.
//!
//! ```
//! use treis_tools::{enum_variant, enum_variant::EnumVariant as _};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Kind {
//!     Empty,
//!     Number,
//!     Pair,
//! }
//!
//! enum_variant! {
//!     #[derive(Debug, PartialEq)]
//!     pub enum Value: Kind in value {
//!         Empty(()),
//!         Number(i32),
//!         Pair((i32, i32)),
//!     }
//! }
//!
//! fn main() {
//!     let mut v = Value::new::<value::Number>(5);
//!     assert_eq!(v.tag(), Kind::Number);
//!     if let Value::Number(n) = &mut v {
//!         *n += 1;
//!     }
//!     assert_eq!(v.get_if::<value::Number>(), Some(&6));
//!     v.emplace::<value::Pair>((1, 2));
//!     assert_eq!(v.get_assert::<value::Pair>(), &(1, 2));
//! }
//! ```

use core::fmt;

/// A data enum declared by [`enum_variant!`](crate::enum_variant!).
pub trait EnumVariant: Sized {
    /// The fieldless enum naming the alternatives, in declaration order.
    type Tag: Copy + Eq + fmt::Debug;

    /// Returns the tag of the active alternative.
    fn tag(&self) -> Self::Tag;

    /// Constructs the value with alternative `A` active.
    fn new<A>(payload: A::Payload) -> Self
    where
        A: Alternative<Self>,
    {
        A::wrap(payload)
    }

    /// Replaces the active alternative with `A`.
    fn emplace<A>(&mut self, payload: A::Payload)
    where
        A: Alternative<Self>,
    {
        *self = A::wrap(payload);
    }

    fn get_if<A>(&self) -> Option<&A::Payload>
    where
        A: Alternative<Self>,
    {
        A::get(self)
    }

    fn get_if_mut<A>(&mut self) -> Option<&mut A::Payload>
    where
        A: Alternative<Self>,
    {
        A::get_mut(self)
    }

    /// Returns the payload of `A`.
    ///
    /// # Panics
    ///
    /// Panics if `A` is not the active alternative.
    #[track_caller]
    fn get_assert<A>(&self) -> &A::Payload
    where
        A: Alternative<Self>,
    {
        let tag = self.tag();
        match A::get(self) {
            Some(payload) => payload,
            None => mismatch::<Self>(A::TAG, tag),
        }
    }

    /// Mutable version of [`EnumVariant::get_assert`].
    ///
    /// # Panics
    ///
    /// Panics if `A` is not the active alternative.
    #[track_caller]
    fn get_assert_mut<A>(&mut self) -> &mut A::Payload
    where
        A: Alternative<Self>,
    {
        let tag = self.tag();
        match A::get_mut(self) {
            Some(payload) => payload,
            None => mismatch::<Self>(A::TAG, tag),
        }
    }

    /// Returns the payload of `A` without checking the tag in release builds.
    ///
    /// # Safety
    ///
    /// `A` must be the active alternative.
    unsafe fn get_unchecked<A>(&self) -> &A::Payload
    where
        A: Alternative<Self>,
    {
        debug_assert!(self.tag() == A::TAG);
        match A::get(self) {
            Some(payload) => payload,
            None => unsafe { core::hint::unreachable_unchecked() },
        }
    }

    /// Mutable version of [`EnumVariant::get_unchecked`].
    ///
    /// # Safety
    ///
    /// `A` must be the active alternative.
    unsafe fn get_unchecked_mut<A>(&mut self) -> &mut A::Payload
    where
        A: Alternative<Self>,
    {
        debug_assert!(self.tag() == A::TAG);
        match A::get_mut(self) {
            Some(payload) => payload,
            None => unsafe { core::hint::unreachable_unchecked() },
        }
    }

    /// Moves the payload of `A` out, or gives the value back if another
    /// alternative is active.
    fn into_payload<A>(self) -> Result<A::Payload, Self>
    where
        A: Alternative<Self>,
    {
        A::unwrap(self)
    }
}

#[track_caller]
fn mismatch<V>(expected: V::Tag, found: V::Tag) -> !
where
    V: EnumVariant,
{
    panic!("expected alternative {expected:?}, found {found:?}")
}

/// The marker type of one alternative of `V`.
pub trait Alternative<V>
where
    V: EnumVariant,
{
    type Payload;
    const TAG: V::Tag;

    fn get(value: &V) -> Option<&Self::Payload>;
    fn get_mut(value: &mut V) -> Option<&mut Self::Payload>;
    fn wrap(payload: Self::Payload) -> V;
    fn unwrap(value: V) -> Result<Self::Payload, V>;
}

/// Declares a data enum bound to a fieldless tag enum.
///
/// Each variant carries exactly one payload (use `()` for none) and is named
/// after the tag variant it belongs to. The tag enum must list the same
/// variants in the same order; both are checked at compile time. A module
/// with one marker type per alternative is generated for use with the
/// generic accessors of [`EnumVariant`].
#[macro_export]
macro_rules! enum_variant {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $tag:ident in $module:ident {
            $($variant:ident($payload:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($variant($payload)),+
        }

        impl $crate::enum_variant::EnumVariant for $name {
            type Tag = $tag;

            fn tag(&self) -> $tag {
                match self {
                    $(Self::$variant(_) => $tag::$variant),+
                }
            }
        }

        const _: () = {
            let mut index = 0_usize;
            $(
                assert!(
                    $tag::$variant as usize == index,
                    concat!("tag ", stringify!($variant), " is out of order"),
                );
                index += 1;
            )+
            let _ = index;

            #[allow(dead_code)]
            fn every_tag_has_an_alternative(tag: $tag) {
                match tag {
                    $($tag::$variant => {}),+
                }
            }
        };

        $vis mod $module {
            #[allow(unused_imports)]
            use super::*;

            $(
                #[derive(Debug, Clone, Copy, PartialEq, Eq)]
                pub struct $variant;

                impl $crate::enum_variant::Alternative<$name> for $variant {
                    type Payload = $payload;
                    const TAG: $tag = $tag::$variant;

                    fn get(value: &$name) -> Option<&$payload> {
                        match value {
                            $name::$variant(payload) => Some(payload),
                            #[allow(unreachable_patterns)]
                            _ => None,
                        }
                    }

                    fn get_mut(value: &mut $name) -> Option<&mut $payload> {
                        match value {
                            $name::$variant(payload) => Some(payload),
                            #[allow(unreachable_patterns)]
                            _ => None,
                        }
                    }

                    fn wrap(payload: $payload) -> $name {
                        $name::$variant(payload)
                    }

                    fn unwrap(value: $name) -> Result<$payload, $name> {
                        match value {
                            $name::$variant(payload) => Ok(payload),
                            #[allow(unreachable_patterns)]
                            other => Err(other),
                        }
                    }
                }
            )+
        }
    };
}
