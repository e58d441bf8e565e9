//! Typed ID wrappers for type-safe entity references
//!
//! The original Python model stores agents, items, store points and racks in
//! parallel-array containers and looks them up by name, index or position
//! interchangeably. Here every entity kind gets its own arena index type, and
//! a world builds three explicit lookup tables instead of one polymorphic one.

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};
use std::fmt;
use std::hash::Hash;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Archive, Deserialize, Serialize,
            SerdeDeserialize, SerdeSerialize,
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default
        )]
        #[rkyv(compare(PartialEq))]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn as_u32(&self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn as_usize(&self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<usize> for $name {
            fn from(id: usize) -> Self {
                Self(id as u32)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(AgentId, "Arena index of an agent (robot)");
define_id!(ItemId, "Arena index of an item");
define_id!(RackId, "Arena index of a rack");
define_id!(StorePointId, "Arena index of a store point");
define_id!(EndPointId, "Arena index of an end point");
define_id!(TaskId, "Arena index of a pick/deliver task");

/// Sequential id generator, one per entity arena.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator<T> {
    next: u32,
    _marker: std::marker::PhantomData<T>,
}

impl<T> IdGenerator<T> {
    pub fn new() -> Self {
        Self { next: 0, _marker: std::marker::PhantomData }
    }

    pub fn starting_from(start: u32) -> Self {
        Self { next: start, _marker: std::marker::PhantomData }
    }

    pub fn peek(&self) -> u32 {
        self.next
    }
}

macro_rules! impl_id_generator {
    ($id_type:ident) => {
        impl IdGenerator<$id_type> {
            pub fn next(&mut self) -> $id_type {
                let id = $id_type(self.next);
                self.next += 1;
                id
            }
        }
    };
}

impl_id_generator!(AgentId);
impl_id_generator!(ItemId);
impl_id_generator!(RackId);
impl_id_generator!(StorePointId);
impl_id_generator!(EndPointId);
impl_id_generator!(TaskId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_generation() {
        let mut gen = IdGenerator::<AgentId>::new();
        assert_eq!(gen.next(), AgentId(0));
        assert_eq!(gen.next(), AgentId(1));
        assert_eq!(gen.next(), AgentId(2));
    }

    #[test]
    fn equality_and_ordering() {
        let a = AgentId(3);
        let b = AgentId(3);
        let c = AgentId(4);
        assert_eq!(a, b);
        assert!(a < c);
    }
}
