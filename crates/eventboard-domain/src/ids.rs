//! Identifier newtypes for the entity collections
//!
//! The remote store hands out numeric identifiers. Wrapping them keeps an
//! `EventId` from ever being passed where a `SupplierId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw identifier
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Get the raw identifier
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of an [`Event`](crate::Event)
    EventId
);

entity_id!(
    /// Identifier of a [`Supplier`](crate::Supplier)
    SupplierId
);

entity_id!(
    /// Identifier of a [`SupplierItem`](crate::SupplierItem)
    ItemId
);

entity_id!(
    /// Identifier of a [`SupplierRating`](crate::SupplierRating)
    RatingId
);
