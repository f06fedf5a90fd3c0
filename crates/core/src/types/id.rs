//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create ID wrappers that cannot be mixed up
//! with plain integers or with IDs of other entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`, and a checked `next()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// # Example
///
/// ```rust
/// # use zhunan_crm_core::define_id;
/// define_id!(VisitId);
///
/// let id = VisitId::new(1);
/// assert_eq!(id.next(), Some(VisitId::new(2)));
/// assert_eq!(VisitId::new(i32::MAX).next(), None);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// The first ID handed out in an empty collection.
            pub const FIRST: Self = Self(1);

            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }

            /// The ID directly following this one, or `None` at `i32::MAX`.
            #[must_use]
            pub const fn next(&self) -> Option<Self> {
                match self.0.checked_add(1) {
                    Some(id) => Some(Self(id)),
                    None => None,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(CustomerId);
define_id!(InventoryItemId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_id_ordering() {
        assert!(CustomerId::new(2) > CustomerId::new(1));
        assert_eq!(CustomerId::FIRST.next(), Some(CustomerId::new(2)));
    }

    #[test]
    fn test_customer_id_serde_transparent() {
        let json = serde_json::to_string(&CustomerId::new(42)).unwrap();
        assert_eq!(json, "42");

        let id: CustomerId = serde_json::from_str("7").unwrap();
        assert_eq!(i32::from(id), 7);
    }

    #[test]
    fn test_next_stops_at_max() {
        assert_eq!(CustomerId::new(i32::MAX - 1).next(), Some(CustomerId::new(i32::MAX)));
        assert_eq!(CustomerId::new(i32::MAX).next(), None);
    }
}
