//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_str_id!` macro to create type-safe wrappers around the
//! string identifiers the vendor APIs hand back, preventing a SKU from
//! being passed where a Zoho item ID is expected (and vice versa).

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use stocklink_core::define_str_id;
/// define_str_id!(WarehouseId);
/// define_str_id!(BinId);
///
/// let warehouse = WarehouseId::new("wh-1");
/// let bin = BinId::new("wh-1");
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = bin;
/// ```
#[macro_export]
macro_rules! define_str_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

define_str_id!(Sku);
define_str_id!(ItemId);
define_str_id!(AccountId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku_display_and_access() {
        let sku = Sku::new("ABC-123");
        assert_eq!(sku.as_str(), "ABC-123");
        assert_eq!(sku.to_string(), "ABC-123");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let item_id = ItemId::new("2866866000000123456");
        let json = serde_json::to_string(&item_id).expect("serialize");
        assert_eq!(json, "\"2866866000000123456\"");

        let back: ItemId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, item_id);
    }

    #[test]
    fn test_sku_equality_is_exact() {
        // SKU joins are exact-string; casing differences are distinct SKUs.
        assert_ne!(Sku::new("abc"), Sku::new("ABC"));
    }
}
