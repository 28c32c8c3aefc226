//! Newtype IDs for type-safe references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing a product id with a page id or a category slug. All
//! ids in the storefront are opaque strings read from markup data attributes.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>`, `AsRef<str>` and `Display`
///
/// # Example
///
/// ```rust
/// # use farmaweb_core::define_id;
/// define_id!(SkuId);
/// define_id!(BannerId);
///
/// let sku = SkuId::new("ibuprofeno-400");
/// let banner = BannerId::new("ibuprofeno-400");
///
/// assert_eq!(sku.as_str(), banner.as_str());
/// // These are different types, so this won't compile:
/// // let _: SkuId = banner;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(PageId);
define_id!(CategoryId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_value() {
        let id = ProductId::new("paracetamol-500");
        assert_eq!(id.to_string(), "paracetamol-500");
    }

    #[test]
    fn test_serde_is_transparent() {
        let page = PageId::new("catalogo");
        let json = serde_json::to_string(&page).unwrap();
        assert_eq!(json, "\"catalogo\"");

        let parsed: PageId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, page);
    }

    #[test]
    fn test_conversions() {
        let from_str: CategoryId = "vitaminas".into();
        let from_string: CategoryId = String::from("vitaminas").into();
        assert_eq!(from_str, from_string);
        assert_eq!(String::from(from_str), "vitaminas");
    }
}
