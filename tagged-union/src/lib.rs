//! Discriminator-keyed JSON codec for closed unions.
//!
//! A tagged union is a Rust enum whose every variant wraps one struct. On the
//! wire the union is a single JSON object: the struct's fields plus a
//! discriminator field (usually `"type"`) naming which variant it is.
//!
//! Unions are declared with [`tagged_union!`]. Each variant struct names its
//! discriminator through [`Variant::DISCRIMINATOR`]; the macro registers every
//! variant into a [`UnionDescriptor`] that is built on first use and cached for
//! the rest of the process.
//!
//! # Example
//! ```
//! use serde::{Deserialize, Serialize};
//! use tagged_union::{Variant, tagged_union};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! pub struct Iban {
//!     pub iban: String,
//! }
//!
//! impl Variant for Iban {
//!     const DISCRIMINATOR: &'static str = "iban";
//! }
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! pub struct SortCodeAccountNumber {
//!     pub sort_code: String,
//!     pub account_number: String,
//! }
//!
//! impl Variant for SortCodeAccountNumber {
//!     const DISCRIMINATOR: &'static str = "sort_code_account_number";
//! }
//!
//! tagged_union! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub enum AccountIdentifier(tag = "type") {
//!         Iban(Iban),
//!         SortCodeAccountNumber(SortCodeAccountNumber),
//!     }
//! }
//!
//! let id = AccountIdentifier::Iban(Iban { iban: "GB33BUKB20201555555555".into() });
//! let json = tagged_union::encode(&id).unwrap();
//! assert_eq!(json, r#"{"type":"iban","iban":"GB33BUKB20201555555555"}"#);
//!
//! let back: AccountIdentifier = tagged_union::decode(&json).unwrap();
//! assert_eq!(back, id);
//! ```
//!
//! # Decoding
//!
//! Payloads are parsed once into a [`serde_json::Value`] tree, the
//! discriminator is read from it, and the tree is handed to exactly one
//! variant decoder. A streaming peek is not possible through serde's
//! `Deserializer` interface without buffering, so the tree is the buffer.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod codec;
pub mod descriptor;
pub mod error;
pub mod naming;

pub use codec::{
    decode, decode_array, decode_slice, decode_value, encode, encode_to_vec, encode_value,
    from_slice, from_str, to_vec,
};
pub use descriptor::{UnionBuilder, UnionDescriptor, VariantDescriptor, register_union};
pub use error::{
    CodecError, ConfigurationError, Discriminator, MalformedVariantError, UnknownVariantError,
};
pub use naming::{to_snake_case, to_snake_case_opt};

/// Default name of the discriminator field.
pub const DEFAULT_TAG: &str = "type";

/// A struct that can appear as one variant of a tagged union.
pub trait Variant: Serialize + DeserializeOwned {
    /// The discriminator value identifying this variant on the wire.
    ///
    /// Must be non-empty and unique within every union the type belongs to.
    const DISCRIMINATOR: &'static str;
}

/// A closed enum-of-structs encoded with a discriminator field.
///
/// Implemented by [`tagged_union!`]; implementing it by hand is possible but
/// the macro keeps the variant table and the enum in sync.
pub trait TaggedUnion: Sized + 'static {
    /// Name of the union type, used in diagnostics.
    const NAME: &'static str;

    /// Name of the JSON field carrying the discriminator.
    const FIELD: &'static str;

    /// Returns the process-wide descriptor, building it on first use.
    fn descriptor() -> Result<&'static UnionDescriptor<Self>, ConfigurationError>;

    /// Discriminator of the active variant.
    fn discriminator(&self) -> &'static str;

    /// Enum variant name of the active variant.
    fn variant_name(&self) -> &'static str;

    /// Serializes the active variant's struct, without the discriminator.
    fn encode_fields(&self) -> Result<Value, serde_json::Error>;
}

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}

/// Declares a tagged union and wires it into the codec.
///
/// ```ignore
/// tagged_union! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum PaymentStatus(tag = "status") {
///         Authorized(Authorized),
///         Failed(Failed),
///     }
/// }
/// ```
///
/// `(tag = "...")` is optional and defaults to `"type"`. The macro generates
/// the enum, its [`TaggedUnion`] impl with a lazily built descriptor, and
/// `Serialize`/`Deserialize` impls that go through the codec.
#[macro_export]
macro_rules! tagged_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($body:tt)*
        }
    ) => {
        $crate::tagged_union! {
            $(#[$meta])*
            $vis enum $name(tag = "type") {
                $($body)*
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident(tag = $field:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($ty:ty)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant($ty),
            )+
        }

        impl $crate::TaggedUnion for $name {
            const NAME: &'static str = stringify!($name);
            const FIELD: &'static str = $field;

            fn descriptor() -> ::std::result::Result<
                &'static $crate::UnionDescriptor<Self>,
                $crate::ConfigurationError,
            > {
                static DESCRIPTOR: ::std::sync::OnceLock<
                    ::std::result::Result<$crate::UnionDescriptor<$name>, $crate::ConfigurationError>,
                > = ::std::sync::OnceLock::new();

                DESCRIPTOR
                    .get_or_init(|| {
                        $crate::UnionDescriptor::<$name>::builder(stringify!($name), $field)
                            $(.variant::<$ty>(stringify!($variant), $name::$variant))+
                            .build()
                    })
                    .as_ref()
                    .map_err(::std::clone::Clone::clone)
            }

            fn discriminator(&self) -> &'static str {
                match self {
                    $($name::$variant(_) => <$ty as $crate::Variant>::DISCRIMINATOR,)+
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $($name::$variant(_) => stringify!($variant),)+
                }
            }

            fn encode_fields(
                &self,
            ) -> ::std::result::Result<$crate::__private::serde_json::Value, $crate::__private::serde_json::Error> {
                match self {
                    $($name::$variant(inner) => $crate::__private::serde_json::to_value(inner),)+
                }
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::codec::serialize_union(self, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::codec::deserialize_union(deserializer)
            }
        }
    };
}
