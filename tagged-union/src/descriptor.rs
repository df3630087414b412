//! Union descriptors: the discriminator -> variant table of a union type.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::error::ConfigurationError;
use crate::{TaggedUnion, Variant};

type DecodeFn<U> = Box<dyn Fn(Value) -> Result<U, serde_json::Error> + Send + Sync>;

/// One entry of a union: which variant a discriminator selects and how to build it.
pub struct VariantDescriptor<U> {
    discriminator: &'static str,
    name: &'static str,
    type_name: &'static str,
    decode: DecodeFn<U>,
}

impl<U> VariantDescriptor<U> {
    /// The discriminator string selecting this variant.
    pub fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    /// The enum variant name, e.g. `BankTransfer`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The Rust type carried by the variant.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn decode(&self, value: Value) -> Result<U, serde_json::Error> {
        (self.decode)(value)
    }
}

impl<U> fmt::Debug for VariantDescriptor<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantDescriptor")
            .field("discriminator", &self.discriminator)
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// The immutable discriminator table of one union type.
///
/// Built once per union (see [`TaggedUnion::descriptor`]) and never mutated
/// afterwards, so it can be read concurrently without locking.
pub struct UnionDescriptor<U> {
    union: &'static str,
    field: &'static str,
    variants: Vec<VariantDescriptor<U>>,
    by_discriminator: HashMap<&'static str, usize>,
}

impl<U: 'static> UnionDescriptor<U> {
    /// Starts registering a union named `union` whose discriminator lives in `field`.
    pub fn builder(union: &'static str, field: &'static str) -> UnionBuilder<U> {
        UnionBuilder {
            union,
            field,
            entries: Vec::new(),
        }
    }

    /// Name of the union type.
    pub fn union(&self) -> &'static str {
        self.union
    }

    /// Name of the JSON field holding the discriminator.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Registered variants in declaration order.
    pub fn variants(&self) -> &[VariantDescriptor<U>] {
        &self.variants
    }

    /// Finds the variant selected by a discriminator value.
    pub fn lookup(&self, discriminator: &str) -> Option<&VariantDescriptor<U>> {
        self.by_discriminator
            .get(discriminator)
            .map(|&i| &self.variants[i])
    }

    /// Finds a variant by its enum variant name.
    pub fn by_name(&self, name: &str) -> Option<&VariantDescriptor<U>> {
        self.variants.iter().find(|v| v.name == name)
    }
}

impl<U> fmt::Debug for UnionDescriptor<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionDescriptor")
            .field("union", &self.union)
            .field("field", &self.field)
            .field("variants", &self.variants)
            .finish()
    }
}

struct Entry<U> {
    discriminator: &'static str,
    name: &'static str,
    type_name: &'static str,
    decode: DecodeFn<U>,
}

/// Collects the variants of a union and validates them in [`UnionBuilder::build`].
pub struct UnionBuilder<U> {
    union: &'static str,
    field: &'static str,
    entries: Vec<Entry<U>>,
}

impl<U: 'static> UnionBuilder<U> {
    /// Registers variant type `V`, wrapped into the union by `ctor`.
    ///
    /// The discriminator is taken from [`Variant::DISCRIMINATOR`].
    pub fn variant<V: Variant + 'static>(self, name: &'static str, ctor: fn(V) -> U) -> Self {
        self.push(
            name,
            V::DISCRIMINATOR,
            std::any::type_name::<V>(),
            Box::new(move |value| serde_json::from_value::<V>(value).map(ctor)),
        )
    }

    /// Registers a variant with an explicit discriminator and decoder.
    pub fn entry<F>(self, name: &'static str, discriminator: &'static str, decode: F) -> Self
    where
        F: Fn(Value) -> Result<U, serde_json::Error> + Send + Sync + 'static,
    {
        self.push(name, discriminator, name, Box::new(decode))
    }

    fn push(
        mut self,
        name: &'static str,
        discriminator: &'static str,
        type_name: &'static str,
        decode: DecodeFn<U>,
    ) -> Self {
        self.entries.push(Entry {
            discriminator,
            name,
            type_name,
            decode,
        });
        self
    }

    /// Validates the registrations and freezes them into a descriptor.
    pub fn build(self) -> Result<UnionDescriptor<U>, ConfigurationError> {
        let union = self.union;

        if self.field.trim().is_empty() {
            return Err(ConfigurationError::EmptyField { union });
        }
        if self.entries.is_empty() {
            return Err(ConfigurationError::NoVariants { union });
        }

        let mut variants = Vec::with_capacity(self.entries.len());
        let mut by_discriminator = HashMap::with_capacity(self.entries.len());

        for entry in self.entries {
            if entry.discriminator.trim().is_empty() {
                return Err(ConfigurationError::MissingDiscriminator {
                    union,
                    variant: entry.name,
                });
            }
            if let Some(&existing) = by_discriminator.get(entry.discriminator) {
                let first: &VariantDescriptor<U> = &variants[existing];
                return Err(ConfigurationError::DuplicateDiscriminator {
                    union,
                    discriminator: entry.discriminator,
                    first: first.name,
                    second: entry.name,
                });
            }

            by_discriminator.insert(entry.discriminator, variants.len());
            variants.push(VariantDescriptor {
                discriminator: entry.discriminator,
                name: entry.name,
                type_name: entry.type_name,
                decode: entry.decode,
            });
        }

        Ok(UnionDescriptor {
            union,
            field: self.field,
            variants,
            by_discriminator,
        })
    }
}

/// Builds the descriptor for `U` through its [`TaggedUnion::descriptor`] cache.
///
/// Equivalent to calling `U::descriptor()`; provided as the free-function form
/// of union registration.
pub fn register_union<U: TaggedUnion>() -> Result<&'static UnionDescriptor<U>, ConfigurationError> {
    U::descriptor()
}
