//! Codec derivation.
//!
//! A [`CodecVisitor`] maps codec identities to rules that rebuild a codec into
//! something else, usually another codec with a different wire format but the
//! same decoded shape.  Rules for composites call back into the visitor for
//! their members, so registering a rule changes the result everywhere it's
//! reachable.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use tracing::{debug, trace};

use crate::compact::compact_of;
use crate::errors::ConfigError;
use crate::object::{field, object};
use crate::tuple::tuple;
use crate::types::{AnyCodec, CodecId, Kind};

/// A derivation rule.  Gets the visitor so it can recurse into members.
pub type Rule<R> = Arc<dyn Fn(&CodecVisitor<R>, &AnyCodec) -> Result<R, ConfigError> + Send + Sync>;

/// Registry of derivation rules keyed by codec identity.
pub struct CodecVisitor<R> {
    rules: HashMap<CodecId, Rule<R>>,
    fallback: Option<Rule<R>>,
}

impl<R> CodecVisitor<R> {
    /// Constructs an empty visitor, which rejects every codec.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            fallback: None,
        }
    }

    /// Registers a rule, replacing any earlier rule for the same identity.
    pub fn add_rule<F>(&mut self, id: CodecId, rule: F)
    where
        F: Fn(&CodecVisitor<R>, &AnyCodec) -> Result<R, ConfigError> + Send + Sync + 'static,
    {
        self.rules.insert(id, Arc::new(rule));
    }

    /// Builder-style [`Self::add_rule`].
    pub fn with_rule<F>(mut self, id: CodecId, rule: F) -> Self
    where
        F: Fn(&CodecVisitor<R>, &AnyCodec) -> Result<R, ConfigError> + Send + Sync + 'static,
    {
        self.add_rule(id, rule);
        self
    }

    /// Sets the rule used for codecs with no registered rule.
    pub fn with_fallback<F>(mut self, rule: F) -> Self
    where
        F: Fn(&CodecVisitor<R>, &AnyCodec) -> Result<R, ConfigError> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(rule));
        self
    }

    /// Returns if there's a rule registered for the identity.
    pub fn has_rule(&self, id: CodecId) -> bool {
        self.rules.contains_key(&id)
    }

    /// Applies the rule for the codec's identity, or the fallback.
    pub fn visit(&self, codec: &AnyCodec) -> Result<R, ConfigError> {
        if let Some(rule) = self.rules.get(&codec.id()) {
            trace!(%codec, "applying registered derivation rule");
            return rule(self, codec);
        }

        if let Some(fallback) = &self.fallback {
            trace!(%codec, "applying fallback derivation rule");
            return fallback(self, codec);
        }

        Err(ConfigError::NoRule {
            codec: codec.clone(),
        })
    }
}

impl<R> Default for CodecVisitor<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for CodecVisitor<R> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl<R> fmt::Debug for CodecVisitor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecVisitor")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl CodecVisitor<AnyCodec> {
    /// Constructs the stock compact deriver.
    ///
    /// Integer primitives become their compact form and single-member
    /// objects and tuples are rebuilt around their member's compact form.
    /// Objects and tuples with several members are rejected, since there's
    /// no unambiguous compact encoding for them.  Everything else is left
    /// as-is.  Rules added on top take precedence, including for members
    /// reached while recursing.
    pub fn compact() -> Self {
        Self::new().with_fallback(derive_compact)
    }
}

fn derive_compact(v: &CodecVisitor<AnyCodec>, codec: &AnyCodec) -> Result<AnyCodec, ConfigError> {
    match codec.kind() {
        Kind::Primitive(p) if p.is_int() => Ok(compact_of(*p)),

        Kind::Object(fields) => match fields.as_slice() {
            [] => Ok(codec.clone()),
            [f] => object([field(f.name(), v.visit(f.codec())?)]),
            _ => Err(reject_multi_field(codec, fields.len())),
        },

        Kind::Tuple(items) => match items.as_slice() {
            [] => Ok(codec.clone()),
            [item] => Ok(tuple([v.visit(item)?])),
            _ => Err(reject_multi_field(codec, items.len())),
        },

        Kind::Primitive(_)
        | Kind::Compact(_)
        | Kind::Str
        | Kind::Never
        | Kind::Constant(_)
        | Kind::Union(_)
        | Kind::TaggedUnion(_)
        | Kind::StringUnion(_)
        | Kind::Array(_)
        | Kind::LenPrefixed(_)
        | Kind::Custom(_) => {
            debug!(%codec, "codec unchanged by compact derivation");
            Ok(codec.clone())
        }
    }
}

fn reject_multi_field(codec: &AnyCodec, fields: usize) -> ConfigError {
    debug!(%codec, %fields, "rejecting multi-field compact derivation");
    ConfigError::MultiFieldCompact {
        codec: codec.clone(),
        fields,
    }
}

static COMPACT: LazyLock<CodecVisitor<AnyCodec>> = LazyLock::new(CodecVisitor::compact);

/// Derives the compact counterpart of a codec with the stock rules.  See
/// [`CodecVisitor::compact`].
pub fn compact(codec: &AnyCodec) -> Result<AnyCodec, ConfigError> {
    COMPACT.visit(codec)
}
