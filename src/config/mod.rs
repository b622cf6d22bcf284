//! Analysis options
//!
//! One options bag travels through a whole analysis:
//! - `ecmaOptions` is forwarded to the tree builder
//! - `ignoreErrors` is read by the analyser
//! - every other key is kept in [`AnalysisOptions::extra`] for the scoring engine
//!
//! The types deserialize from the camelCase JSON shape hosts already use:
//!
//! ```json
//! {
//!   "ignoreErrors": true,
//!   "ecmaOptions": { "ecmaVersion": 2020, "sourceType": "module" },
//!   "logicalor": false
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Options for one call to the analyser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Grammar/dialect options for the tree builder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecma_options: Option<EcmaOptions>,

    /// Drop sources that fail to parse instead of aborting the batch
    #[serde(default)]
    pub ignore_errors: bool,

    /// Everything else, passed untouched to the scoring engine
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialect options.
    pub fn with_ecma_options(mut self, ecma_options: EcmaOptions) -> Self {
        self.ecma_options = Some(ecma_options);
        self
    }

    /// Suppress per-source parse failures in batch mode.
    pub fn ignoring_errors(mut self) -> Self {
        self.ignore_errors = true;
        self
    }

    /// Add an engine option.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Raw engine option.
    pub fn extra_value(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Engine option read as a boolean. `None` when absent or not a boolean.
    pub fn extra_bool(&self, key: &str) -> Option<bool> {
        self.extra.get(key).and_then(Value::as_bool)
    }

    /// Engine option read as a number. `None` when absent or not numeric.
    pub fn extra_f64(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(Value::as_f64)
    }

    /// Build options from a JSON value.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// Dialect options understood by the tree builder.
///
/// Every field is optional and none are checked here; the builder decides
/// what an absent or unsupported value means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcmaOptions {
    /// Language edition, either as an edition number (5, 6, 11) or a year (2020)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecma_version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,

    /// Record syntax errors on the tree instead of failing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerant: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecma_features: Option<EcmaFeatures>,
}

impl EcmaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: u32) -> Self {
        self.ecma_version = Some(version);
        self
    }

    pub fn source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    pub fn tolerant(mut self, tolerant: bool) -> Self {
        self.tolerant = Some(tolerant);
        self
    }

    pub fn feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.ecma_features
            .get_or_insert_with(EcmaFeatures::default)
            .set(name, enabled);
        self
    }
}

/// Whether code is parsed as a classic script or an ES module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Script,
    Module,
}

/// Named language feature flags (`jsx`, `typescript`, `globalReturn`, ...).
///
/// Kept as an open map so flags the builder does not know about still
/// round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EcmaFeatures(BTreeMap<String, bool>);

impl EcmaFeatures {
    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.0.insert(name.into(), enabled);
    }

    /// A flag is enabled only when explicitly set to `true`.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for EcmaFeatures {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
