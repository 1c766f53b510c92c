//! The declarative configuration model.
//!
//! A [`StackConfig`] is a string-keyed mapping of typed [`ConfigValue`]s.
//! Field values form a closed union resolved by variant match: reading a
//! field through a typed accessor either yields the expected variant or
//! fails with [`ConfigError::FieldType`]. There is no runtime type
//! sniffing beyond the enum.
//!
//! Field *names* are data too: every read goes through a [`FieldNames`]
//! table, so host applications that spell `MIDDLEWARES` differently remap
//! the names per call instead of renaming their settings.

use crate::selection::SelectionSet;
use indexmap::IndexMap;
use std::sync::Arc;
use strata_core::Middleware;
use thiserror::Error;

/// An ordered middleware list, as configured.
pub type MiddlewareList = Vec<Arc<dyn Middleware>>;

/// Errors raised during configuration resolution.
///
/// All variants are fatal to the registration step; none are retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A named environment is missing from the environments mapping.
    #[error("environment \"{name}\" is not defined in the configuration")]
    UnknownEnvironment {
        /// The environment that was requested.
        name: String,
    },

    /// Neither a local nor a global middleware list was configured.
    #[error("{scope} doesn't have any available middlewares")]
    NoMiddlewares {
        /// Where resolution was looking (the configuration, or a named
        /// environment).
        scope: String,
    },

    /// A blueprint bound to the current environment, with no environment
    /// named at the call site.
    #[error("use_for_blueprint requires a named environment")]
    NoBlueprintContext,

    /// A field held a different [`ConfigValue`] variant than the accessor
    /// expected.
    #[error("configuration field \"{field}\" expects {expected}")]
    FieldType {
        /// The offending field name.
        field: String,
        /// The expected variant, for the message.
        expected: &'static str,
    },
}

/// The configurable names of every recognized field.
///
/// Defaults match the conventional upper-snake spelling; remap any of
/// them per call when the host application uses different keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    /// The local middleware list.
    pub middlewares: String,
    /// The global middleware list.
    pub global_middlewares: String,
    /// The name→sub-config environments mapping.
    pub environments: String,
    /// Whether the global list participates at all (default true).
    pub use_global_middlewares: String,
    /// Whether the global list wraps outer (default true).
    pub global_middlewares_higher: String,
    /// Whether an environment's global list precedes the outer one
    /// (default false).
    pub environment_middlewares_higher: String,
    /// The view-name selection.
    pub view_names: String,
    /// The blueprint selection.
    pub blueprints: String,
    /// Blueprint binding for the resolved registrar.
    pub use_for_blueprint: String,
    /// Whether the reserved static view is wrapped (default false).
    pub apply_static: String,
    /// Whether root (blueprint-less) views are wrapped (default true).
    pub apply_root_views: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            middlewares: "MIDDLEWARES".to_string(),
            global_middlewares: "GLOBAL_MIDDLEWARES".to_string(),
            environments: "ENVIRONMENTS".to_string(),
            use_global_middlewares: "USE_GLOBAL_MIDDLEWARES".to_string(),
            global_middlewares_higher: "IS_GLOBAL_MIDDLEWARES_HIGHER".to_string(),
            environment_middlewares_higher: "IS_ENVIRONMENT_MIDDLEWARES_HIGHER".to_string(),
            view_names: "VIEW_NAMES".to_string(),
            blueprints: "BLUEPRINTS".to_string(),
            use_for_blueprint: "USE_FOR_BLUEPRINT".to_string(),
            apply_static: "IS_APPLY_STATIC".to_string(),
            apply_root_views: "IS_APPLY_ROOT_VIEWS".to_string(),
        }
    }
}

/// A selection expressed in configuration, resolved once at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSpec {
    /// A single identifier: the selection includes exactly it.
    One(String),
    /// A list of identifiers: the selection includes exactly them.
    Many(Vec<String>),
    /// An explicit included/excluded pair.
    Set {
        /// Identifiers on the included side, or unbounded when absent.
        included: Option<Vec<String>>,
        /// Identifiers on the excluded side, or none when absent.
        excluded: Option<Vec<String>>,
    },
}

impl SelectionSpec {
    /// Resolves this spec into a [`SelectionSet`].
    #[must_use]
    pub fn resolve(&self) -> SelectionSet<String> {
        match self {
            Self::One(item) => SelectionSet::including([item.clone()]),
            Self::Many(items) => SelectionSet::including(items.iter().cloned()),
            Self::Set { included, excluded } => SelectionSet::new(
                included.as_ref().map(|items| items.iter().cloned().collect()),
                excluded.as_ref().map(|items| items.iter().cloned().collect()),
            ),
        }
    }
}

/// Blueprint binding for a resolved registrar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseForBlueprint {
    /// Bind to the environment the registrar is being resolved for.
    ///
    /// Requires a named environment at the call site.
    CurrentEnvironment,
    /// Bind to an explicitly named blueprint.
    Named(String),
}

/// A typed configuration value; the closed union of everything a field
/// may hold.
#[derive(Clone)]
pub enum ConfigValue {
    /// A boolean flag.
    Bool(bool),
    /// An ordered middleware list.
    Middlewares(MiddlewareList),
    /// A selection literal.
    Selection(SelectionSpec),
    /// A name→sub-config environments mapping.
    Environments(IndexMap<String, StackConfig>),
    /// A blueprint binding.
    Blueprint(UseForBlueprint),
}

/// A string-keyed mapping of typed configuration fields.
///
/// # Example
///
/// ```
/// use strata_registry::{ConfigValue, SelectionSpec, StackConfig};
/// use strata_core::{FnMiddleware, Handler, Middleware};
/// use std::sync::Arc;
///
/// let timing: Arc<dyn Middleware> =
///     Arc::new(FnMiddleware::new("timing", |route: &Handler, req| route(req)));
/// let config = StackConfig::new()
///     .set("MIDDLEWARES", ConfigValue::Middlewares(vec![timing]))
///     .set(
///         "BLUEPRINTS",
///         ConfigValue::Selection(SelectionSpec::One("blog".to_string())),
///     );
/// ```
#[derive(Clone, Default)]
pub struct StackConfig {
    fields: IndexMap<String, ConfigValue>,
}

impl StackConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: ConfigValue) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    /// Returns the raw value of a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&ConfigValue> {
        self.fields.get(field)
    }

    /// Returns `true` if no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reads a boolean field.
    pub fn bool_field(&self, field: &str) -> Result<Option<bool>, ConfigError> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(ConfigValue::Bool(value)) => Ok(Some(*value)),
            Some(_) => Err(ConfigError::FieldType {
                field: field.to_string(),
                expected: "a boolean",
            }),
        }
    }

    /// Reads a middleware-list field.
    pub fn middlewares_field(&self, field: &str) -> Result<Option<MiddlewareList>, ConfigError> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(ConfigValue::Middlewares(list)) => Ok(Some(list.clone())),
            Some(_) => Err(ConfigError::FieldType {
                field: field.to_string(),
                expected: "a middleware list",
            }),
        }
    }

    /// Reads a selection field, resolving the literal into a set.
    pub fn selection_field(
        &self,
        field: &str,
    ) -> Result<Option<SelectionSet<String>>, ConfigError> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(ConfigValue::Selection(spec)) => Ok(Some(spec.resolve())),
            Some(_) => Err(ConfigError::FieldType {
                field: field.to_string(),
                expected: "a selection literal",
            }),
        }
    }

    /// Reads the environments mapping.
    pub fn environments_field(
        &self,
        field: &str,
    ) -> Result<Option<&IndexMap<String, StackConfig>>, ConfigError> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(ConfigValue::Environments(environments)) => Ok(Some(environments)),
            Some(_) => Err(ConfigError::FieldType {
                field: field.to_string(),
                expected: "an environments mapping",
            }),
        }
    }

    /// Reads a blueprint-binding field.
    pub fn blueprint_field(&self, field: &str) -> Result<Option<UseForBlueprint>, ConfigError> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(ConfigValue::Blueprint(binding)) => Ok(Some(binding.clone())),
            Some(_) => Err(ConfigError::FieldType {
                field: field.to_string(),
                expected: "a blueprint binding",
            }),
        }
    }
}
