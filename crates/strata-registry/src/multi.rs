//! Composing registrars into one registration pass.
//!
//! A [`MultiRegistrar`] holds an ordered list of [`Registrar`]s and runs
//! their registrations left to right. Where route subsets overlap, a
//! later registrar observes the handlers already wrapped by earlier ones,
//! so the first registrar's stack ends up innermost.
//!
//! [`MultiRegistrar::from_config`] fans a single configuration out into
//! one registrar per declared environment, optionally followed by a root
//! (no-environment) registrar.

use crate::config::{ConfigError, StackConfig};
use crate::registrar::{Registrar, ResolveOptions};
use std::sync::Arc;
use strata_core::ViewRegistry;

/// Builds one registrar from a configuration scope.
pub type RegistrarFactory =
    Arc<dyn Fn(&StackConfig, &ResolveOptions) -> Result<Registrar, ConfigError> + Send + Sync>;

/// Inputs to [`MultiRegistrar::from_config`].
#[derive(Clone, Default)]
pub struct MultiResolveOptions {
    base: ResolveOptions,
    environments_only: bool,
    registrar_factory: Option<RegistrarFactory>,
}

impl MultiResolveOptions {
    /// Creates options with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-registrar options each environment entry starts from.
    ///
    /// Any environment set on the base is replaced per entry.
    #[must_use]
    pub fn base(mut self, base: ResolveOptions) -> Self {
        self.base = base;
        self
    }

    /// Skips the trailing root (no-environment) registrar.
    #[must_use]
    pub fn environments_only(mut self, environments_only: bool) -> Self {
        self.environments_only = environments_only;
        self
    }

    /// Injects the factory building each registrar.
    #[must_use]
    pub fn registrar_factory(mut self, factory: RegistrarFactory) -> Self {
        self.registrar_factory = Some(factory);
        self
    }
}

/// An ordered composition of registrars.
#[derive(Clone, Default, Debug)]
pub struct MultiRegistrar {
    registrars: Vec<Registrar>,
}

impl MultiRegistrar {
    /// Creates a composite over the given registrars, in application
    /// order.
    #[must_use]
    pub fn new(registrars: Vec<Registrar>) -> Self {
        Self { registrars }
    }

    /// Appends a registrar; it will wrap outside all earlier ones on
    /// overlapping routes.
    pub fn push(&mut self, registrar: Registrar) {
        self.registrars.push(registrar);
    }

    /// Returns the contained registrars, in application order.
    #[must_use]
    pub fn registrars(&self) -> &[Registrar] {
        &self.registrars
    }

    /// Returns the number of contained registrars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrars.len()
    }

    /// Returns `true` if no registrars are contained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrars.is_empty()
    }

    /// Runs every contained registrar's registration, left to right.
    pub fn init_app(&self, app: &mut dyn ViewRegistry) {
        for registrar in &self.registrars {
            registrar.init_app(app);
        }
    }

    /// Resolves one registrar per declared environment, in declaration
    /// order, plus a trailing root registrar unless `environments_only`.
    ///
    /// Each entry runs the single-registrar resolution algorithm (or the
    /// injected factory); any entry's failure aborts the whole fan-out.
    pub fn from_config(
        config: &StackConfig,
        options: &MultiResolveOptions,
    ) -> Result<Self, ConfigError> {
        let environments = config
            .environments_field(&options.base.field_names.environments)?
            .map(|environments| environments.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();

        let build = |resolve: &ResolveOptions| match &options.registrar_factory {
            Some(factory) => factory(config, resolve),
            None => Registrar::from_config(config, resolve),
        };

        let mut registrars = Vec::with_capacity(environments.len() + 1);
        for environment in environments {
            registrars.push(build(&options.base.clone().environment(environment))?);
        }

        if !options.environments_only {
            registrars.push(build(&options.base.clone().without_environment())?);
        }

        Ok(Self { registrars })
    }
}
