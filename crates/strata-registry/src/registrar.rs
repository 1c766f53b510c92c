//! Binding middleware stacks to filtered route subsets.
//!
//! A [`Registrar`] owns a [`MiddlewareStack`] and two [`SelectionSet`]s:
//! one over view identifiers, one over blueprint identifiers. On
//! [`Registrar::init_app`] it walks the host's view registry and replaces
//! every eligible handler with the stack's decorated version.
//!
//! [`Registrar::from_config`] is the layered resolution algorithm: it
//! merges the outer global middleware list, an optional environment's
//! list, and the local list into one ordered stack, then resolves the
//! selection filters from call-site overrides and configuration fields.

use crate::config::{ConfigError, FieldNames, MiddlewareList, StackConfig, UseForBlueprint};
use crate::selection::SelectionSet;
use std::sync::Arc;
use strata_core::{MiddlewareStack, ViewRegistry};

/// The reserved identifier of the host's asset view.
pub const STATIC_VIEW: &str = "static";

/// Builds the stack from the resolved middleware list.
pub type StackFactory = Arc<dyn Fn(MiddlewareList) -> MiddlewareStack + Send + Sync>;

/// Call-site inputs to [`Registrar::from_config`].
///
/// Every `Option` field overrides the corresponding configuration field
/// when set; the configuration (and then the documented default) applies
/// otherwise.
#[derive(Clone, Default)]
pub struct ResolveOptions {
    environment: Option<String>,
    pub(crate) field_names: FieldNames,
    use_global_middlewares: Option<bool>,
    global_middlewares_higher: Option<bool>,
    environment_middlewares_higher: Option<bool>,
    view_names: Option<SelectionSet<String>>,
    blueprints: Option<SelectionSet<String>>,
    apply_static: Option<bool>,
    apply_root_views: Option<bool>,
    stack_factory: Option<StackFactory>,
}

impl ResolveOptions {
    /// Creates options with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves against the named environment's sub-configuration.
    #[must_use]
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Clears any named environment, resolving against the root scope.
    #[must_use]
    pub fn without_environment(mut self) -> Self {
        self.environment = None;
        self
    }

    /// Returns the named environment, if any.
    #[must_use]
    pub fn environment_name(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Remaps the configuration field names.
    #[must_use]
    pub fn field_names(mut self, field_names: FieldNames) -> Self {
        self.field_names = field_names;
        self
    }

    /// Overrides whether the global list participates.
    #[must_use]
    pub fn use_global_middlewares(mut self, use_global: bool) -> Self {
        self.use_global_middlewares = Some(use_global);
        self
    }

    /// Overrides whether the global list wraps outer.
    #[must_use]
    pub fn global_middlewares_higher(mut self, higher: bool) -> Self {
        self.global_middlewares_higher = Some(higher);
        self
    }

    /// Overrides whether the environment's global list precedes the outer
    /// one.
    #[must_use]
    pub fn environment_middlewares_higher(mut self, higher: bool) -> Self {
        self.environment_middlewares_higher = Some(higher);
        self
    }

    /// Overrides the view-name selection.
    #[must_use]
    pub fn view_names(mut self, view_names: SelectionSet<String>) -> Self {
        self.view_names = Some(view_names);
        self
    }

    /// Overrides the blueprint selection.
    #[must_use]
    pub fn blueprints(mut self, blueprints: SelectionSet<String>) -> Self {
        self.blueprints = Some(blueprints);
        self
    }

    /// Overrides whether the reserved static view is wrapped.
    #[must_use]
    pub fn apply_static(mut self, apply_static: bool) -> Self {
        self.apply_static = Some(apply_static);
        self
    }

    /// Overrides whether root views are wrapped.
    #[must_use]
    pub fn apply_root_views(mut self, apply_root_views: bool) -> Self {
        self.apply_root_views = Some(apply_root_views);
        self
    }

    /// Injects the factory building the stack from the resolved list.
    #[must_use]
    pub fn stack_factory(mut self, factory: StackFactory) -> Self {
        self.stack_factory = Some(factory);
        self
    }
}

/// Binds a middleware stack to a filtered subset of an application's
/// routes.
#[derive(Clone, Debug)]
pub struct Registrar {
    stack: MiddlewareStack,
    view_names: SelectionSet<String>,
    blueprints: SelectionSet<String>,
    apply_static: bool,
    apply_root_views: bool,
}

impl Registrar {
    /// Creates a registrar applying `stack` to every route.
    #[must_use]
    pub fn new(stack: MiddlewareStack) -> Self {
        Self {
            stack,
            view_names: SelectionSet::all(),
            blueprints: SelectionSet::all(),
            apply_static: false,
            apply_root_views: true,
        }
    }

    /// Restricts registration to the given view names.
    #[must_use]
    pub fn with_view_names(mut self, view_names: SelectionSet<String>) -> Self {
        self.view_names = view_names;
        self
    }

    /// Restricts registration to the given blueprints.
    #[must_use]
    pub fn with_blueprints(mut self, blueprints: SelectionSet<String>) -> Self {
        self.blueprints = blueprints;
        self
    }

    /// Includes the reserved static view in registration.
    #[must_use]
    pub fn with_apply_static(mut self, apply_static: bool) -> Self {
        self.apply_static = apply_static;
        self
    }

    /// Controls whether root (blueprint-less) views are wrapped.
    #[must_use]
    pub fn with_apply_root_views(mut self, apply_root_views: bool) -> Self {
        self.apply_root_views = apply_root_views;
        self
    }

    /// Returns the owned stack.
    #[must_use]
    pub fn stack(&self) -> &MiddlewareStack {
        &self.stack
    }

    /// Replaces the stack's middleware sequence.
    pub fn set_middlewares(&mut self, middlewares: MiddlewareList) {
        self.stack.set_middlewares(middlewares);
    }

    /// Returns `true` if this registrar applies to `view_id`.
    #[must_use]
    pub fn is_eligible(&self, view_id: &str) -> bool {
        if view_id == STATIC_VIEW && !self.apply_static {
            return false;
        }

        self.view_names.contains(view_id) && self.eligible_for_blueprints(view_id)
    }

    /// A view belongs to every blueprint named by its dot-separated path
    /// segments; a view without segments is a root view.
    fn eligible_for_blueprints(&self, view_id: &str) -> bool {
        let mut segments = view_id.split('.').collect::<Vec<_>>();
        segments.pop();

        if segments.is_empty() {
            return self.apply_root_views;
        }

        segments
            .iter()
            .any(|segment| self.blueprints.contains(*segment))
    }

    /// Wraps every eligible view handler in `app` with the stack.
    ///
    /// Views are visited in reverse of the registry's reported order, so
    /// that a registrar applied later wraps outer. Calling this twice
    /// wraps handlers twice; re-invocation is not guarded.
    pub fn init_app(&self, app: &mut dyn ViewRegistry) {
        let mut wrapped = 0usize;

        for (view_id, original) in app.views().into_iter().rev() {
            if !self.is_eligible(&view_id) {
                continue;
            }

            app.replace_view(&view_id, self.stack.decorate(original));
            tracing::debug!(view = %view_id, layers = self.stack.len(), "view wrapped");
            wrapped += 1;
        }

        tracing::info!(wrapped, "middleware registration complete");
    }

    /// Resolves a registrar from layered configuration.
    ///
    /// The outer global middleware list is read first; when an environment
    /// is named, its sub-configuration replaces `config` for every
    /// subsequent read, and its own global list is appended after (or,
    /// with the environment-higher flag, prepended before) the outer one.
    /// The local list then joins the combined global list in the order
    /// the global-higher flag picks. Selection filters and the static/
    /// root-view flags come from call-site overrides first, configuration
    /// fields second.
    pub fn from_config(
        config: &StackConfig,
        options: &ResolveOptions,
    ) -> Result<Self, ConfigError> {
        let names = &options.field_names;

        // Only the outer global list is read before the environment swap.
        let mut global = config
            .middlewares_field(&names.global_middlewares)?
            .unwrap_or_default();

        let mut scope = config;
        if let Some(environment) = &options.environment {
            let sub = config
                .environments_field(&names.environments)?
                .and_then(|environments| environments.get(environment))
                .ok_or_else(|| ConfigError::UnknownEnvironment {
                    name: environment.clone(),
                })?;

            let environment_global = sub
                .middlewares_field(&names.global_middlewares)?
                .unwrap_or_default();
            let environment_higher = match options.environment_middlewares_higher {
                Some(higher) => higher,
                None => sub
                    .bool_field(&names.environment_middlewares_higher)?
                    .unwrap_or(false),
            };

            if environment_higher {
                let mut combined = environment_global;
                combined.extend(global);
                global = combined;
            } else {
                global.extend(environment_global);
            }

            scope = sub;
        }

        let local = scope
            .middlewares_field(&names.middlewares)?
            .unwrap_or_default();

        if local.is_empty() && global.is_empty() {
            let scope_name = options.environment.as_ref().map_or_else(
                || "the configuration".to_string(),
                |environment| format!("environment \"{environment}\""),
            );
            return Err(ConfigError::NoMiddlewares { scope: scope_name });
        }

        let use_global = match options.use_global_middlewares {
            Some(use_global) => use_global,
            None => scope
                .bool_field(&names.use_global_middlewares)?
                .unwrap_or(true),
        };
        let global_higher = match options.global_middlewares_higher {
            Some(higher) => higher,
            None => scope
                .bool_field(&names.global_middlewares_higher)?
                .unwrap_or(true),
        };

        let middlewares = if !use_global {
            local
        } else if global_higher {
            let mut combined = global;
            combined.extend(local);
            combined
        } else {
            let mut combined = local;
            combined.extend(global);
            combined
        };

        let view_names = match &options.view_names {
            Some(view_names) => view_names.clone(),
            None => scope
                .selection_field(&names.view_names)?
                .unwrap_or_else(SelectionSet::all),
        };
        let mut blueprints = match &options.blueprints {
            Some(blueprints) => blueprints.clone(),
            None => scope
                .selection_field(&names.blueprints)?
                .unwrap_or_else(SelectionSet::all),
        };
        let apply_static = match options.apply_static {
            Some(apply_static) => apply_static,
            None => scope.bool_field(&names.apply_static)?.unwrap_or(false),
        };
        let mut apply_root_views = match options.apply_root_views {
            Some(apply_root_views) => Some(apply_root_views),
            None => scope.bool_field(&names.apply_root_views)?,
        };

        if let Some(binding) = scope.blueprint_field(&names.use_for_blueprint)? {
            let blueprint = match binding {
                UseForBlueprint::CurrentEnvironment => options
                    .environment
                    .clone()
                    .ok_or(ConfigError::NoBlueprintContext)?,
                UseForBlueprint::Named(name) => name,
            };

            blueprints = blueprints.with_included(blueprint);
            // A blueprint-scoped registrar narrows away from root views
            // unless the flag was set explicitly.
            apply_root_views = apply_root_views.or(Some(false));
        }

        let stack = match &options.stack_factory {
            Some(factory) => factory(middlewares),
            None => MiddlewareStack::new(middlewares),
        };

        Ok(Self {
            stack,
            view_names,
            blueprints,
            apply_static,
            apply_root_views: apply_root_views.unwrap_or(true),
        })
    }
}
