//! End-to-end registration integration tests.
//!
//! These tests drive the full path an application takes: build a
//! configuration, resolve it into registrars, register against an
//! in-memory route table, and send requests through the wrapped
//! handlers. The standard middleware variants from `strata-middleware`
//! supply realistic cross-cutting behavior.

use std::sync::{Arc, Mutex};
use strata_core::{
    handler, handler_fn, ErrorDispatcher, ErrorKind, FnMiddleware, Handler, Middleware,
    MiddlewareStack, Reply, Request, RouteTable, TypedJsonHandler,
};
use strata_middleware::{
    AbortMiddleware, RecoveryMiddleware, RedirectMiddleware, StatusRanges,
};
use strata_registry::{
    ConfigValue, MultiRegistrar, MultiResolveOptions, Registrar, ResolveOptions, SelectionSet,
    SelectionSpec, StackConfig, UseForBlueprint,
};

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use indexmap::IndexMap;
use thiserror::Error;

type Log = Arc<Mutex<Vec<String>>>;

#[derive(Error, Debug)]
#[error("record not found")]
struct NotFound;

/// Creates a request for the given path.
fn make_request(path: &str) -> Request {
    http::Request::builder()
        .method("GET")
        .uri(path)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Invokes the current handler registered under `view_id`.
fn invoke(table: &RouteTable, view_id: &str) -> Reply {
    table.handler(view_id).unwrap()(make_request("/")).unwrap()
}

/// A middleware that records enter/exit events under its label.
fn recorder(label: &'static str, log: &Log) -> Arc<dyn Middleware> {
    let log = log.clone();
    Arc::new(FnMiddleware::new(label, move |route: &Handler, request| {
        log.lock().unwrap().push(format!("{label}-enter"));
        let result = route(request);
        log.lock().unwrap().push(format!("{label}-exit"));
        result
    }))
}

/// A route that records its own invocation before answering.
fn recording_route(label: &'static str, log: &Log) -> Handler {
    let log = log.clone();
    handler(move |_request| {
        log.lock().unwrap().push(label.to_string());
        Ok(Reply::text(label))
    })
}

fn environments(entries: Vec<(&str, StackConfig)>) -> IndexMap<String, StackConfig> {
    entries
        .into_iter()
        .map(|(name, config)| (name.to_string(), config))
        .collect()
}

#[test]
fn test_config_to_request_flow_preserves_nesting_order() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let config = StackConfig::new()
        .set(
            "GLOBAL_MIDDLEWARES",
            ConfigValue::Middlewares(vec![recorder("global", &log)]),
        )
        .set(
            "MIDDLEWARES",
            ConfigValue::Middlewares(vec![recorder("local", &log)]),
        );

    let registrar = Registrar::from_config(&config, &ResolveOptions::new()).unwrap();

    let mut table = RouteTable::new();
    table.insert("index", recording_route("route", &log));
    registrar.init_app(&mut table);

    invoke(&table, "index");
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "global-enter",
            "local-enter",
            "route",
            "local-exit",
            "global-exit"
        ]
    );
}

#[test]
fn test_blueprint_filtering_across_a_real_table() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let config = StackConfig::new()
        .set(
            "MIDDLEWARES",
            ConfigValue::Middlewares(vec![recorder("blog-only", &log)]),
        )
        .set(
            "BLUEPRINTS",
            ConfigValue::Selection(SelectionSpec::One("blog".to_string())),
        )
        .set("IS_APPLY_ROOT_VIEWS", ConfigValue::Bool(false));

    let registrar = Registrar::from_config(&config, &ResolveOptions::new()).unwrap();

    let mut table = RouteTable::new();
    table.insert("index", recording_route("index", &log));
    table.insert("blog.index", recording_route("blog.index", &log));
    table.insert("shop.cart", recording_route("shop.cart", &log));
    table.insert("static", recording_route("static", &log));
    registrar.init_app(&mut table);

    invoke(&table, "index");
    invoke(&table, "blog.index");
    invoke(&table, "shop.cart");
    invoke(&table, "static");

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "index",
            "blog-only-enter",
            "blog.index",
            "blog-only-exit",
            "shop.cart",
            "static"
        ]
    );
}

#[test]
fn test_recovery_stack_turns_route_errors_into_json() {
    let typed = TypedJsonHandler::new(vec![ErrorKind::of::<NotFound>()], StatusCode::NOT_FOUND);
    let recovery: Arc<dyn Middleware> = Arc::new(RecoveryMiddleware::new(ErrorDispatcher::new(
        vec![Arc::new(typed)],
    )));

    let config = StackConfig::new().set("MIDDLEWARES", ConfigValue::Middlewares(vec![recovery]));
    let registrar = Registrar::from_config(&config, &ResolveOptions::new()).unwrap();

    let mut table = RouteTable::new();
    table.insert("lookup", handler(|_request| Err(NotFound.into())));
    registrar.init_app(&mut table);

    let reply = invoke(&table, "lookup");
    assert_eq!(reply.status_code(), StatusCode::NOT_FOUND);

    let response = reply.into_response();
    assert_eq!(
        response.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[test]
fn test_recovery_outside_abort_sees_the_aborted_reply() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let recovery: Arc<dyn Middleware> = Arc::new(RecoveryMiddleware::new(ErrorDispatcher::new(
        vec![handler_fn(|_error| {
            Some(Reply::error(StatusCode::SERVICE_UNAVAILABLE, "degraded"))
        })],
    )));
    let abort: Arc<dyn Middleware> =
        Arc::new(AbortMiddleware::with_ranges(StatusRanges::server_error()));

    // Recovery is outer, abort inner, per list order.
    let stack = MiddlewareStack::new(vec![recovery, abort, recorder("probe", &log)]);
    let registrar = Registrar::new(stack);

    let mut table = RouteTable::new();
    table.insert(
        "flaky",
        handler(|_request| {
            Ok(Reply::BodyWithStatus(
                Bytes::new(),
                StatusCode::BAD_GATEWAY,
            ))
        }),
    );
    registrar.init_app(&mut table);

    let reply = invoke(&table, "flaky");
    // Abort replaced the 502; no error ever reached the recovery layer.
    assert_eq!(reply.status_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(*log.lock().unwrap(), vec!["probe-enter", "probe-exit"]);
}

#[test]
fn test_redirect_target_resolves_through_the_table() {
    let mut table = RouteTable::new();
    table.insert_with_url("auth.login", "/login", handler(|_req| Ok(Reply::text("login"))));
    table.insert(
        "account",
        handler(|_request| {
            Ok(Reply::BodyWithStatus(
                Bytes::new(),
                StatusCode::MOVED_PERMANENTLY,
            ))
        }),
    );

    let redirect: Arc<dyn Middleware> = Arc::new(RedirectMiddleware::new(
        "auth.login",
        Arc::new(table.clone()),
    ));
    let registrar = Registrar::new(MiddlewareStack::new(vec![redirect]))
        .with_view_names(SelectionSet::including(["account".to_string()]));
    registrar.init_app(&mut table);

    let response = invoke(&table, "account").into_response();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(http::header::LOCATION).unwrap(),
        "/login"
    );

    // The login view itself was outside the selection.
    assert_eq!(invoke(&table, "auth.login").status_code(), StatusCode::OK);
}

#[test]
fn test_environment_fan_out_wraps_disjoint_blueprints() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let admin = StackConfig::new()
        .set(
            "MIDDLEWARES",
            ConfigValue::Middlewares(vec![recorder("admin-mw", &log)]),
        )
        .set(
            "USE_FOR_BLUEPRINT",
            ConfigValue::Blueprint(UseForBlueprint::CurrentEnvironment),
        );
    let public = StackConfig::new()
        .set(
            "MIDDLEWARES",
            ConfigValue::Middlewares(vec![recorder("public-mw", &log)]),
        )
        .set(
            "USE_FOR_BLUEPRINT",
            ConfigValue::Blueprint(UseForBlueprint::CurrentEnvironment),
        );

    let config = StackConfig::new().set(
        "ENVIRONMENTS",
        ConfigValue::Environments(environments(vec![("admin", admin), ("public", public)])),
    );

    let multi = MultiRegistrar::from_config(
        &config,
        &MultiResolveOptions::new().environments_only(true),
    )
    .unwrap();
    assert_eq!(multi.len(), 2);

    let mut table = RouteTable::new();
    table.insert("admin.dashboard", recording_route("admin.dashboard", &log));
    table.insert("public.home", recording_route("public.home", &log));
    table.insert("index", recording_route("index", &log));
    multi.init_app(&mut table);

    invoke(&table, "admin.dashboard");
    invoke(&table, "public.home");
    invoke(&table, "index");

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "admin-mw-enter",
            "admin.dashboard",
            "admin-mw-exit",
            "public-mw-enter",
            "public.home",
            "public-mw-exit",
            "index"
        ]
    );
}

#[test]
fn test_overlapping_registrars_nest_later_outside_earlier() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let multi = MultiRegistrar::new(vec![
        Registrar::new(MiddlewareStack::new(vec![recorder("first", &log)])),
        Registrar::new(MiddlewareStack::new(vec![recorder("second", &log)])),
    ]);

    let mut table = RouteTable::new();
    table.insert("index", recording_route("route", &log));
    multi.init_app(&mut table);

    invoke(&table, "index");
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "second-enter",
            "first-enter",
            "route",
            "first-exit",
            "second-exit"
        ]
    );
}

#[test]
fn test_double_registration_doubles_the_stack() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let registrar =
        Registrar::new(MiddlewareStack::new(vec![recorder("layer", &log)]));

    let mut table = RouteTable::new();
    table.insert("index", recording_route("route", &log));
    registrar.init_app(&mut table);
    registrar.init_app(&mut table);

    invoke(&table, "index");
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "layer-enter",
            "layer-enter",
            "route",
            "layer-exit",
            "layer-exit"
        ]
    );
}

#[test]
fn test_environment_ordering_flags_through_a_request() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let prod = StackConfig::new()
        .set(
            "GLOBAL_MIDDLEWARES",
            ConfigValue::Middlewares(vec![recorder("env", &log)]),
        )
        .set(
            "MIDDLEWARES",
            ConfigValue::Middlewares(vec![recorder("local", &log)]),
        )
        .set("IS_ENVIRONMENT_MIDDLEWARES_HIGHER", ConfigValue::Bool(true));
    let config = StackConfig::new()
        .set(
            "GLOBAL_MIDDLEWARES",
            ConfigValue::Middlewares(vec![recorder("outer", &log)]),
        )
        .set(
            "ENVIRONMENTS",
            ConfigValue::Environments(environments(vec![("prod", prod)])),
        );

    let registrar =
        Registrar::from_config(&config, &ResolveOptions::new().environment("prod")).unwrap();

    let mut table = RouteTable::new();
    table.insert("index", recording_route("route", &log));
    registrar.init_app(&mut table);

    invoke(&table, "index");
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "env-enter",
            "outer-enter",
            "local-enter",
            "route",
            "local-exit",
            "outer-exit",
            "env-exit"
        ]
    );
}
