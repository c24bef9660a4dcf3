//! Declared route manifest of the application.
//!
//! Locations follow the route convention: the first segment is the method
//! group, `index` maps to the group's root path, everything else is a
//! literal path segment.

use std::future::Future;
use std::sync::Arc;

use axum::response::Response;

use crate::app::{admin, auth, books, pages, Services};
use crate::config::schema::AppConfig;
use crate::routing::{
    BuildError, ChainError, HandlerModule, Middleware, ModuleRegistry, RequestContext,
    RouteTable, RouteTableBuilder, RouteTree,
};
use crate::security::{RequireAdmin, RequireLogin};

/// Module whose handler receives a clone of the services on every request.
fn bind<F, Fut>(services: &Services, handler: F) -> HandlerModule
where
    F: Fn(Services, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, ChainError>> + Send + 'static,
{
    let services = services.clone();
    HandlerModule::new(move |ctx: RequestContext| handler(services.clone(), ctx))
}

/// Every module the application serves, keyed by location.
pub fn registry(services: &Services) -> ModuleRegistry {
    let login: Arc<dyn Middleware> = Arc::new(RequireLogin::new(
        Arc::clone(&services.identity),
        services.session.cookie_name.clone(),
        services.session.login_page.clone(),
    ));
    let admin: Arc<dyn Middleware> = Arc::new(RequireAdmin::new(
        Arc::clone(&services.identity),
        services.session.cookie_name.clone(),
    ));

    let mut registry = ModuleRegistry::new();
    registry
        .register("GET/index", bind(services, pages::index))
        .register(
            "GET/home.html",
            bind(services, pages::home).shared_middleware(Arc::clone(&login)),
        )
        .register(
            "GET/admin.html",
            bind(services, pages::admin)
                .shared_middleware(Arc::clone(&login))
                .shared_middleware(Arc::clone(&admin)),
        )
        .register("POST/auth/login", bind(services, auth::login))
        .register("POST/auth/register", bind(services, auth::register))
        .register(
            "POST/auth/logout",
            bind(services, auth::logout).shared_middleware(Arc::clone(&login)),
        )
        .register(
            "GET/api/books",
            bind(services, books::list).shared_middleware(Arc::clone(&login)),
        )
        .register(
            "POST/api/books",
            bind(services, books::add).shared_middleware(Arc::clone(&login)),
        )
        .register(
            "GET/api/admin/users",
            bind(services, admin::users).shared_middleware(Arc::clone(&admin)),
        )
        .register(
            "POST/api/admin/reset-counters",
            bind(services, admin::reset_counters).shared_middleware(Arc::clone(&admin)),
        )
        .register(
            "DELETE/api/admin/books",
            bind(services, admin::delete_book).shared_middleware(Arc::clone(&admin)),
        )
        .register(
            "GET/api/admin/stats",
            bind(services, admin::stats)
                .shared_middleware(Arc::clone(&admin))
                .disabled(true),
        );
    registry
}

/// The convention tree: scanned from `routes.dir` when configured, otherwise
/// the manifest itself.
pub fn route_tree(config: &AppConfig, services: &Services) -> Result<RouteTree, BuildError> {
    let registry = registry(services);
    match &config.routes.dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Scanning route directory");
            RouteTree::scan(dir, registry)
        }
        None => Ok(registry.into_tree()),
    }
}

/// Build the frozen route table for this configuration.
pub fn build_table(config: &AppConfig, services: &Services) -> Result<RouteTable, BuildError> {
    RouteTableBuilder::default().build(&route_tree(config, services)?)
}
