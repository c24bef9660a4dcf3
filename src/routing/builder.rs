//! Route table construction from a [`RouteTree`].
//!
//! # Responsibilities
//! - Map top-level directories to methods; reject unknown groups
//! - Derive each terminal module's path from its ancestor directories
//! - Treat the index module name as "the directory itself"
//! - Reject modules without a handler and any duplicate (method, path),
//!   disabled modules included
//! - Compose each module's chain

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::routing::tree::{Dir, ModuleFile};
use crate::routing::{
    BuildError, Chain, RouteEntry, RouteMethod, RouteState, RouteTable, RouteTree,
};

pub const DEFAULT_INDEX_NAME: &str = "index";

/// Builds a [`RouteTable`] from a tree.
#[derive(Debug, Clone)]
pub struct RouteTableBuilder {
    methods: BTreeSet<RouteMethod>,
    index_name: String,
}

impl Default for RouteTableBuilder {
    fn default() -> Self {
        Self {
            methods: RouteMethod::ALL.into_iter().collect(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
        }
    }
}

impl RouteTableBuilder {
    /// Restrict the recognized top-level groups.
    pub fn methods(mut self, methods: impl IntoIterator<Item = RouteMethod>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Module name that maps to its parent directory's own path.
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    /// Build the table. Any error means no table at all.
    pub fn build(&self, tree: &RouteTree) -> Result<RouteTable, BuildError> {
        let root = &tree.root;
        if let Some(stray) = root.modules.first() {
            return Err(BuildError::ModuleOutsideGroup {
                origin: stray.origin.clone(),
            });
        }

        let mut groups: BTreeMap<RouteMethod, &str> = BTreeMap::new();
        let mut entries = BTreeMap::new();

        for (name, dir) in &root.dirs {
            let method = RouteMethod::from_group(name)
                .filter(|m| self.methods.contains(m))
                .ok_or_else(|| BuildError::UnknownGroup { name: name.clone() })?;

            if let Some(first) = groups.insert(method, name) {
                return Err(BuildError::DuplicateGroup {
                    method,
                    first: first.to_string(),
                    second: name.clone(),
                });
            }

            let mut segments = Vec::new();
            self.walk(method, dir, &mut segments, &mut entries)?;
        }

        let table = RouteTable::from_entries(entries);
        tracing::debug!(
            entries = table.len(),
            disabled = table.disabled().count(),
            "Route table built"
        );
        Ok(table)
    }

    fn walk<'t>(
        &self,
        method: RouteMethod,
        dir: &'t Dir,
        segments: &mut Vec<&'t str>,
        entries: &mut BTreeMap<(RouteMethod, String), RouteEntry>,
    ) -> Result<(), BuildError> {
        for file in &dir.modules {
            let entry = self.entry(method, file, segments)?;
            match entries.entry((method, entry.path.clone())) {
                Entry::Occupied(existing) => {
                    return Err(BuildError::DuplicateRoute {
                        method,
                        path: entry.path,
                        first: existing.get().origin.clone(),
                        second: entry.origin,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
            }
        }

        for (name, sub) in &dir.dirs {
            check_segment(name, || format!("{method}/{}", joined(segments, name)))?;
            segments.push(name);
            self.walk(method, sub, segments, entries)?;
            segments.pop();
        }
        Ok(())
    }

    fn entry(
        &self,
        method: RouteMethod,
        file: &ModuleFile,
        segments: &[&str],
    ) -> Result<RouteEntry, BuildError> {
        let mut path: Vec<&str> = segments.to_vec();
        if file.name != self.index_name {
            check_segment(&file.name, || file.origin.clone())?;
            path.push(&file.name);
        }

        let handler = file
            .module
            .handler
            .clone()
            .ok_or_else(|| BuildError::MissingHandler {
                origin: file.origin.clone(),
            })?;

        Ok(RouteEntry {
            method,
            path: format!("/{}", path.join("/")),
            chain: Chain::compose(handler, &file.module.middleware),
            state: if file.module.disabled {
                RouteState::Disabled
            } else {
                RouteState::Active
            },
            origin: file.origin.clone(),
        })
    }
}

fn joined(segments: &[&str], last: &str) -> String {
    segments
        .iter()
        .copied()
        .chain(std::iter::once(last))
        .collect::<Vec<_>>()
        .join("/")
}

/// Segments are literal; reject anything the host router would interpret.
fn check_segment(segment: &str, origin: impl FnOnce() -> String) -> Result<(), BuildError> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.starts_with(':')
        || segment.starts_with('*')
        || segment.contains(['{', '}']);
    if invalid {
        return Err(BuildError::InvalidSegment {
            segment: segment.to_string(),
            origin: origin(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    use crate::routing::{ChainError, HandlerModule, RequestContext};

    fn module() -> HandlerModule {
        HandlerModule::new(|_ctx: RequestContext| async { Ok::<_, ChainError>("ok".into_response()) })
    }

    fn tree(locations: &[&str]) -> RouteTree {
        let mut tree = RouteTree::new();
        for location in locations {
            tree.insert(location, module());
        }
        tree
    }

    fn paths(table: &RouteTable) -> Vec<String> {
        table.iter().map(|e| format!("{} {}", e.method, e.path)).collect()
    }

    #[test]
    fn test_paths_follow_directories() {
        let table = RouteTableBuilder::default()
            .build(&tree(&[
                "GET/index",
                "GET/home.html",
                "GET/api/admin/users",
                "GET/api/index",
                "POST/auth/login",
                "POST/auth/register",
            ]))
            .unwrap();

        assert_eq!(
            paths(&table),
            vec![
                "GET /",
                "GET /api",
                "GET /api/admin/users",
                "GET /home.html",
                "POST /auth/login",
                "POST /auth/register",
            ]
        );
        let entry = table.lookup(RouteMethod::Get, "/api/admin/users").unwrap();
        assert_eq!(entry.origin, "GET/api/admin/users");
    }

    #[test]
    fn test_same_path_under_different_methods_is_fine() {
        let table = RouteTableBuilder::default()
            .build(&tree(&["GET/api/books", "DELETE/api/books"]))
            .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_method_group_is_legal() {
        let mut t = tree(&["GET/index"]);
        t.ensure_dir("PATCH");
        let table = RouteTableBuilder::default().build(&t).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unknown_group_is_rejected() {
        let err = RouteTableBuilder::default()
            .build(&tree(&["GET/index", "static/logo.svg"]))
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownGroup { name } if name == "static"));
    }

    #[test]
    fn test_unrecognized_method_is_rejected() {
        let err = RouteTableBuilder::default()
            .methods([RouteMethod::Get])
            .build(&tree(&["GET/index", "POST/auth/login"]))
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownGroup { name } if name == "POST"));
    }

    #[test]
    fn test_duplicate_group_case_variants() {
        let err = RouteTableBuilder::default()
            .build(&tree(&["GET/a", "get/b"]))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::DuplicateGroup { method: RouteMethod::Get, .. }
        ));
    }

    #[test]
    fn test_index_collides_with_named_module() {
        let err = RouteTableBuilder::default()
            .build(&tree(&["GET/api", "GET/api/index"]))
            .unwrap_err();
        match err {
            BuildError::DuplicateRoute { method, path, first, second } => {
                assert_eq!(method, RouteMethod::Get);
                assert_eq!(path, "/api");
                assert_eq!(first, "GET/api");
                assert_eq!(second, "GET/api/index");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_disabled_module_is_reserved() {
        let mut t = tree(&["GET/api"]);
        t.insert("GET/stats", module().disabled(true));
        let table = RouteTableBuilder::default().build(&t).unwrap();

        assert!(table.lookup(RouteMethod::Get, "/stats").is_none());
        let reserved = table.get(RouteMethod::Get, "/stats").unwrap();
        assert_eq!(reserved.state, RouteState::Disabled);
        assert_eq!(table.active().count(), 1);
        assert_eq!(table.disabled().count(), 1);
    }

    #[test]
    fn test_disabled_path_cannot_be_reused() {
        let mut t = RouteTree::new();
        t.insert("GET/stats", module().disabled(true));
        t.insert("GET/stats/index", module());
        let err = RouteTableBuilder::default().build(&t).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateRoute { path, .. } if path == "/stats"));
    }

    #[test]
    fn test_missing_handler_is_rejected() {
        let mut t = tree(&["GET/index"]);
        t.insert("GET/broken", HandlerModule::default());
        let err = RouteTableBuilder::default().build(&t).unwrap_err();
        assert!(matches!(err, BuildError::MissingHandler { origin } if origin == "GET/broken"));
    }

    #[test]
    fn test_disabled_module_still_needs_handler() {
        let mut t = RouteTree::new();
        t.insert("GET/later", HandlerModule::default().disabled(true));
        assert!(RouteTableBuilder::default().build(&t).is_err());
    }

    #[test]
    fn test_module_outside_group() {
        let err = RouteTableBuilder::default()
            .build(&tree(&["readme"]))
            .unwrap_err();
        assert!(matches!(err, BuildError::ModuleOutsideGroup { .. }));
    }

    #[test]
    fn test_capture_syntax_is_rejected() {
        for location in ["GET/books/{id}", "GET/:id", "GET/files/*rest", "GET/{id}/cover"] {
            let err = RouteTableBuilder::default()
                .build(&tree(&[location]))
                .unwrap_err();
            assert!(
                matches!(err, BuildError::InvalidSegment { .. }),
                "{location} should be rejected"
            );
        }
    }

    #[test]
    fn test_custom_index_name() {
        let table = RouteTableBuilder::default()
            .index_name("_root")
            .build(&tree(&["GET/_root", "GET/index"]))
            .unwrap();
        assert_eq!(paths(&table), vec!["GET /", "GET /index"]);
    }

    #[test]
    fn test_middleware_order_is_declared_order() {
        use crate::routing::{ChainError, Flow, Middleware};
        use futures_util::future::BoxFuture;

        struct First;
        struct Second;
        impl Middleware for First {
            fn call<'a>(&'a self, _: &'a mut RequestContext) -> BoxFuture<'a, Result<Flow, ChainError>> {
                Box::pin(async { Ok(Flow::Proceed) })
            }
        }
        impl Middleware for Second {
            fn call<'a>(&'a self, _: &'a mut RequestContext) -> BoxFuture<'a, Result<Flow, ChainError>> {
                Box::pin(async { Ok(Flow::Proceed) })
            }
        }

        let mut t = RouteTree::new();
        t.insert("GET/home.html", module().middleware(First).middleware(Second));
        let table = RouteTableBuilder::default().build(&t).unwrap();
        let entry = table.lookup(RouteMethod::Get, "/home.html").unwrap();
        assert_eq!(entry.chain.middleware_names(), vec!["First", "Second"]);
        assert_eq!(entry.chain.len(), 3);
    }
}
