//! Binding a module registry to a real route directory.
//!
//! Directories become tree directories; each file becomes a terminal module
//! named after its file name minus the final extension. The registry supplies
//! the module found at each file's location.

use std::collections::BTreeMap;
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::routing::{BuildError, HandlerModule, ModuleRegistry, RouteMethod, RouteTree};

impl RouteTree {
    /// Walk `root` and lay out one module per file.
    ///
    /// A file without a registered module is kept with no handler so the
    /// build reports it. Registered modules that have no file are logged and
    /// dropped.
    pub fn scan(root: &Path, mut registry: ModuleRegistry) -> Result<RouteTree, BuildError> {
        if !root.is_dir() {
            return Err(BuildError::RootNotFound(root.to_path_buf()));
        }

        let mut tree = RouteTree::new();
        let mut seen: BTreeMap<String, String> = BTreeMap::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry.file_name()));

        for entry in walker {
            let entry = entry?;
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let mut segments: Vec<String> = relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect();

            if entry.file_type().is_dir() {
                tree.ensure_dir(&segments.join("/"));
                continue;
            }

            let file = segments.join("/");
            if let Some(last) = segments.last_mut() {
                *last = module_name(last).to_string();
            }
            let location = segments.join("/");

            // Same stem, different extension: both files claim one location.
            if let Some(first) = seen.get(&location) {
                if let Some(method) = segments.first().and_then(|g| RouteMethod::from_group(g)) {
                    return Err(BuildError::DuplicateRoute {
                        method,
                        path: format!("/{}", segments[1..].join("/")),
                        first: first.clone(),
                        second: file,
                    });
                }
                // Outside a known group; the builder rejects the group itself.
                continue;
            }
            seen.insert(location.clone(), file);
            let module = registry.take(&location).unwrap_or_else(|| {
                tracing::debug!(location = %location, "No module registered for route file");
                HandlerModule::default()
            });
            tree.insert(&location, module);
        }

        for location in registry.locations() {
            tracing::warn!(location, root = %root.display(), "Registered module has no route file");
        }

        Ok(tree)
    }
}

/// File name up to its final extension: `home.html.rs` → `home.html`.
fn module_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(idx) => &file_name[..idx],
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use std::fs;
    use tempfile::TempDir;

    use crate::routing::{ChainError, RequestContext, RouteMethod, RouteTableBuilder};

    fn module() -> HandlerModule {
        HandlerModule::new(|_ctx: RequestContext| async { Ok::<_, ChainError>("ok".into_response()) })
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_module_name_strips_final_extension() {
        assert_eq!(module_name("users.rs"), "users");
        assert_eq!(module_name("home.html.rs"), "home.html");
        assert_eq!(module_name("index"), "index");
    }

    #[test]
    fn test_scan_binds_registered_modules() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "GET/index.route");
        touch(dir.path(), "GET/home.html.route");
        touch(dir.path(), "GET/api/admin/users.route");
        touch(dir.path(), "GET/.hidden/skip.route");
        fs::create_dir_all(dir.path().join("PUT")).unwrap();

        let mut registry = ModuleRegistry::new();
        registry
            .register("GET/index", module())
            .register("GET/home.html", module())
            .register("GET/api/admin/users", module())
            .register("POST/orphan", module());

        let tree = RouteTree::scan(dir.path(), registry).unwrap();
        assert_eq!(tree.module_count(), 3);
        assert!(tree.root().dirs.contains_key("PUT"));

        let table = RouteTableBuilder::default().build(&tree).unwrap();
        let paths: Vec<_> = table.active().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/api/admin/users", "/home.html"]);
        assert!(table.lookup(RouteMethod::Post, "/orphan").is_none());
    }

    #[test]
    fn test_unregistered_file_is_missing_handler() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "GET/home.html.route");
        touch(dir.path(), "GET/stray.route");

        let mut registry = ModuleRegistry::new();
        registry.register("GET/home.html", module());

        let tree = RouteTree::scan(dir.path(), registry).unwrap();
        let err = RouteTableBuilder::default().build(&tree).unwrap_err();
        assert!(matches!(err, BuildError::MissingHandler { origin } if origin == "GET/stray"));
    }

    #[test]
    fn test_unknown_empty_group_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "GET/index.route");
        fs::create_dir_all(dir.path().join("assets")).unwrap();

        let mut registry = ModuleRegistry::new();
        registry.register("GET/index", module());

        let tree = RouteTree::scan(dir.path(), registry).unwrap();
        let err = RouteTableBuilder::default().build(&tree).unwrap_err();
        assert!(matches!(err, BuildError::UnknownGroup { name } if name == "assets"));
    }

    #[test]
    fn test_same_stem_twice_is_duplicate_route() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "GET/users.rs");
        touch(dir.path(), "GET/users.route");

        let mut registry = ModuleRegistry::new();
        registry.register("GET/users", module());

        let err = RouteTree::scan(dir.path(), registry).unwrap_err();
        match err {
            BuildError::DuplicateRoute {
                method,
                path,
                first,
                second,
            } => {
                assert_eq!(method, RouteMethod::Get);
                assert_eq!(path, "/users");
                assert_eq!(first, "GET/users.route");
                assert_eq!(second, "GET/users.rs");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = RouteTree::scan(&missing, ModuleRegistry::new()).unwrap_err();
        assert!(matches!(err, BuildError::RootNotFound(_)));
    }

    #[test]
    fn test_scan_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for file in ["GET/b.route", "GET/a.route", "POST/x/y.route", "GET/sub/index.route"] {
            touch(dir.path(), file);
        }
        let listing = || {
            let mut registry = ModuleRegistry::new();
            for location in ["GET/a", "GET/b", "POST/x/y", "GET/sub/index"] {
                registry.register(location, module());
            }
            let tree = RouteTree::scan(dir.path(), registry).unwrap();
            RouteTableBuilder::default()
                .build(&tree)
                .unwrap()
                .iter()
                .map(|e| format!("{} {}", e.method, e.path))
                .collect::<Vec<_>>()
        };
        assert_eq!(listing(), listing());
        assert_eq!(listing(), vec!["GET /a", "GET /b", "GET /sub", "POST /x/y"]);
    }
}
