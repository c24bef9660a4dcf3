//! In-memory form of the route directory convention.
//!
//! ```text
//! <root>/
//!   GET/
//!     index          → GET /
//!     home.html      → GET /home.html
//!     api/admin/
//!       users        → GET /api/admin/users
//!   POST/
//!     auth/
//!       login        → POST /auth/login
//! ```
//!
//! A tree is either declared in code through a [`ModuleRegistry`] or bound
//! to a real directory with [`RouteTree::scan`](crate::routing::scan).

use std::collections::BTreeMap;

use crate::routing::HandlerModule;

/// A terminal module placed in the tree.
#[derive(Debug, Clone)]
pub struct ModuleFile {
    /// Module name; becomes the last path segment unless it is the index name.
    pub name: String,
    /// Location the module was declared or discovered at.
    pub origin: String,
    pub module: HandlerModule,
}

/// One directory level.
#[derive(Debug, Clone, Default)]
pub struct Dir {
    pub dirs: BTreeMap<String, Dir>,
    pub modules: Vec<ModuleFile>,
}

impl Dir {
    fn descend(&mut self, names: &[&str]) -> &mut Dir {
        names.iter().fold(self, |dir, name| {
            dir.dirs.entry((*name).to_string()).or_default()
        })
    }

    pub fn module_count(&self) -> usize {
        self.modules.len() + self.dirs.values().map(Dir::module_count).sum::<usize>()
    }
}

/// Root of the route convention.
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
    pub(crate) root: Dir,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Dir {
        &self.root
    }

    /// Place a module at `location`, e.g. `GET/api/admin/users`.
    ///
    /// The last segment is the module name; everything before it is the
    /// directory chain, starting with the method group. Empty segments are
    /// ignored. Validation happens when the table is built.
    pub fn insert(&mut self, location: &str, module: HandlerModule) -> &mut Self {
        let segments = split_location(location);
        let origin = segments.join("/");
        let Some((name, dirs)) = segments.split_last() else {
            self.root.modules.push(ModuleFile {
                name: String::new(),
                origin,
                module,
            });
            return self;
        };
        self.root.descend(dirs).modules.push(ModuleFile {
            name: (*name).to_string(),
            origin,
            module,
        });
        self
    }

    /// Ensure a directory exists, even if it holds no modules.
    pub fn ensure_dir(&mut self, location: &str) -> &mut Self {
        let segments = split_location(location);
        self.root.descend(&segments);
        self
    }

    pub fn module_count(&self) -> usize {
        self.root.module_count()
    }
}

/// Explicit `location → module` declarations.
///
/// This is the startup manifest: every module a deployment may serve is
/// registered here once, then laid out as a tree.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, HandlerModule>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. A later registration at the same location replaces
    /// the earlier one.
    pub fn register(&mut self, location: &str, module: HandlerModule) -> &mut Self {
        if let Some(_previous) = self
            .modules
            .insert(split_location(location).join("/"), module)
        {
            tracing::warn!(location, "Module registered twice, keeping the last one");
        }
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub(crate) fn take(&mut self, location: &str) -> Option<HandlerModule> {
        self.modules.remove(location)
    }

    /// Lay out every registered module as a declared tree.
    pub fn into_tree(self) -> RouteTree {
        let mut tree = RouteTree::new();
        for (location, module) in self.modules {
            tree.insert(&location, module);
        }
        tree
    }
}

pub(crate) fn split_location(location: &str) -> Vec<&str> {
    location.split('/').filter(|s| !s.is_empty()).collect()
}
