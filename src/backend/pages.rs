//! Named page responses.

use std::path::PathBuf;

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::backend::BackendError;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Shelf - Sign in</title></head>
<body>
<h1>Shelf</h1>
<form id="login"><input name="username"><input name="password" type="password"><button>Sign in</button></form>
</body>
</html>"#;

const HOME_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Shelf - Library</title></head>
<body>
<h1>Your library</h1>
<ul id="books"></ul>
<script>fetch("/api/books").then(r => r.json()).then(console.log)</script>
</body>
</html>"#;

const ADMIN_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Shelf - Admin</title></head>
<body>
<h1>Administration</h1>
<table id="users"></table>
</body>
</html>"#;

/// Writes the response for a logical page name such as `home.html`.
#[async_trait]
pub trait PageResponder: Send + Sync {
    async fn respond(&self, name: &str) -> Result<Response, BackendError>;
}

/// Serves pages from a directory, falling back to the built-in pages.
#[derive(Debug, Clone, Default)]
pub struct DirectoryPages {
    root: Option<PathBuf>,
}

impl DirectoryPages {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn embedded(name: &str) -> Option<&'static str> {
        match name {
            "index.html" => Some(INDEX_HTML),
            "home.html" => Some(HOME_HTML),
            "admin.html" => Some(ADMIN_HTML),
            _ => None,
        }
    }
}

fn content_type(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl PageResponder for DirectoryPages {
    async fn respond(&self, name: &str) -> Result<Response, BackendError> {
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return Err(BackendError::InvalidInput(format!("bad page name `{name}`")));
        }

        if let Some(root) = &self.root {
            match tokio::fs::read(root.join(name)).await {
                Ok(bytes) => {
                    return Ok(([(header::CONTENT_TYPE, content_type(name))], bytes).into_response());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(BackendError::Unavailable(e.to_string())),
            }
        }

        Ok(match Self::embedded(name) {
            Some(html) => ([(header::CONTENT_TYPE, content_type(name))], html).into_response(),
            None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
        })
    }
}
