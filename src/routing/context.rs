//! Per-request context handed to every chain stage.

use axum::body::Body;
use axum::http::{Extensions, HeaderMap, Method, Request, Uri};
use serde::de::DeserializeOwned;

use crate::routing::ChainError;

/// Owns the inbound request for the lifetime of one chain execution.
///
/// Middleware receive `&mut RequestContext` and may attach typed values via
/// [`RequestContext::extensions_mut`]; the handler receives the context by
/// value once every middleware has proceeded.
#[derive(Debug)]
pub struct RequestContext {
    request: Request<Body>,
}

impl RequestContext {
    pub fn new(request: Request<Body>) -> Self {
        Self { request }
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    pub fn extensions(&self) -> &Extensions {
        self.request.extensions()
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        self.request.extensions_mut()
    }

    /// Value of the named cookie, if the request carries it.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get_all(axum::http::header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.trim_matches('"'))
    }

    /// Take the request body, leaving an empty one behind.
    pub fn take_body(&mut self) -> Body {
        std::mem::take(self.request.body_mut())
    }

    /// Read at most `limit` bytes of body and decode them as JSON.
    ///
    /// Returns `Ok(Err(_))` when the body is readable but not valid JSON for
    /// `T`, so handlers can answer 400 instead of failing the chain.
    pub async fn json<T: DeserializeOwned>(
        &mut self,
        limit: usize,
    ) -> Result<Result<T, serde_json::Error>, ChainError> {
        let bytes = axum::body::to_bytes(self.take_body(), limit).await?;
        Ok(serde_json::from_slice(&bytes))
    }
}
