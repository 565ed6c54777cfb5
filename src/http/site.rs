use bytes::Bytes;
use std::time::Duration;

use crate::config::Config;
use crate::http::request::Request;
use crate::http::resolver::StaticResolver;
use crate::http::response::Response;

/// Everything a connection needs to answer requests.
///
/// Immutable after construction; one instance is shared by all connections.
#[derive(Debug, Clone)]
pub struct Site {
    /// `None` answers every request with `greeting`.
    pub resolver: Option<StaticResolver>,
    pub greeting: Bytes,
    pub max_request_bytes: usize,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub chunk_size: usize,
}

impl Site {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            resolver: StaticResolver::from_config(&cfg.static_files),
            greeting: Bytes::from(cfg.greeting.clone()),
            max_request_bytes: cfg.server.max_request_bytes,
            read_timeout: cfg.server.read_timeout(),
            write_timeout: cfg.server.write_timeout(),
            chunk_size: cfg.static_files.chunk_size,
        }
    }

    /// A site that answers every request with `greeting`.
    pub fn greeting(greeting: impl Into<Bytes>) -> Self {
        Self {
            resolver: None,
            greeting: greeting.into(),
            ..Self::from_config(&Config::default())
        }
    }

    /// A site serving files through `resolver`, with default limits.
    pub fn static_files(resolver: StaticResolver) -> Self {
        Self {
            resolver: Some(resolver),
            ..Self::from_config(&Config::default())
        }
    }

    /// Produces the response for one parsed request.
    pub async fn handle(&self, req: &Request) -> Response {
        let Some(resolver) = &self.resolver else {
            return Response::ok(self.greeting.clone());
        };

        match req.path.as_deref() {
            Some(path) => Response::from_resolved(resolver.resolve(path).await),
            None => Response::not_found(),
        }
    }
}

impl Default for Site {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
