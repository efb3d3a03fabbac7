use crate::errors::ServerError;
use http::header::{CACHE_CONTROL, CONTENT_TYPE};
use http::{Method, Uri};
use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use resolver::{IndexError, IndexResolver};
use shared::http::{full_body, make_boxed_error_response, make_text_response};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type ServerBody = BoxBody<Bytes, ServerError>;

/// Serves the resolved index document of a single app on every path.
pub struct IndexService {
    resolver: IndexResolver,
    app_name: Arc<str>,
}

impl IndexService {
    pub fn new(resolver: IndexResolver, app_name: &str) -> Self {
        IndexService {
            resolver,
            app_name: Arc::from(app_name),
        }
    }
}

// The request body is never read, so any body type is accepted.
impl<B> Service<Request<B>> for IndexService {
    type Response = Response<ServerBody>;
    type Error = ServerError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let resolver = self.resolver.clone();
        let app_name = self.app_name.clone();
        let (parts, _body) = req.into_parts();

        Box::pin(async move { serve_index(&resolver, &app_name, &parts.method, &parts.uri).await })
    }
}

pub async fn serve_index(
    resolver: &IndexResolver,
    app_name: &str,
    method: &Method,
    uri: &Uri,
) -> Result<Response<ServerBody>, ServerError> {
    if method != Method::GET && method != Method::HEAD {
        return Ok(make_boxed_error_response(StatusCode::METHOD_NOT_ALLOWED));
    }

    let query = parse_query(uri);

    match resolver.resolve(app_name, &query).await {
        Ok(html) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .header(CACHE_CONTROL, "no-cache")
            .body(full_body(html))?),
        Err(err) => Ok(make_text_response(error_status(&err), err.to_string())),
    }
}

fn error_status(err: &IndexError) -> StatusCode {
    match err {
        _ if err.is_critical() => StatusCode::SERVICE_UNAVAILABLE,
        IndexError::StoreTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::NOT_FOUND,
    }
}

/// Decodes the query string. The first occurrence of a repeated parameter wins.
fn parse_query(uri: &Uri) -> HashMap<String, String> {
    let mut params = HashMap::new();

    if let Some(query) = uri.query() {
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }

    params
}
