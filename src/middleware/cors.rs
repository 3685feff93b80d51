// CORS and method policy
//
// One policy value is layered onto both media routes. Unlike tower-http's
// `CorsLayer` it answers every `OPTIONS`, with or without an `Origin`, and
// stamps the headers on rejections too.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tracing::debug;

use crate::types::ApiError;

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
    allow_headers: HeaderValue,
    /// Methods the handlers accept. `OPTIONS` is always answered by the policy.
    methods: Vec<Method>,
}

impl CorsPolicy {
    pub fn new(methods: Vec<Method>) -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
            allow_headers: HeaderValue::from_static("Content-Type"),
            methods,
        }
    }

    /// Policy for the sign-upload and delete-image endpoints.
    pub fn media() -> Self {
        Self::new(vec![Method::POST])
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    fn allow_methods(&self) -> String {
        let mut names: Vec<&str> = self.methods.iter().map(Method::as_str).collect();
        names.push("OPTIONS");
        names.join(", ")
    }

    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        if let Ok(methods) = HeaderValue::from_str(&self.allow_methods()) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, methods);
        }
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
    }
}

async fn enforce(State(policy): State<Arc<CorsPolicy>>, req: Request, next: Next) -> Response {
    let method = req.method().clone();

    let mut response = if method == Method::OPTIONS {
        debug!("Answering preflight for {}", req.uri().path());
        (StatusCode::OK, Body::empty()).into_response()
    } else if !policy.allows(&method) {
        debug!("Rejecting {} {}", method, req.uri().path());
        ApiError::MethodNotAllowed.into_response()
    } else {
        next.run(req).await
    };

    policy.apply(response.headers_mut());
    response
}

pub fn apply_cors<S>(router: Router<S>, policy: CorsPolicy) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(Arc::new(policy), enforce))
}
