//! Backend API Client
//!
//! Frontend bindings to the NTU-CODER REST backend, organized by concern.
//! Every request carries the stored bearer token and is reported to the
//! progress indicator; a 401 on an authenticated call tears the session down.

mod cancel;
mod http;
mod request;
mod resources;

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::credentials::CredentialStore;
use crate::error::{extract_error_message, ApiError, ApiResult};
use crate::progress::RequestObserver;

pub use cancel::{CancelToken, LatestOnly, Ticket};
pub use http::GlooTransport;
pub use request::{ApiRequest, ApiResponse, Method};
pub use resources::ResourceKind;

/// Sends a fully-built request. Only transport failures are errors here;
/// status handling belongs to [`ApiClient`].
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, url: String, request: ApiRequest) -> ApiResult<ApiResponse>;
}

struct ClientInner {
    base_url: String,
    transport: Rc<dyn Transport>,
    credentials: Rc<dyn CredentialStore>,
    observer: Rc<dyn RequestObserver>,
    on_unauthorized: RefCell<Option<Rc<dyn Fn()>>>,
}

/// Configured HTTP client shared by every view
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<ClientInner>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        transport: Rc<dyn Transport>,
        credentials: Rc<dyn CredentialStore>,
        observer: Rc<dyn RequestObserver>,
    ) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                base_url: base_url.trim_end_matches('/').to_string(),
                transport,
                credentials,
                observer,
                on_unauthorized: RefCell::new(None),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn credentials(&self) -> Rc<dyn CredentialStore> {
        self.inner.credentials.clone()
    }

    /// Called whenever an authenticated request comes back 401
    pub fn set_unauthorized_handler(&self, handler: impl Fn() + 'static) {
        *self.inner.on_unauthorized.borrow_mut() = Some(Rc::new(handler));
    }

    pub async fn send(&self, mut request: ApiRequest) -> ApiResult<ApiResponse> {
        if !request.anonymous && request.bearer.is_none() {
            request.bearer = self.inner.credentials.token();
        }
        let authenticated = request.bearer.is_some();
        let cancel = request.cancel.clone();
        let method = request.method;
        let url = request.url(&self.inner.base_url);

        log::debug!("[API] {} {}", method.as_str(), url);
        self.inner.observer.request_started();
        let result = self.inner.transport.send(url.clone(), request).await;
        self.inner.observer.request_finished();

        if cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            log::debug!("[API] {} {} cancelled", method.as_str(), url);
            return Err(ApiError::Cancelled);
        }

        let response = result.inspect_err(|e| log::warn!("[API] {} {} failed: {}", method.as_str(), url, e))?;
        match response.status {
            200..=299 => Ok(response),
            401 => {
                log::warn!("[API] {} {} -> 401", method.as_str(), url);
                if authenticated {
                    let handler = self.inner.on_unauthorized.borrow().clone();
                    if let Some(handler) = handler {
                        handler();
                    }
                }
                Err(ApiError::Unauthorized)
            }
            status => {
                log::warn!("[API] {} {} -> {}", method.as_str(), url, status);
                Err(ApiError::Status {
                    status,
                    message: extract_error_message(&response.body),
                })
            }
        }
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        self.send(request).await?.json()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::credentials::MemoryCredentials;
    use serde_json::json;

    #[tokio::test]
    async fn test_attaches_bearer_and_reports_progress() {
        let transport = MockTransport::new(|request| {
            assert_eq!(request.bearer.as_deref(), Some("tok"));
            respond(200, json!({ "ok": true }))
        });
        let h = harness(transport.clone(), MemoryCredentials::with_token("tok"));

        let value: serde_json::Value = h.client.send_json(ApiRequest::get("/api/auth/me")).await.unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(transport.calls(), vec!["GET http://api.test/api/auth/me"]);
        assert_eq!(h.tracker.total_started(), 1);
        assert_eq!(h.tracker.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_request_skips_token() {
        let transport = MockTransport::new(|request| {
            assert!(request.bearer.is_none());
            respond(200, json!({}))
        });
        let h = harness(transport, MemoryCredentials::with_token("tok"));
        h.client.send(ApiRequest::post("/api/auth/login", json!({})).anonymous()).await.unwrap();
    }

    #[tokio::test]
    async fn test_401_with_credential_fires_handler() {
        let transport = MockTransport::new(|_| respond(401, json!({})));
        let h = harness(transport, MemoryCredentials::with_token("expired"));

        let err = h.client.send(ApiRequest::get("/api/Course")).await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(h.unauthorized.get(), 1);
    }

    #[tokio::test]
    async fn test_401_without_credential_does_not_fire_handler() {
        let transport = MockTransport::new(|_| respond(401, json!({ "message": "Wrong password" })));
        let h = harness(transport, MemoryCredentials::default());

        let err = h.client.send(ApiRequest::post("/api/auth/login", json!({}))).await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(h.unauthorized.get(), 0);
    }

    #[tokio::test]
    async fn test_error_status_carries_server_message() {
        let transport = MockTransport::new(|_| respond(400, json!({ "message": "Title is required" })));
        let h = harness(transport, MemoryCredentials::default());

        let err = h.client.send(ApiRequest::put("/api/Course/1", json!({}))).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status { status: 400, message: Some("Title is required".into()) }
        );
    }

    #[tokio::test]
    async fn test_cancelled_request_reports_cancelled() {
        let token = CancelToken::new();
        let cancel = token.clone();
        let transport = MockTransport::new(move |_| {
            cancel.cancel();
            respond(200, json!({}))
        });
        let h = harness(transport, MemoryCredentials::default());

        let err = h
            .client
            .send(ApiRequest::get("/api/Course").with_cancel(Some(token)))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Cancelled);
        assert_eq!(h.tracker.in_flight(), 0);
    }
}
