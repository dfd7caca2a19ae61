//! Browser Transport
//!
//! `fetch`-based transport via gloo-net.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};

use super::request::{ApiRequest, ApiResponse, Method};
use super::Transport;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTransport;

fn builder_for(method: Method, url: &str) -> RequestBuilder {
    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Put => Request::put(url),
        Method::Delete => Request::delete(url),
    }
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, url: String, request: ApiRequest) -> ApiResult<ApiResponse> {
        let mut builder = builder_for(request.method, &url).header("Accept", "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }
        let signal = request.cancel.as_ref().and_then(|c| c.abort_signal());
        builder = builder.abort_signal(signal.as_ref());

        let sent = match &request.body {
            Some(body) => {
                builder
                    .json(body)
                    .map_err(|e| ApiError::Network(e.to_string()))?
                    .send()
                    .await
            }
            None => builder.send().await,
        };
        let response = sent.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}
