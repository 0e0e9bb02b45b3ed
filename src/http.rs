//! Transport primitives for identity-provider endpoint calls.
//!
//! The module exposes [`TokenEndpointClient`] so downstream crates can integrate custom
//! HTTP clients. The trait is the broker's only dependency on an HTTP stack: both the
//! authorization-code exchange and the remote introspection policy go through it, and
//! test suites swap in capturing stubs without touching the handlers.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Byte-level response surfaced by [`TokenEndpointClient`] implementations.
#[derive(Clone, Debug)]
pub struct EndpointResponse {
	/// HTTP status code returned by the endpoint.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl EndpointResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Lossy UTF-8 view of the body, used when payloads are surfaced as diagnostics.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Future alias returned by transport calls.
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of form-POSTing to provider endpoints.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared across
/// concurrent stateless invocations, and must not follow redirects: token endpoints
/// return results directly instead of delegating to another URI.
pub trait TokenEndpointClient
where
	Self: 'static + Send + Sync,
{
	/// POSTs `form` as `application/x-www-form-urlencoded` and returns status plus raw body.
	///
	/// Non-success statuses are not transport failures; callers decide what a 4xx/5xx
	/// means for their operation.
	fn post_form<'a>(
		&'a self,
		endpoint: &'a Url,
		form: &'a BTreeMap<String, String>,
	) -> TransportFuture<'a, EndpointResponse>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenEndpointClient for ReqwestHttpClient {
	fn post_form<'a>(
		&'a self,
		endpoint: &'a Url,
		form: &'a BTreeMap<String, String>,
	) -> TransportFuture<'a, EndpointResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.post(endpoint.clone())
				.form(form)
				.send()
				.await
				.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(EndpointResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn success_covers_the_2xx_range_only() {
		assert!(EndpointResponse { status: 200, body: Vec::new() }.is_success());
		assert!(EndpointResponse { status: 204, body: Vec::new() }.is_success());
		assert!(!EndpointResponse { status: 302, body: Vec::new() }.is_success());
		assert!(!EndpointResponse { status: 400, body: Vec::new() }.is_success());
	}

	#[test]
	fn body_text_is_lossy_not_fallible() {
		let response = EndpointResponse { status: 500, body: vec![0xff, b'o', b'k'] };

		assert!(response.body_text().ends_with("ok"));
	}
}
