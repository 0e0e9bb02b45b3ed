//! Turnkey access broker for federated image storage - validate provider-issued ID tokens,
//! exchange authorization codes, and mint time-limited upload/delivery URLs in one crate built
//! for stateless request/response hosting.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod exchange;
pub mod handlers;
pub mod http;
pub mod obs;
pub mod sign;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience helpers for unit and integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::policy::GOOGLE_ISSUER,
		config::GatewayConfig,
		error::SigningError,
		sign::{PresignFuture, StoragePresigner},
	};
	#[cfg(feature = "reqwest")]
	use crate::{
		handlers::Gateway,
		http::ReqwestHttpClient,
		sign::{KeySource, StaticKeySource},
	};

	/// Gateway type alias used by reqwest-backed tests.
	#[cfg(feature = "reqwest")]
	pub type ReqwestTestGateway = Gateway<ReqwestHttpClient>;

	/// Presigner stub that renders deterministic upload URLs without touching SigV4.
	#[derive(Clone, Debug, Default)]
	pub struct StubPresigner;
	impl StoragePresigner for StubPresigner {
		fn presign_put<'a>(&'a self, key: &'a str, validity_secs: u32) -> PresignFuture<'a, Url> {
			Box::pin(async move {
				Url::parse(&format!("https://stub.storage.example/{key}?X-Amz-Expires={validity_secs}"))
					.map_err(|source| SigningError::UrlAssembly { source })
			})
		}
	}

	/// Encodes an unsigned three-segment ID token around the provided JSON claims payload.
	pub fn encode_test_token(claims: &serde_json::Value) -> String {
		// crates.io
		use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());

		format!("{header}.{payload}.test-signature")
	}

	/// Claims payload the local policy accepts for the provided audience/subject pair.
	pub fn test_claims(audience: &str, subject: &str, expires_at: i64) -> serde_json::Value {
		serde_json::json!({
			"iss": GOOGLE_ISSUER,
			"aud": audience,
			"exp": expires_at,
			"sub": subject,
			"email": "user@example.com",
		})
	}

	/// Configuration fixture carrying every required value.
	pub fn test_config(token_endpoint: &str) -> GatewayConfig {
		GatewayConfig::builder()
			.token_endpoint(
				Url::parse(token_endpoint).expect("Test token endpoint should parse successfully."),
			)
			.client_id("client-test")
			.client_secret("secret-test")
			.redirect_uri(
				Url::parse("http://localhost:3000").expect("Test redirect URI should parse."),
			)
			.bucket_name("image-bucket-test")
			.key_bucket_name("key-bucket-test")
			.domain_name("images.example.com")
			.key_pair_id("KTESTPAIRID")
			.region("us-east-1")
			.build()
			.expect("Test configuration should validate successfully.")
	}

	/// Assembles a gateway around a static key source and the stub presigner.
	#[cfg(feature = "reqwest")]
	pub fn build_test_gateway(config: GatewayConfig, key_pem: &str) -> ReqwestTestGateway {
		let key_source: Arc<dyn KeySource> = Arc::new(StaticKeySource::new(key_pem));

		Gateway::with_parts(
			config,
			Arc::new(ReqwestHttpClient::default()),
			key_source,
			Arc::new(StubPresigner),
		)
		.expect("Test gateway should assemble successfully.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
