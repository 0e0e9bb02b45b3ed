//! `POST /token`: authorization-code exchange handler.

// self
use crate::{
	_prelude::*,
	error::InputError,
	event::{HttpEvent, HttpResponse},
	handlers::{Gateway, respond},
	http::TokenEndpointClient,
	obs::{self, HandlerKind, HandlerOutcome, HandlerSpan},
};

/// Request payload for the token exchange operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenExchangeRequest {
	/// Authorization code returned by the provider's consent redirect.
	pub code: String,
}

/// Success payload for the token exchange operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenExchangeResponse {
	/// ID token issued for the authenticated subject.
	#[serde(rename = "idToken")]
	pub id_token: String,
}

impl<C> Gateway<C>
where
	C: ?Sized + TokenEndpointClient,
{
	/// Exchanges the caller's authorization code and returns the ID token.
	pub async fn handle_token(&self, event: &HttpEvent) -> HttpResponse {
		const KIND: HandlerKind = HandlerKind::TokenExchange;

		let span = HandlerSpan::new(KIND, "handle_token");

		obs::record_handler_outcome(KIND, HandlerOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request: TokenExchangeRequest = event.json_body()?;

				if request.code.trim().is_empty() {
					return Err(InputError::MissingField { name: "code" }.into());
				}

				let grant = self.exchange_code(request.code.trim()).await?;

				Ok(HttpResponse::json(
					200,
					&TokenExchangeResponse { id_token: grant.id_token.expose().to_owned() },
				))
			})
			.await;

		respond(KIND, result)
	}
}
