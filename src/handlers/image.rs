//! `POST /image`: CDN access URL handler.

// self
use crate::{
	_prelude::*,
	auth::id::{ObjectName, SubjectId},
	error::{AuthError, InputError},
	event::{HttpEvent, HttpResponse},
	handlers::{Gateway, SignedUrlResponse, respond},
	http::TokenEndpointClient,
	obs::{self, HandlerKind, HandlerOutcome, HandlerSpan},
	sign::CdnUrlSigner,
};

/// Request payload for the CDN access operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessUrlRequest {
	/// Object key to read from the caller's namespace.
	#[serde(rename = "objectKey")]
	pub object_key: String,
}

impl<C> Gateway<C>
where
	C: ?Sized + TokenEndpointClient,
{
	/// Issues a short-lived CDN access URL for an object in the validated caller's
	/// namespace.
	///
	/// The signing key is fetched per invocation from the configured key source; wrap
	/// the source in [`crate::sign::CachingKeySource`] to amortize the fetch.
	pub async fn handle_image(&self, event: &HttpEvent) -> HttpResponse {
		const KIND: HandlerKind = HandlerKind::CdnPresign;

		let span = HandlerSpan::new(KIND, "handle_image");

		obs::record_handler_outcome(KIND, HandlerOutcome::Attempt);

		let result = span
			.instrument(async move {
				let claims = self
					.validator
					.validate(event.header("authorization"), &self.config.client_id)
					.await?;
				let subject = SubjectId::new(&claims.sub).map_err(AuthError::from)?;
				let request: AccessUrlRequest = event.json_body()?;
				let object = ObjectName::new(request.object_key.trim()).map_err(InputError::from)?;
				let pem = self.key_source.fetch_key().await?;
				let signer = CdnUrlSigner::from_pem(
					&self.config.domain_name,
					&self.config.key_pair_id,
					pem.expose(),
				)?;
				let signed =
					signer.issue_access_url(&subject, &object, OffsetDateTime::now_utc())?;

				Ok(HttpResponse::json(200, &SignedUrlResponse { url: signed.url.into() }))
			})
			.await;

		respond(KIND, result)
	}
}
