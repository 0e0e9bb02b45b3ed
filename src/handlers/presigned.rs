//! `POST /presigned`: object-storage upload URL handler.

// self
use crate::{
	_prelude::*,
	auth::id::{ObjectName, SubjectId},
	error::{AuthError, InputError},
	event::{HttpEvent, HttpResponse},
	handlers::{Gateway, respond},
	http::TokenEndpointClient,
	obs::{self, HandlerKind, HandlerOutcome, HandlerSpan},
	sign::{UPLOAD_URL_VALIDITY_SECS, namespaced_key},
};

/// Request payload for the upload presigning operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadUrlRequest {
	/// Object name to create inside the caller's namespace.
	pub name: String,
}

/// Success payload shared by both URL-issuing operations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedUrlResponse {
	/// The issued time-limited URL.
	pub url: String,
}

impl<C> Gateway<C>
where
	C: ?Sized + TokenEndpointClient,
{
	/// Issues a presigned PUT URL for an object in the validated caller's namespace.
	pub async fn handle_presigned(&self, event: &HttpEvent) -> HttpResponse {
		const KIND: HandlerKind = HandlerKind::StoragePresign;

		let span = HandlerSpan::new(KIND, "handle_presigned");

		obs::record_handler_outcome(KIND, HandlerOutcome::Attempt);

		let result = span
			.instrument(async move {
				let claims = self
					.validator
					.validate(event.header("authorization"), &self.config.client_id)
					.await?;
				let subject = SubjectId::new(&claims.sub).map_err(AuthError::from)?;
				let request: UploadUrlRequest = event.json_body()?;
				let object = ObjectName::new(request.name.trim()).map_err(InputError::from)?;
				let key = namespaced_key(&subject, &object);
				let url = self.presigner.presign_put(&key, UPLOAD_URL_VALIDITY_SECS).await?;

				Ok(HttpResponse::json(200, &SignedUrlResponse { url: url.into() }))
			})
			.await;

		respond(KIND, result)
	}
}
