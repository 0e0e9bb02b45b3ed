//! HTTP-shaped boundary contract, decoupled from any hosting runtime's event type.
//!
//! Handlers consume [`HttpEvent`] and produce [`HttpResponse`]; the provisioning layer
//! adapts whatever event shape its runtime delivers. Header lookup is case-insensitive
//! because gateways do not agree on header casing.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::InputError};

/// Inbound request event: a header map and an optional raw body.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HttpEvent {
	/// Request headers as delivered by the hosting runtime.
	pub headers: HashMap<String, String>,
	/// Raw request body, when one was sent.
	pub body: Option<String>,
}
impl HttpEvent {
	/// Creates an empty event.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Sets the raw body.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Returns a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Parses the body as the operation's JSON payload.
	pub fn json_body<T>(&self) -> Result<T, InputError>
	where
		T: DeserializeOwned,
	{
		let body = self
			.body
			.as_deref()
			.map(str::trim)
			.filter(|body| !body.is_empty())
			.ok_or(InputError::EmptyBody)?;
		let mut deserializer = serde_json::Deserializer::from_str(body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| InputError::MalformedBody { source })
	}
}

/// Outbound response: a status code and a JSON body string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status_code: u16,
	/// JSON-encoded response body.
	pub body: String,
}
impl HttpResponse {
	/// Serializes `payload` into a response with the provided status.
	pub fn json<T>(status_code: u16, payload: &T) -> Self
	where
		T: Serialize,
	{
		match serde_json::to_string(payload) {
			Ok(body) => Self { status_code, body },
			Err(_) => Self {
				status_code: 500,
				body: r#"{"message":"Response serialization failed."}"#.to_owned(),
			},
		}
	}

	/// Converts a broker error into its boundary status/body pair.
	pub fn from_error(error: &Error) -> Self {
		Self::json(error.status_code(), &MessageBody { message: error.to_string() })
	}

	/// Response for routes the dispatcher does not know.
	pub fn not_found() -> Self {
		Self::json(404, &MessageBody { message: "Not found.".to_owned() })
	}
}

/// Body shape shared by error and informational responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageBody {
	/// Human-readable message.
	pub message: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::AuthError;

	#[derive(Debug, Deserialize)]
	struct NamedPayload {
		name: String,
	}

	#[test]
	fn header_lookup_ignores_case() {
		let event = HttpEvent::new().with_header("Authorization", "token-value");

		assert_eq!(event.header("authorization"), Some("token-value"));
		assert_eq!(event.header("AUTHORIZATION"), Some("token-value"));
		assert_eq!(event.header("content-type"), None);
	}

	#[test]
	fn empty_and_blank_bodies_are_rejected() {
		assert!(matches!(
			HttpEvent::new().json_body::<NamedPayload>(),
			Err(InputError::EmptyBody),
		));
		assert!(matches!(
			HttpEvent::new().with_body("   ").json_body::<NamedPayload>(),
			Err(InputError::EmptyBody),
		));
	}

	#[test]
	fn malformed_bodies_surface_the_parse_path() {
		let err = HttpEvent::new()
			.with_body(r#"{"wrong":"field"}"#)
			.json_body::<NamedPayload>()
			.unwrap_err();

		assert!(matches!(err, InputError::MalformedBody { .. }));
	}

	#[test]
	fn well_formed_bodies_parse() {
		let payload: NamedPayload = HttpEvent::new()
			.with_body(r#"{"name":"photo.png"}"#)
			.json_body()
			.expect("Well-formed body should parse.");

		assert_eq!(payload.name, "photo.png");
	}

	#[test]
	fn error_responses_carry_status_and_message() {
		let response = HttpResponse::from_error(&Error::from(AuthError::TokenExpired));

		assert_eq!(response.status_code, 401);
		assert_eq!(response.body, r#"{"message":"ID token is expired."}"#);
	}
}
