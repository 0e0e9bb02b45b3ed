//! Broker-level error types shared across handlers, policies, and signers.

// self
use crate::{_prelude::*, auth::IdentifierError};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
///
/// Every variant carries the layer that produced it; [`Error::status_code`] is the single
/// place that decides how a failure surfaces at the handler boundary.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token validation failure.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Local configuration problem; operator-fixable, never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Caller supplied a missing or malformed request payload.
	#[error(transparent)]
	Input(#[from] InputError),
	/// Cryptographic or credential-fetch failure while producing a signed URL.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Identity provider rejected or mangled an exchange.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
}
impl Error {
	/// Status code emitted when this error crosses the handler boundary.
	///
	/// Caller-input problems map to 400, credential problems to 401, and everything the
	/// caller cannot fix (configuration, upstream, signing, transport) to 500.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::Auth(error) => error.status_code(),
			Self::Input(_) => 400,
			Self::Config(_) | Self::Signing(_) | Self::Transport(_) | Self::Upstream(_) => 500,
		}
	}
}

/// Configuration and validation failures raised at gateway construction.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required configuration value was absent or blank.
	#[error("Missing required configuration value `{name}`.")]
	MissingValue {
		/// Environment-style key of the missing value.
		name: &'static str,
	},
	/// A configuration value failed URL parsing.
	#[error("Configuration value `{name}` is not a valid URL.")]
	InvalidUrl {
		/// Environment-style key of the offending value.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Remote validation was selected without an introspection endpoint.
	#[error("Remote token validation requires an introspection endpoint.")]
	MissingIntrospectionEndpoint,
	/// The validation mode string matched no known policy.
	#[error("Unknown token validation mode `{value}`.")]
	UnknownValidationMode {
		/// Value supplied by the environment.
		value: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Delegated storage credentials could not be resolved.
	#[error("Storage credentials are unavailable.")]
	Credentials {
		/// Underlying credential provider failure.
		#[source]
		source: BoxError,
	},
	/// The configured storage region could not be interpreted.
	#[error("Storage region `{value}` is invalid.")]
	InvalidRegion {
		/// Region string supplied by the environment.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Caller-input failures; the request must be corrected, never retried as-is.
#[derive(Debug, ThisError)]
pub enum InputError {
	/// Request body was absent or blank.
	#[error("Request body is empty.")]
	EmptyBody,
	/// Request body could not be parsed into the operation's payload.
	#[error("Request body is not a valid payload for this operation.")]
	MalformedBody {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A required body field was missing or blank.
	#[error("Request body field `{name}` is missing or empty.")]
	MissingField {
		/// JSON field name.
		name: &'static str,
	},
	/// The supplied object name is not a single storage path segment.
	#[error("Object name is not usable as a storage path segment.")]
	InvalidObjectName(#[from] IdentifierError),
}

/// Token validation failures.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// No bearer value was present on the request.
	#[error("Authorization header does not carry an ID token.")]
	MissingToken,
	/// The bearer value is not a decodable three-segment token.
	#[error("ID token is malformed.")]
	MalformedToken {
		/// Structural defect detected while decoding.
		#[source]
		source: TokenParseError,
	},
	/// The token issuer is not the trusted provider.
	#[error("ID token issuer is not trusted.")]
	InvalidIssuer,
	/// The token expiry instant is not strictly in the future.
	#[error("ID token is expired.")]
	TokenExpired,
	/// The token audience does not match the configured client identifier.
	#[error("ID token audience does not match the configured client.")]
	InvalidAudience,
	/// The token subject cannot namespace storage access.
	#[error("ID token subject is not usable as a storage namespace.")]
	InvalidSubject(#[from] IdentifierError),
	/// The remote verification endpoint did not accept the token.
	#[error("Remote verification endpoint rejected the ID token.")]
	RemoteVerificationFailed {
		/// HTTP status returned by the endpoint, when one was received.
		status: Option<u16>,
	},
}
impl AuthError {
	/// Status code for this failure: 400 for structural defects, 401 for rejected credentials.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::MissingToken | Self::MalformedToken { .. } => 400,
			Self::InvalidIssuer
			| Self::TokenExpired
			| Self::InvalidAudience
			| Self::InvalidSubject(_)
			| Self::RemoteVerificationFailed { .. } => 401,
		}
	}
}

/// Structural defects detected while decoding a raw ID token.
#[derive(Debug, ThisError)]
pub enum TokenParseError {
	/// The value did not split into exactly three dot-separated segments.
	#[error("Expected three dot-separated segments, found {found}.")]
	SegmentCount {
		/// Segment count observed in the raw value.
		found: usize,
	},
	/// The payload segment is not valid base64 in either JWT alphabet.
	#[error("Payload segment is not valid base64.")]
	PayloadEncoding(#[source] base64::DecodeError),
	/// The decoded payload is not a usable claims object.
	#[error("Payload segment is not a valid claims object.")]
	PayloadClaims(#[source] serde_path_to_error::Error<serde_json::Error>),
}

/// Identity-provider failures observed during an exchange or introspection call.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Token endpoint answered with a non-success status.
	///
	/// The provider's raw payload is surfaced unchanged; this is a server-to-server
	/// diagnostic path.
	#[error("Token endpoint rejected the exchange ({status}): {body}")]
	ExchangeFailed {
		/// HTTP status returned by the provider.
		status: u16,
		/// Raw response payload as received.
		body: String,
	},
	/// Token endpoint answered success but the payload could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	ExchangeResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status that accompanied the malformed payload.
		status: u16,
	},
}

/// Signed-URL production failures.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// The private signing key could not be fetched or was empty.
	///
	/// The display string stays generic on purpose; fetch details live only in the
	/// source chain and must never reach callers.
	#[error("Signing key is unavailable.")]
	KeyUnavailable {
		/// Underlying fetch failure, when one exists.
		#[source]
		source: Option<BoxError>,
	},
	/// The fetched PEM material is not a usable RSA private key.
	#[error("Signing key is not a usable RSA private key.")]
	KeyParse {
		/// Underlying decoding failure.
		#[source]
		source: BoxError,
	},
	/// The canned policy could not be serialized.
	#[error("Access policy could not be serialized.")]
	Policy {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// The signature primitive failed.
	#[error("Signature computation failed.")]
	Signature {
		/// Underlying cryptographic failure.
		#[source]
		source: rsa::signature::Error,
	},
	/// The presigning backend reported a failure.
	#[error("Presigning backend failed.")]
	Presign {
		/// Underlying backend failure.
		#[source]
		source: BoxError,
	},
	/// A produced URL string failed final parsing.
	#[error("Signed URL could not be assembled.")]
	UrlAssembly {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl SigningError {
	/// Wraps a key-fetch failure inside [`SigningError::KeyUnavailable`].
	pub fn key_unavailable(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::KeyUnavailable { source: Some(Box::new(src)) }
	}

	/// Wraps a presigning backend failure inside [`SigningError::Presign`].
	pub fn presign(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Presign { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_codes_follow_the_boundary_taxonomy() {
		assert_eq!(Error::from(ConfigError::MissingValue { name: "endpoint" }).status_code(), 500);
		assert_eq!(Error::from(InputError::EmptyBody).status_code(), 400);
		assert_eq!(Error::from(AuthError::MissingToken).status_code(), 400);
		assert_eq!(Error::from(AuthError::TokenExpired).status_code(), 401);
		assert_eq!(
			Error::from(UpstreamError::ExchangeFailed { status: 400, body: String::new() })
				.status_code(),
			500,
		);
		assert_eq!(Error::from(SigningError::KeyUnavailable { source: None }).status_code(), 500);
	}

	#[test]
	fn key_unavailable_display_leaks_no_fetch_detail() {
		let error = SigningError::key_unavailable(std::io::Error::other("bucket timeout"));

		assert_eq!(error.to_string(), "Signing key is unavailable.");
	}
}
