//! ID-token payload model and structural decoding.
//!
//! A raw ID token is a compact three-segment structure (`header.payload.signature`) that
//! stays opaque to this crate except for the payload: the claims below are decoded once
//! per request and discarded. Decoding tolerates both JWT base64 alphabets and ignores
//! padding, matching what federated providers actually emit.

// crates.io
use base64::{
	Engine as _,
	engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
};
// self
use crate::{_prelude::*, error::TokenParseError};

/// Claims asserted by a federated-provider ID token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
	/// Issuer URL of the signing provider.
	pub iss: String,
	/// Audience; expected to equal the configured client identifier.
	pub aud: String,
	/// Expiry instant in epoch seconds.
	pub exp: i64,
	/// Stable subject identifier assigned by the provider.
	pub sub: String,
	/// Email address asserted for the subject.
	pub email: String,
}
impl IdentityClaims {
	/// Decodes the payload segment of a raw three-segment token.
	pub fn decode(raw: &str) -> Result<Self, TokenParseError> {
		let segments: Vec<&str> = raw.split('.').collect();

		if segments.len() != 3 {
			return Err(TokenParseError::SegmentCount { found: segments.len() });
		}

		let payload = decode_segment(segments[1]).map_err(TokenParseError::PayloadEncoding)?;
		let mut deserializer = serde_json::Deserializer::from_slice(&payload);

		serde_path_to_error::deserialize(&mut deserializer).map_err(TokenParseError::PayloadClaims)
	}

	/// Returns `true` when the expiry instant is not strictly after `now`.
	///
	/// The claim is expressed in seconds while validation compares milliseconds, so the
	/// claim value is scaled rather than the clock truncated.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		let now_ms = now.unix_timestamp_nanos() / 1_000_000;

		i128::from(self.exp) * 1_000 <= now_ms
	}
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
	let trimmed = segment.trim_end_matches('=');

	URL_SAFE_NO_PAD.decode(trimmed).or_else(|_| STANDARD_NO_PAD.decode(trimmed))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::{encode_test_token, test_claims};

	#[test]
	fn decode_accepts_both_base64_alphabets() {
		let payload = serde_json::to_vec(&test_claims("client-1", "user-1", 2_000_000_000))
			.expect("Claims fixture should serialize.");
		let url_safe = format!("h.{}.s", URL_SAFE_NO_PAD.encode(&payload));
		let standard_padded =
			format!("h.{}.s", base64::engine::general_purpose::STANDARD.encode(&payload));

		assert!(IdentityClaims::decode(&url_safe).is_ok());
		assert!(IdentityClaims::decode(&standard_padded).is_ok());
	}

	#[test]
	fn decode_rejects_wrong_segment_counts() {
		assert!(matches!(
			IdentityClaims::decode("only-one-segment"),
			Err(TokenParseError::SegmentCount { found: 1 }),
		));
		assert!(matches!(
			IdentityClaims::decode("a.b.c.d"),
			Err(TokenParseError::SegmentCount { found: 4 }),
		));
	}

	#[test]
	fn decode_rejects_non_base64_and_non_claim_payloads() {
		assert!(matches!(
			IdentityClaims::decode("h.!!!.s"),
			Err(TokenParseError::PayloadEncoding(_)),
		));

		let not_claims = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"{\"iss\":\"x\"}"));

		assert!(matches!(
			IdentityClaims::decode(&not_claims),
			Err(TokenParseError::PayloadClaims(_)),
		));
	}

	#[test]
	fn expiry_check_is_strict() {
		let claims = IdentityClaims {
			iss: "https://accounts.google.com".into(),
			aud: "client-1".into(),
			exp: 1_700_000_000,
			sub: "user-1".into(),
			email: "user@example.com".into(),
		};
		let at_expiry = OffsetDateTime::from_unix_timestamp(1_700_000_000)
			.expect("Expiry fixture should be a valid instant.");

		assert!(claims.is_expired_at(at_expiry));
		assert!(claims.is_expired_at(at_expiry + Duration::seconds(1)));
		assert!(!claims.is_expired_at(at_expiry - Duration::seconds(1)));
	}

	#[test]
	fn round_trips_through_the_test_encoder() {
		let token = encode_test_token(&test_claims("client-7", "user-7", 2_000_000_000));
		let claims = IdentityClaims::decode(&token).expect("Encoded token should decode.");

		assert_eq!(claims.aud, "client-7");
		assert_eq!(claims.sub, "user-7");
	}
}
