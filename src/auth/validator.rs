//! Bearer-token extraction and validation entry point.

// self
use crate::{
	_prelude::*,
	auth::{claims::IdentityClaims, policy::TokenValidationPolicy},
	error::AuthError,
};

/// Validates raw authorization header values against a configured policy.
///
/// The validator owns the structural stage (bearer extraction, three-segment split,
/// payload decode); claim acceptance is delegated to the policy so local and remote
/// strategies stay swappable.
#[derive(Clone)]
pub struct TokenValidator {
	policy: Arc<dyn TokenValidationPolicy>,
}
impl TokenValidator {
	/// Creates a validator delegating claim acceptance to `policy`.
	pub fn new(policy: Arc<dyn TokenValidationPolicy>) -> Self {
		Self { policy }
	}

	/// Validates the raw `Authorization` header value and returns the trusted claims.
	pub async fn validate(
		&self,
		authorization: Option<&str>,
		expected_audience: &str,
	) -> Result<IdentityClaims> {
		let raw = bearer_value(authorization).ok_or(AuthError::MissingToken)?;
		let claims = IdentityClaims::decode(raw)
			.map_err(|source| AuthError::MalformedToken { source })?;

		self.policy.check(raw, &claims, expected_audience, OffsetDateTime::now_utc()).await?;

		Ok(claims)
	}
}
impl Debug for TokenValidator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenValidator(..)")
	}
}

/// Extracts the token from a header value, tolerating an optional `Bearer` scheme prefix.
///
/// Some gateways forward the raw ID token while browsers send `Bearer <token>`; both
/// shapes are accepted. Blank values count as missing.
fn bearer_value(authorization: Option<&str>) -> Option<&str> {
	let value = authorization?.trim();
	let value = match value.split_once(char::is_whitespace) {
		Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim_start(),
		_ => value,
	};

	if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{encode_test_token, test_claims},
		auth::policy::LocalClaimsPolicy,
	};

	fn validator() -> TokenValidator {
		TokenValidator::new(Arc::new(LocalClaimsPolicy::default()))
	}

	#[test]
	fn bearer_values_are_extracted_with_and_without_scheme() {
		assert_eq!(bearer_value(Some("abc.def.ghi")), Some("abc.def.ghi"));
		assert_eq!(bearer_value(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
		assert_eq!(bearer_value(Some("bearer   abc.def.ghi")), Some("abc.def.ghi"));
		assert_eq!(bearer_value(Some("   ")), None);
		assert_eq!(bearer_value(None), None);
	}

	#[tokio::test]
	async fn missing_header_is_a_missing_token() {
		let err = validator().validate(None, "client-1").await.unwrap_err();

		assert!(matches!(err, Error::Auth(AuthError::MissingToken)));
		assert_eq!(err.status_code(), 400);
	}

	#[tokio::test]
	async fn malformed_values_are_structural_failures() {
		let err = validator().validate(Some("not-a-token"), "client-1").await.unwrap_err();

		assert!(matches!(err, Error::Auth(AuthError::MalformedToken { .. })));
		assert_eq!(err.status_code(), 400);
	}

	#[tokio::test]
	async fn valid_tokens_yield_trusted_claims() {
		let token = encode_test_token(&test_claims("client-1", "user-123", 4_000_000_000));
		let claims = validator()
			.validate(Some(&token), "client-1")
			.await
			.expect("Valid token should validate.");

		assert_eq!(claims.sub, "user-123");
	}
}
