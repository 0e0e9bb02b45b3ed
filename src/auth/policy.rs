//! Swappable token validation policies.
//!
//! Two strategies are supported and selected by configuration: a local claim check
//! (issuer, expiry, audience, in that order) and a remote introspection call that
//! delegates acceptance to the provider and then re-applies the local expiry check.
//! Neither strategy verifies the token signature; acceptance is structural and
//! claim-based only.

// self
use crate::{
	_prelude::*,
	auth::claims::IdentityClaims,
	error::AuthError,
	http::TokenEndpointClient,
};

/// Issuer asserted by the federated provider for Google-signed ID tokens.
pub const GOOGLE_ISSUER: &str = "https://accounts.google.com";

/// Future alias returned by policy checks.
pub type PolicyFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a + Send>>;

/// Policy hook that accepts or rejects a decoded ID token.
///
/// Implementors are required to be `Send + Sync` so one policy instance can serve
/// concurrent stateless invocations. The raw token travels alongside the decoded claims
/// because remote strategies forward it verbatim.
pub trait TokenValidationPolicy: Send + Sync {
	/// Checks the token against this policy; `Ok(())` means the claims may be trusted.
	fn check<'a>(
		&'a self,
		raw_token: &'a str,
		claims: &'a IdentityClaims,
		expected_audience: &'a str,
		now: OffsetDateTime,
	) -> PolicyFuture<'a>;
}

/// Local claim check: trusted issuer, strict future expiry, configured audience.
#[derive(Clone, Debug)]
pub struct LocalClaimsPolicy {
	trusted_issuer: String,
}
impl LocalClaimsPolicy {
	/// Creates a policy trusting the provided issuer string.
	pub fn with_trusted_issuer(issuer: impl Into<String>) -> Self {
		Self { trusted_issuer: issuer.into() }
	}
}
impl Default for LocalClaimsPolicy {
	fn default() -> Self {
		Self::with_trusted_issuer(GOOGLE_ISSUER)
	}
}
impl TokenValidationPolicy for LocalClaimsPolicy {
	fn check<'a>(
		&'a self,
		_raw_token: &'a str,
		claims: &'a IdentityClaims,
		expected_audience: &'a str,
		now: OffsetDateTime,
	) -> PolicyFuture<'a> {
		Box::pin(async move {
			// Precedence is part of the contract: issuer, then expiry, then audience.
			if claims.iss != self.trusted_issuer {
				return Err(AuthError::InvalidIssuer.into());
			}
			if claims.is_expired_at(now) {
				return Err(AuthError::TokenExpired.into());
			}
			if claims.aud != expected_audience {
				return Err(AuthError::InvalidAudience.into());
			}

			Ok(())
		})
	}
}

/// Remote introspection policy: the provider endpoint decides, expiry is re-checked locally.
pub struct RemoteIntrospectionPolicy<C>
where
	C: ?Sized + TokenEndpointClient,
{
	endpoint: Url,
	http_client: Arc<C>,
}
impl<C> RemoteIntrospectionPolicy<C>
where
	C: ?Sized + TokenEndpointClient,
{
	/// Creates a policy posting tokens to the provided introspection endpoint.
	pub fn new(endpoint: Url, http_client: Arc<C>) -> Self {
		Self { endpoint, http_client }
	}
}
impl<C> TokenValidationPolicy for RemoteIntrospectionPolicy<C>
where
	C: ?Sized + TokenEndpointClient,
{
	fn check<'a>(
		&'a self,
		raw_token: &'a str,
		claims: &'a IdentityClaims,
		_expected_audience: &'a str,
		now: OffsetDateTime,
	) -> PolicyFuture<'a> {
		Box::pin(async move {
			let mut form = BTreeMap::new();

			form.insert("id_token".to_owned(), raw_token.to_owned());

			let response = self.http_client.post_form(&self.endpoint, &form).await?;

			if response.status != 200 {
				return Err(AuthError::RemoteVerificationFailed {
					status: Some(response.status),
				}
				.into());
			}
			// The endpoint vouched for the token, but a stale acceptance is still useless.
			if claims.is_expired_at(now) {
				return Err(AuthError::TokenExpired.into());
			}

			Ok(())
		})
	}
}
impl<C> Debug for RemoteIntrospectionPolicy<C>
where
	C: ?Sized + TokenEndpointClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RemoteIntrospectionPolicy").field("endpoint", &self.endpoint).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn claims(iss: &str, aud: &str, exp: i64) -> IdentityClaims {
		IdentityClaims {
			iss: iss.into(),
			aud: aud.into(),
			exp,
			sub: "user-1".into(),
			email: "user@example.com".into(),
		}
	}

	fn now() -> OffsetDateTime {
		OffsetDateTime::from_unix_timestamp(1_700_000_000)
			.expect("Clock fixture should be a valid instant.")
	}

	#[tokio::test]
	async fn local_policy_accepts_well_formed_claims() {
		let policy = LocalClaimsPolicy::default();
		let claims = claims(GOOGLE_ISSUER, "client-1", 1_700_000_600);

		policy
			.check("raw", &claims, "client-1", now())
			.await
			.expect("Valid claims should pass the local policy.");
	}

	#[tokio::test]
	async fn local_policy_checks_issuer_before_expiry_before_audience() {
		let policy = LocalClaimsPolicy::default();
		// Everything is wrong; the issuer verdict must win.
		let all_wrong = claims("https://evil.example.com", "other-client", 1);
		let err = policy.check("raw", &all_wrong, "client-1", now()).await.unwrap_err();

		assert!(matches!(err, Error::Auth(AuthError::InvalidIssuer)));

		// Issuer fixed; the expiry verdict must win over the audience mismatch.
		let expired = claims(GOOGLE_ISSUER, "other-client", 1);
		let err = policy.check("raw", &expired, "client-1", now()).await.unwrap_err();

		assert!(matches!(err, Error::Auth(AuthError::TokenExpired)));

		let wrong_audience = claims(GOOGLE_ISSUER, "other-client", 1_700_000_600);
		let err = policy.check("raw", &wrong_audience, "client-1", now()).await.unwrap_err();

		assert!(matches!(err, Error::Auth(AuthError::InvalidAudience)));
	}

	#[tokio::test]
	async fn local_policy_rejects_expiry_at_the_exact_instant() {
		let policy = LocalClaimsPolicy::default();
		let boundary = claims(GOOGLE_ISSUER, "client-1", 1_700_000_000);
		let err = policy.check("raw", &boundary, "client-1", now()).await.unwrap_err();

		assert!(matches!(err, Error::Auth(AuthError::TokenExpired)));
	}
}
