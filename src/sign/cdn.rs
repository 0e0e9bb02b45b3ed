//! CDN canned-policy URL signing.
//!
//! The edge network grants access when a URL carries a signature over a fixed policy
//! (resource + epoch expiry) computed with an RSA private key whose public half is
//! registered under a key-pair identifier. The signature scheme is RSA-SHA1 PKCS#1
//! v1.5 with a base64 variant that swaps the characters CDNs treat as unsafe in query
//! strings.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rsa::{
	RsaPrivateKey,
	pkcs1::DecodeRsaPrivateKey,
	pkcs1v15::SigningKey,
	pkcs8::DecodePrivateKey,
	signature::{SignatureEncoding, Signer},
};
use sha1::Sha1;
// self
use crate::{
	_prelude::*,
	auth::id::{ObjectName, SubjectId},
	error::SigningError,
	sign::{SignedUrl, namespaced_key},
};

/// Validity window applied to every CDN access URL.
///
/// Deliberately short: signed URLs are consumed immediately by the client that just
/// requested them, which keeps the exposure window of a leaked URL small.
pub const ACCESS_URL_VALIDITY: Duration = Duration::seconds(30);

/// Signs subject-scoped access URLs for a single CDN distribution.
pub struct CdnUrlSigner {
	domain_name: String,
	key_pair_id: String,
	signing_key: SigningKey<Sha1>,
}
impl CdnUrlSigner {
	/// Parses the PEM private key and binds it to the distribution domain and key pair.
	///
	/// Both PKCS#8 (`BEGIN PRIVATE KEY`) and PKCS#1 (`BEGIN RSA PRIVATE KEY`) envelopes
	/// are accepted; key tooling emits either depending on its vintage.
	pub fn from_pem(
		domain_name: impl Into<String>,
		key_pair_id: impl Into<String>,
		pem: &str,
	) -> Result<Self, SigningError> {
		let key = RsaPrivateKey::from_pkcs8_pem(pem)
			.or_else(|pkcs8_error| {
				RsaPrivateKey::from_pkcs1_pem(pem)
					.map_err(|_| SigningError::KeyParse { source: Box::new(pkcs8_error) })
			})?;

		Ok(Self {
			domain_name: domain_name.into(),
			key_pair_id: key_pair_id.into(),
			signing_key: SigningKey::new(key),
		})
	}

	/// Produces a signed access URL for `object` inside the subject's namespace.
	pub fn issue_access_url(
		&self,
		subject: &SubjectId,
		object: &ObjectName,
		now: OffsetDateTime,
	) -> Result<SignedUrl, SigningError> {
		let expires_at = now + ACCESS_URL_VALIDITY;
		let expires = expires_at.unix_timestamp();
		let resource = format!("https://{}/{}", self.domain_name, namespaced_key(subject, object));
		let policy = canned_policy(&resource, expires)?;
		let signature = self
			.signing_key
			.try_sign(policy.as_bytes())
			.map_err(|source| SigningError::Signature { source })?;
		let encoded = cdn_safe_base64(&signature.to_bytes());
		let url = Url::parse(&format!(
			"{resource}?Expires={expires}&Signature={encoded}&Key-Pair-Id={}",
			self.key_pair_id,
		))
		.map_err(|source| SigningError::UrlAssembly { source })?;

		Ok(SignedUrl { url, expires_at })
	}
}
impl Debug for CdnUrlSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CdnUrlSigner")
			.field("domain_name", &self.domain_name)
			.field("key_pair_id", &self.key_pair_id)
			.field("signing_key", &"<redacted>")
			.finish()
	}
}

#[derive(Serialize)]
struct CannedPolicy<'a> {
	#[serde(rename = "Statement")]
	statement: [PolicyStatement<'a>; 1],
}
#[derive(Serialize)]
struct PolicyStatement<'a> {
	#[serde(rename = "Resource")]
	resource: &'a str,
	#[serde(rename = "Condition")]
	condition: PolicyCondition,
}
#[derive(Serialize)]
struct PolicyCondition {
	#[serde(rename = "DateLessThan")]
	date_less_than: EpochBound,
}
#[derive(Serialize)]
struct EpochBound {
	#[serde(rename = "AWS:EpochTime")]
	epoch_time: i64,
}

/// Renders the canned policy document signed into every access URL.
///
/// The byte-exact rendering matters: the edge verifies the signature over this exact
/// string, so field order and the absence of whitespace are part of the format.
pub fn canned_policy(resource: &str, expires: i64) -> Result<String, SigningError> {
	let policy = CannedPolicy {
		statement: [PolicyStatement {
			resource,
			condition: PolicyCondition { date_less_than: EpochBound { epoch_time: expires } },
		}],
	};

	serde_json::to_string(&policy).map_err(|source| SigningError::Policy { source })
}

// Query-string-safe variant of standard base64 used by the edge network.
fn cdn_safe_base64(bytes: &[u8]) -> String {
	STANDARD
		.encode(bytes)
		.chars()
		.map(|ch| match ch {
			'+' => '-',
			'=' => '_',
			'/' => '~',
			other => other,
		})
		.collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn canned_policy_renders_the_exact_wire_format() {
		let policy = canned_policy("https://images.example.com/images/user-1/photo.png", 1_700_000_030)
			.expect("Policy fixture should serialize.");

		assert_eq!(
			policy,
			"{\"Statement\":[{\"Resource\":\"https://images.example.com/images/user-1/photo.png\",\
			\"Condition\":{\"DateLessThan\":{\"AWS:EpochTime\":1700000030}}}]}",
		);
	}

	const UNSAFE_BYTES: [u8; 5] = [0xfb, 0xef, 0xff, 0xfb, 0xef];

	#[test]
	fn safe_alphabet_replaces_unsafe_characters() {
		// The first triple forces '+' and '/' into the standard encoding; the trailing
		// pair forces padding.
		let encoded = cdn_safe_base64(&UNSAFE_BYTES);

		assert!(!encoded.contains('+'));
		assert!(!encoded.contains('/'));
		assert!(!encoded.contains('='));

		let restored: String = encoded
			.chars()
			.map(|ch| match ch {
				'-' => '+',
				'_' => '=',
				'~' => '/',
				other => other,
			})
			.collect();

		assert_eq!(STANDARD.encode(UNSAFE_BYTES), restored);
	}

	#[test]
	fn garbage_pem_fails_key_parsing() {
		let err = CdnUrlSigner::from_pem("images.example.com", "KPAIRID", "not a pem")
			.expect_err("Garbage PEM should be rejected.");

		assert!(matches!(err, SigningError::KeyParse { .. }));
	}
}
