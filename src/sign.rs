//! Signed-URL issuance: object-storage presigning, CDN canned-policy signing, and the
//! private-key sources backing the CDN signer.

pub mod cdn;
pub mod key_source;
pub mod object_store;

pub use cdn::*;
pub use key_source::*;
pub use object_store::*;

// self
use crate::{
	_prelude::*,
	auth::id::{ObjectName, SubjectId},
};

/// A one-time signed URL and the instant it stops working.
///
/// Created per request, never persisted, never reused across requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedUrl {
	/// The capability-bearing URL.
	pub url: Url,
	/// Expiry instant encoded into the signature or query string.
	pub expires_at: OffsetDateTime,
}

/// Builds the namespaced storage key for a subject-owned object.
///
/// Every issued URL addresses `images/{subject}/{object}`; callers can never escape
/// their own namespace because both components reject separators at parse time.
pub fn namespaced_key(subject: &SubjectId, object: &ObjectName) -> String {
	format!("images/{subject}/{object}")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn keys_are_namespaced_under_the_subject() {
		let subject = SubjectId::new("user-123").expect("Subject fixture should be valid.");
		let object = ObjectName::new("photo.png").expect("Object fixture should be valid.");

		assert_eq!(namespaced_key(&subject, &object), "images/user-123/photo.png");
	}
}
