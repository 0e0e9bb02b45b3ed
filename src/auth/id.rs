//! Strongly typed identifiers enforced across the broker domain.
//!
//! Both names below end up concatenated into storage keys shaped
//! `images/{subject}/{object}`, so validation rejects anything that could escape a key
//! segment: separators, dot segments, whitespace, and control characters. Traversal
//! attempts fail here instead of being normalized away.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 512;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (subject, object).
		kind: &'static str,
	},
	/// The identifier contains whitespace or control characters.
	#[error("{kind} identifier contains whitespace or control characters.")]
	ContainsWhitespace {
		/// Kind of identifier (subject, object).
		kind: &'static str,
	},
	/// The identifier contains a path separator.
	#[error("{kind} identifier contains a path separator.")]
	ContainsSeparator {
		/// Kind of identifier (subject, object).
		kind: &'static str,
	},
	/// The identifier is a dot segment and would traverse the key namespace.
	#[error("{kind} identifier cannot be a dot segment.")]
	DotSegment {
		/// Kind of identifier (subject, object).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (subject, object).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { SubjectId, "Stable provider-assigned identifier for an authenticated user.", "Subject" }
def_id! { ObjectName, "Caller-supplied name addressing one object inside a subject namespace.", "Object" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.contains('/') || view.contains('\\') {
		return Err(IdentifierError::ContainsSeparator { kind });
	}
	if view == "." || view == ".." {
		return Err(IdentifierError::DotSegment { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_traversal_material() {
		assert!(matches!(
			ObjectName::new("../other-user/photo.png"),
			Err(IdentifierError::ContainsSeparator { .. }),
		));
		assert!(matches!(ObjectName::new(".."), Err(IdentifierError::DotSegment { .. })));
		assert!(matches!(ObjectName::new("."), Err(IdentifierError::DotSegment { .. })));
		assert!(matches!(
			ObjectName::new("evil\\path"),
			Err(IdentifierError::ContainsSeparator { .. }),
		));
	}

	#[test]
	fn identifiers_reject_whitespace_and_control_characters() {
		assert!(ObjectName::new("photo 1.png").is_err());
		assert!(ObjectName::new("photo\u{0}.png").is_err());
		assert!(SubjectId::new(" user-123").is_err());
		assert!(SubjectId::new("").is_err());
	}

	#[test]
	fn well_formed_names_pass() {
		let subject = SubjectId::new("user-123").expect("Subject fixture should be valid.");
		let object = ObjectName::new("photo.png").expect("Object fixture should be valid.");

		assert_eq!(subject.as_ref(), "user-123");
		assert_eq!(object.as_ref(), "photo.png");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let subject: SubjectId = serde_json::from_str("\"user-42\"")
			.expect("Subject should deserialize successfully.");

		assert_eq!(subject.as_ref(), "user-42");
		assert!(serde_json::from_str::<SubjectId>("\"a/b\"").is_err());
		assert!(serde_json::from_str::<ObjectName>("\"..\"").is_err());
	}

	#[test]
	fn length_limit_is_enforced() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		ObjectName::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(matches!(ObjectName::new(&too_long), Err(IdentifierError::TooLong { .. })));
	}
}
