//! Optional observability helpers for gateway handlers.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `access_broker.handler` with the
//!   `handler` (operation) and `stage` (call site) fields, plus a warn-level event for
//!   every boundary failure.
//! - Enable `metrics` to increment the `access_broker_handler_total` counter for every
//!   attempt/success/failure, labeled by `handler` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Handler operations observed by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
	/// Authorization-code exchange.
	TokenExchange,
	/// Object-storage upload presigning.
	StoragePresign,
	/// CDN access-URL signing.
	CdnPresign,
}
impl HandlerKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandlerKind::TokenExchange => "token_exchange",
			HandlerKind::StoragePresign => "storage_presign",
			HandlerKind::CdnPresign => "cdn_presign",
		}
	}
}
impl Display for HandlerKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerOutcome {
	/// Entry to a gateway handler.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure converted at the boundary.
	Failure,
}
impl HandlerOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandlerOutcome::Attempt => "attempt",
			HandlerOutcome::Success => "success",
			HandlerOutcome::Failure => "failure",
		}
	}
}
impl Display for HandlerOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
