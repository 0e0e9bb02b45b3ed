// self
use crate::{_prelude::*, obs::HandlerKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedHandler<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedHandler<F> = F;

/// A span builder used by gateway handlers.
#[derive(Clone, Debug)]
pub struct HandlerSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl HandlerSpan {
	/// Creates a new span tagged with the provided handler kind + stage.
	pub fn new(kind: HandlerKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("access_broker.handler", handler = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedHandler<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warn-level event for a boundary failure (when tracing is enabled).
///
/// The full source chain stays in logs; callers only ever see the top-level display
/// string rendered by the boundary.
pub fn record_handler_error(kind: HandlerKind, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(handler = kind.as_str(), error = %error, "Handler failed.");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::AuthError;

	#[tokio::test]
	async fn instrument_passes_values_through() {
		let span = HandlerSpan::new(HandlerKind::CdnPresign, "instrument_passes_values_through");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn record_handler_error_noop_without_tracing() {
		record_handler_error(HandlerKind::StoragePresign, &Error::from(AuthError::MissingToken));
	}
}
