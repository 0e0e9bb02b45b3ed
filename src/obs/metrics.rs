// self
use crate::obs::{HandlerKind, HandlerOutcome};

/// Records a handler outcome via the global metrics recorder (when enabled).
pub fn record_handler_outcome(kind: HandlerKind, outcome: HandlerOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"access_broker_handler_total",
			"handler" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_handler_outcome_noop_without_metrics() {
		record_handler_outcome(HandlerKind::TokenExchange, HandlerOutcome::Failure);
	}
}
