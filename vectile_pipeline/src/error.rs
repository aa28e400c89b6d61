//! Error-class markers attached to `anyhow::Error` via `.context(...)`.
//!
//! The pipeline does not define its own error type; every fallible call
//! returns `anyhow::Result`. Call sites that need to branch on error class
//! (the retry loop in [`crate::pool`], the per-feature catch in the transform
//! pipeline) downcast with `error.downcast_ref::<PipelineErrorKind>()`.

use std::fmt;

/// Error-class taxonomy for the tile-rendering pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
	/// Unknown extension/format, missing required column, malformed config. Fatal.
	Config,
	/// Serialization failure from the database; retried before becoming fatal.
	TransientDb,
	/// Unknown geometry type or invalid geometry for a single feature; the feature is dropped.
	FeatureLevel,
	/// Inconsistent encoder state, e.g. mismatched TopoJSON transforms across merged inputs. Fatal.
	Encoder,
}

impl fmt::Display for PipelineErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			PipelineErrorKind::Config => "config error",
			PipelineErrorKind::TransientDb => "transient database error",
			PipelineErrorKind::FeatureLevel => "feature-level error",
			PipelineErrorKind::Encoder => "encoder error",
		};
		f.write_str(s)
	}
}

impl std::error::Error for PipelineErrorKind {}

/// Returns `true` if `error`'s context chain carries the given [`PipelineErrorKind`].
pub fn is_kind(error: &anyhow::Error, kind: PipelineErrorKind) -> bool {
	error.chain().any(|cause| cause.downcast_ref::<PipelineErrorKind>() == Some(&kind))
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::{anyhow, Context};

	#[test]
	fn downcast_finds_attached_kind() {
		let err = anyhow!("boom").context(PipelineErrorKind::TransientDb);
		assert!(is_kind(&err, PipelineErrorKind::TransientDb));
		assert!(!is_kind(&err, PipelineErrorKind::Config));
	}
}
