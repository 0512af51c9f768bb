//! Map command failures onto [`EvcapError`] classes and exit codes.

use evcap_algo::{OptimizeError, SizingError};
use evcap_core::EvcapError;
use evcap_io::DataError;

/// Classify `err` by the first typed cause in its chain.
///
/// Context layers added with `anyhow` are skipped. Causes that are none of
/// the workspace errors (nor plain I/O) fall back to [`EvcapError::Other`].
pub fn classify(err: &anyhow::Error) -> EvcapError {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<OptimizeError>() {
            return e.clone().into();
        }
        if let Some(e) = cause.downcast_ref::<SizingError>() {
            return e.clone().into();
        }
        if let Some(e) = cause.downcast_ref::<DataError>() {
            return EvcapError::Data(e.to_string());
        }
        if let Some(e) = cause.downcast_ref::<std::io::Error>() {
            return EvcapError::Io(std::io::Error::new(e.kind(), e.to_string()));
        }
    }
    EvcapError::Other(format!("{:#}", err))
}
