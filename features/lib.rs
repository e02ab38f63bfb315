/*!
This crate implements the feature normalization that is applied to each ECG sample before it reaches the classifier. The scaler is fitted elsewhere. This crate only applies the per-feature statistics it was fitted with.
*/

use thiserror::Error;

mod standard_scaler;

pub use standard_scaler::StandardScaler;

/// This error is returned when a sample's number of features differs from the number of features a transform was fitted with.
#[derive(Debug, Error, PartialEq)]
#[error("expected {expected} features but the input has {actual}")]
pub struct ShapeMismatchError {
	pub expected: usize,
	pub actual: usize,
}
