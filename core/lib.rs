/*!
This crate ties the ECG classifier together: it loads the two artifacts, reads one sample of input, and runs it through the scaler and the classifier.
*/

mod artifacts;
mod predict;

pub use self::{
	artifacts::{artifacts_dir, Artifacts},
	predict::{predict, read_input, PredictInput, PredictOutput, HEALTHY_CLASS},
};

#[cfg(test)]
mod test;
