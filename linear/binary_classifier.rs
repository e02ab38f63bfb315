use crate::ShapeMismatchError;
use itertools::izip;
use ndarray::prelude::*;
use std::ops::Neg;

/// A `BinaryClassifier` is a logistic regression model. The probability of the positive class is the sigmoid of the dot product of the features with `weights`, plus `bias`.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryClassifier {
	pub weights: Array1<f64>,
	pub bias: f64,
	/// The labels of the negative and positive classes, in that order.
	pub classes: [i64; 2],
}

impl BinaryClassifier {
	pub fn n_features(&self) -> usize {
		self.weights.len()
	}

	/// Compute the logit for each row of `features`.
	pub fn decision_function(
		&self,
		features: ArrayView2<f64>,
	) -> Result<Array1<f64>, ShapeMismatchError> {
		if features.ncols() != self.n_features() {
			return Err(ShapeMismatchError {
				expected: self.n_features(),
				actual: features.ncols(),
			});
		}
		let mut logits = Array1::from_elem(features.nrows(), self.bias);
		ndarray::linalg::general_mat_vec_mul(1.0, &features, &self.weights, 1.0, &mut logits);
		Ok(logits)
	}

	/// Compute the probability of each class for each row of `features`. Column 0 holds the probability of the negative class and column 1 the probability of the positive class.
	pub fn predict_probabilities(
		&self,
		features: ArrayView2<f64>,
	) -> Result<Array2<f64>, ShapeMismatchError> {
		let logits = self.decision_function(features)?;
		let mut probabilities = Array2::zeros((features.nrows(), 2));
		for (mut probabilities, logit) in izip!(probabilities.axis_iter_mut(Axis(0)), logits.iter())
		{
			let probability_pos = 1.0 / (logit.neg().exp() + 1.0);
			probabilities[0] = 1.0 - probability_pos;
			probabilities[1] = probability_pos;
		}
		Ok(probabilities)
	}

	/// Predict a class label for each row of `features`. A row is assigned the positive class only when its logit is strictly greater than zero.
	pub fn predict(&self, features: ArrayView2<f64>) -> Result<Vec<i64>, ShapeMismatchError> {
		let logits = self.decision_function(features)?;
		let labels = logits
			.iter()
			.map(|logit| {
				if *logit > 0.0 {
					self.classes[1]
				} else {
					self.classes[0]
				}
			})
			.collect();
		Ok(labels)
	}
}

#[cfg(test)]
fn classifier() -> BinaryClassifier {
	BinaryClassifier {
		weights: arr1(&[1.0, -2.0, 0.5]),
		bias: -0.25,
		classes: [0, 1],
	}
}

#[test]
fn test_decision_function() {
	let features = arr2(&[[1.0, 0.0, 0.5], [0.0, 1.0, 0.0]]);
	let logits = classifier().decision_function(features.view()).unwrap();
	assert_eq!(logits, arr1(&[1.0, -2.25]));
}

#[test]
fn test_predict() {
	let features = arr2(&[[1.0, 0.0, 0.5], [0.0, 1.0, 0.0]]);
	let labels = classifier().predict(features.view()).unwrap();
	assert_eq!(labels, vec![1, 0]);
}

#[test]
fn test_predict_uses_class_labels() {
	let model = BinaryClassifier {
		classes: [-1, 7],
		..classifier()
	};
	let features = arr2(&[[1.0, 0.0, 0.5], [0.0, 1.0, 0.0]]);
	assert_eq!(model.predict(features.view()).unwrap(), vec![7, -1]);
}

#[test]
fn test_predict_zero_logit_is_negative() {
	let model = BinaryClassifier {
		weights: arr1(&[1.0]),
		bias: 0.0,
		classes: [0, 1],
	};
	let features = arr2(&[[0.0]]);
	assert_eq!(model.predict(features.view()).unwrap(), vec![0]);
	let probabilities = model.predict_probabilities(features.view()).unwrap();
	assert_eq!(probabilities, arr2(&[[0.5, 0.5]]));
}

#[test]
fn test_predict_probabilities() {
	let features = arr2(&[[1.0, 0.0, 0.5]]);
	let probabilities = classifier().predict_probabilities(features.view()).unwrap();
	let expected = 1.0 / (1.0 + (-1.0f64).exp());
	assert!((probabilities[[0, 1]] - expected).abs() < 1e-6);
	assert!((probabilities[[0, 0]] + probabilities[[0, 1]] - 1.0).abs() < 1e-6);
}

#[test]
fn test_shape_mismatch() {
	let features = arr2(&[[1.0, 2.0]]);
	let error = classifier().predict(features.view()).unwrap_err();
	insta::assert_debug_snapshot!(error, @r###"
 ShapeMismatchError {
     expected: 3,
     actual: 2,
 }
 "###);
}
