use crate::ShapeMismatchError;
use itertools::izip;
use ndarray::prelude::*;

/**
A `StandardScaler` transforms each feature to zero mean and unit variance using the mean and variance of that feature in the training set. [Learn more](https://en.wikipedia.org/wiki/Feature_scaling#Standardization_(Z-score_Normalization).

`feature_value = (value - mean) / sqrt(variance)`

| value | mean | variance | feature value |
|-------|------|----------|---------------|
| 0.5   | 0.1  | 0.04     | 2.0           |
| 0.1   | 0.1  | 0.04     | 0.0           |
| 0.3   | 0.3  | 0.0      | 0.0           |

A feature whose standard deviation in the training set was zero, or within a few ulps of zero, is centered but not scaled.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScaler {
	pub means: Vec<f64>,
	pub variances: Vec<f64>,
}

impl StandardScaler {
	/// The number of features this scaler was fitted with.
	pub fn n_features(&self) -> usize {
		self.means.len()
	}

	/// Return a new array with each column of `features` standardized.
	pub fn transform(&self, features: ArrayView2<f64>) -> Result<Array2<f64>, ShapeMismatchError> {
		let mut output = features.to_owned();
		self.transform_in_place(output.view_mut())?;
		Ok(output)
	}

	/// Standardize each column of `features` in place.
	pub fn transform_in_place(
		&self,
		mut features: ArrayViewMut2<f64>,
	) -> Result<(), ShapeMismatchError> {
		if features.ncols() != self.n_features() {
			return Err(ShapeMismatchError {
				expected: self.n_features(),
				actual: features.ncols(),
			});
		}
		for mut row in features.axis_iter_mut(Axis(0)) {
			for (feature, mean, variance) in izip!(row.iter_mut(), &self.means, &self.variances) {
				*feature = (*feature - mean) / scale(*variance);
			}
		}
		Ok(())
	}
}

/// Standard deviations below this are treated as constant features.
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

fn scale(variance: f64) -> f64 {
	let scale = variance.sqrt();
	if scale < MIN_SCALE {
		1.0
	} else {
		scale
	}
}

#[test]
fn test_transform() {
	let scaler = StandardScaler {
		means: vec![0.1, 0.1, 0.3],
		variances: vec![0.04, 0.04, 0.0],
	};
	let features = arr2(&[[0.5, 0.1, 0.3]]);
	let output = scaler.transform(features.view()).unwrap();
	assert_eq!(output.dim(), (1, 3));
	assert!((output[[0, 0]] - 2.0).abs() < 1e-6);
	assert!(output[[0, 1]].abs() < 1e-6);
	assert!(output[[0, 2]].abs() < 1e-6);
}

#[test]
fn test_transform_constant_feature_is_centered() {
	let scaler = StandardScaler {
		means: vec![1.0],
		variances: vec![0.0],
	};
	let output = scaler.transform(arr2(&[[3.5]]).view()).unwrap();
	assert!((output[[0, 0]] - 2.5).abs() < 1e-6);
}

#[test]
fn test_transform_near_constant_feature_is_centered() {
	let scaler = StandardScaler {
		means: vec![1.0, 1.0],
		variances: vec![1e-30, 1e-20],
	};
	let output = scaler.transform(arr2(&[[3.5, 1.5]]).view()).unwrap();
	assert!((output[[0, 0]] - 2.5).abs() < 1e-12);
	assert!((output[[0, 1]] - 0.5e10).abs() < 1e-3);
}

#[test]
fn test_transform_does_not_modify_input() {
	let scaler = StandardScaler {
		means: vec![1.0, 2.0],
		variances: vec![4.0, 4.0],
	};
	let features = arr2(&[[3.0, 2.0]]);
	scaler.transform(features.view()).unwrap();
	assert_eq!(features, arr2(&[[3.0, 2.0]]));
}

#[test]
fn test_transform_shape_mismatch() {
	let scaler = StandardScaler {
		means: vec![0.0, 0.0, 0.0],
		variances: vec![1.0, 1.0, 1.0],
	};
	let too_short = arr2(&[[1.0, 2.0]]);
	let error = scaler.transform(too_short.view()).unwrap_err();
	insta::assert_debug_snapshot!(error, @r###"
 ShapeMismatchError {
     expected: 3,
     actual: 2,
 }
 "###);
	let too_long = arr2(&[[1.0, 2.0, 3.0, 4.0]]);
	assert_eq!(
		scaler.transform(too_long.view()),
		Err(ShapeMismatchError {
			expected: 3,
			actual: 4,
		})
	);
}
