use crate::{check_finite, Artifact, ArtifactError};
use ecg_linear::BinaryClassifier;
use ndarray::prelude::*;

/// The coefficients of a fitted logistic regression model with a single output.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct BinaryClassifierArtifact {
	pub weights: Vec<f64>,
	pub bias: f64,
	/// The negative class label followed by the positive class label.
	pub classes: [i64; 2],
}

impl Artifact for BinaryClassifierArtifact {
	fn validate(&self) -> Result<(), ArtifactError> {
		if self.weights.is_empty() {
			return Err(ArtifactError::Empty("weights"));
		}
		check_finite("weights", &self.weights)?;
		check_finite("bias", &[self.bias])?;
		Ok(())
	}
}

impl From<BinaryClassifierArtifact> for BinaryClassifier {
	fn from(value: BinaryClassifierArtifact) -> BinaryClassifier {
		BinaryClassifier {
			weights: Array1::from(value.weights),
			bias: value.bias,
			classes: value.classes,
		}
	}
}

#[test]
fn test_from_json() {
	let json = br#"{ "weights": [0.5, -0.25], "bias": 0.1, "classes": [0, 1] }"#;
	let artifact = BinaryClassifierArtifact::from_slice(json).unwrap();
	let model = BinaryClassifier::from(artifact);
	insta::assert_debug_snapshot!(model.classes, @r###"
 [
     0,
     1,
 ]
 "###);
	assert_eq!(model.weights, arr1(&[0.5, -0.25]));
	assert_eq!(model.n_features(), 2);
}

#[test]
fn test_validate() {
	let artifact = BinaryClassifierArtifact {
		weights: vec![],
		bias: 0.0,
		classes: [0, 1],
	};
	assert_eq!(artifact.validate(), Err(ArtifactError::Empty("weights")));
	let artifact = BinaryClassifierArtifact {
		weights: vec![1.0],
		bias: f64::INFINITY,
		classes: [0, 1],
	};
	assert_eq!(artifact.validate(), Err(ArtifactError::NotFinite("bias")));
}

#[test]
fn test_three_classes_are_rejected() {
	let json = br#"{ "weights": [0.5], "bias": 0.1, "classes": [0, 1, 2] }"#;
	assert!(BinaryClassifierArtifact::from_slice(json).is_err());
}
