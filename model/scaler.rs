use crate::{check_finite, Artifact, ArtifactError};
use ecg_features::StandardScaler;

/// The per-feature statistics of a fitted standard scaler.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct StandardScalerArtifact {
	pub means: Vec<f64>,
	pub variances: Vec<f64>,
}

impl Artifact for StandardScalerArtifact {
	fn validate(&self) -> Result<(), ArtifactError> {
		if self.means.is_empty() {
			return Err(ArtifactError::Empty("means"));
		}
		if self.variances.len() != self.means.len() {
			return Err(ArtifactError::LengthMismatch {
				field: "variances",
				expected: self.means.len(),
				actual: self.variances.len(),
			});
		}
		check_finite("means", &self.means)?;
		check_finite("variances", &self.variances)?;
		if self.variances.iter().any(|variance| *variance < 0.0) {
			return Err(ArtifactError::NegativeVariance);
		}
		Ok(())
	}
}

impl From<StandardScalerArtifact> for StandardScaler {
	fn from(value: StandardScalerArtifact) -> StandardScaler {
		StandardScaler {
			means: value.means,
			variances: value.variances,
		}
	}
}

#[test]
fn test_from_json() {
	let json = br#"
		{ "means": [0.1, 0.2, 0.3], "variances": [1.0, 0.0, 4.0] }
	"#;
	let scaler = StandardScaler::from(StandardScalerArtifact::from_slice(json).unwrap());
	assert_eq!(scaler.n_features(), 3);
	assert_eq!(scaler.variances, vec![1.0, 0.0, 4.0]);
}

#[test]
fn test_validate() {
	let artifact = StandardScalerArtifact {
		means: vec![0.0, 0.0],
		variances: vec![1.0],
	};
	let error = artifact.validate().unwrap_err();
	assert_eq!(error.to_string(), "variances has 1 values but 2 were expected");
	let artifact = StandardScalerArtifact {
		means: vec![0.0],
		variances: vec![-1.0],
	};
	assert_eq!(artifact.validate(), Err(ArtifactError::NegativeVariance));
}

#[test]
fn test_invalid_artifact_is_rejected_on_load() {
	let json = br#"{ "means": [], "variances": [] }"#;
	let error = StandardScalerArtifact::from_slice(json).unwrap_err();
	assert_eq!(error.to_string(), "means is empty");
}
