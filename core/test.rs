use crate::Artifacts;
use ecg_model::{
	Artifact, BinaryClassifierArtifact, StandardScalerArtifact, MODEL_FILE_NAME, SCALER_FILE_NAME,
};
use std::path::Path;

pub const N_FEATURES: usize = 9;

pub fn classifier_artifact() -> BinaryClassifierArtifact {
	BinaryClassifierArtifact {
		weights: vec![1.0; N_FEATURES],
		bias: -0.1,
		classes: [0, 1],
	}
}

pub fn scaler_artifact() -> StandardScalerArtifact {
	StandardScalerArtifact {
		means: vec![0.5; N_FEATURES],
		variances: vec![0.04; N_FEATURES],
	}
}

pub fn artifacts() -> Artifacts {
	Artifacts {
		classifier: classifier_artifact().into(),
		scaler: scaler_artifact().into(),
	}
}

pub fn write_artifacts(dir: &Path) {
	classifier_artifact()
		.to_file(&dir.join(MODEL_FILE_NAME))
		.unwrap();
	scaler_artifact().to_file(&dir.join(SCALER_FILE_NAME)).unwrap();
}
