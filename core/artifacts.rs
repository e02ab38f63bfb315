use anyhow::{format_err, Context, Result};
use ecg_features::StandardScaler;
use ecg_linear::BinaryClassifier;
use ecg_model::{
	Artifact, BinaryClassifierArtifact, StandardScalerArtifact, MODEL_FILE_NAME, SCALER_FILE_NAME,
};
use std::path::{Path, PathBuf};

/// The fitted classifier and scaler, ready for inference.
#[derive(Clone, Debug)]
pub struct Artifacts {
	pub classifier: BinaryClassifier,
	pub scaler: StandardScaler,
}

impl Artifacts {
	/// Load the classifier and then the scaler from `dir`.
	pub fn load(dir: &Path) -> Result<Artifacts> {
		let model_path = dir.join(MODEL_FILE_NAME);
		let classifier: BinaryClassifier = BinaryClassifierArtifact::from_path(&model_path)?.into();
		log::debug!(
			"loaded classifier from {} with {} features",
			model_path.display(),
			classifier.n_features(),
		);
		let scaler_path = dir.join(SCALER_FILE_NAME);
		let scaler: StandardScaler = StandardScalerArtifact::from_path(&scaler_path)?.into();
		log::debug!(
			"loaded scaler from {} with {} features",
			scaler_path.display(),
			scaler.n_features(),
		);
		if classifier.n_features() != scaler.n_features() {
			return Err(format_err!(
				"the classifier expects {} features but the scaler was fitted with {}",
				classifier.n_features(),
				scaler.n_features(),
			));
		}
		Ok(Artifacts { classifier, scaler })
	}
}

/// Retrieve the directory containing the running executable, with symlinks resolved.
pub fn artifacts_dir() -> Result<PathBuf> {
	let exe = std::env::current_exe().context("failed to locate the running executable")?;
	let exe = exe
		.canonicalize()
		.with_context(|| format!("failed to resolve {}", exe.display()))?;
	let dir = exe
		.parent()
		.ok_or_else(|| format_err!("{} has no parent directory", exe.display()))?;
	Ok(dir.to_owned())
}

#[test]
fn test_load() {
	let dir = tempfile::tempdir().unwrap();
	crate::test::write_artifacts(dir.path());
	let artifacts = Artifacts::load(dir.path()).unwrap();
	assert_eq!(artifacts.classifier.n_features(), crate::test::N_FEATURES);
	assert_eq!(artifacts.scaler.n_features(), crate::test::N_FEATURES);
}

#[test]
fn test_load_json_artifacts() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::write(
		dir.path().join(MODEL_FILE_NAME),
		r#"{"weights": [1.0, 2.0], "bias": 0.0, "classes": [0, 1]}"#,
	)
	.unwrap();
	std::fs::write(
		dir.path().join(SCALER_FILE_NAME),
		r#"{"means": [0.0, 0.0], "variances": [1.0, 1.0]}"#,
	)
	.unwrap();
	let artifacts = Artifacts::load(dir.path()).unwrap();
	assert_eq!(artifacts.scaler.means, vec![0.0, 0.0]);
}

#[test]
fn test_load_missing_scaler() {
	let dir = tempfile::tempdir().unwrap();
	crate::test::classifier_artifact()
		.to_file(&dir.path().join(MODEL_FILE_NAME))
		.unwrap();
	let error = Artifacts::load(dir.path()).unwrap_err();
	assert!(error.to_string().contains(SCALER_FILE_NAME));
}

#[test]
fn test_load_missing_classifier() {
	let dir = tempfile::tempdir().unwrap();
	crate::test::scaler_artifact()
		.to_file(&dir.path().join(SCALER_FILE_NAME))
		.unwrap();
	let error = Artifacts::load(dir.path()).unwrap_err();
	assert!(error.to_string().contains(MODEL_FILE_NAME));
}

#[test]
fn test_load_inconsistent_artifacts() {
	let dir = tempfile::tempdir().unwrap();
	crate::test::classifier_artifact()
		.to_file(&dir.path().join(MODEL_FILE_NAME))
		.unwrap();
	StandardScalerArtifact {
		means: vec![0.0; 4],
		variances: vec![1.0; 4],
	}
	.to_file(&dir.path().join(SCALER_FILE_NAME))
	.unwrap();
	let error = Artifacts::load(dir.path()).unwrap_err();
	assert_eq!(
		error.to_string(),
		"the classifier expects 9 features but the scaler was fitted with 4"
	);
}

#[test]
fn test_artifacts_dir() {
	let dir = artifacts_dir().unwrap();
	let exe = std::env::current_exe().unwrap().canonicalize().unwrap();
	assert_eq!(exe.parent(), Some(dir.as_path()));
}
