/*!
This crate defines the on-disk artifacts consumed by `ecg_predict`: a fitted binary classifier and a fitted standard scaler. Both are produced by an external training pipeline.

An artifact file is encoded in one of two ways:

- binary: a single major version byte followed by a MessagePack document with named fields.
- JSON: a JSON object with the same field names, which is convenient to export from other environments.

The encoding is detected from the first non-whitespace byte of the file.
*/

use anyhow::{format_err, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{io::Write, path::Path};
use thiserror::Error;

mod classifier;
mod scaler;

pub use classifier::BinaryClassifierArtifact;
pub use scaler::StandardScalerArtifact;

/// The file name of the classifier artifact.
pub const MODEL_FILE_NAME: &str = "ecg_logistic_model.pkl";
/// The file name of the scaler artifact.
pub const SCALER_FILE_NAME: &str = "ecg_scaler.pkl";

const MAJOR_VERSION: u8 = 0;

#[derive(Debug, Error, PartialEq)]
pub enum ArtifactError {
	#[error("{0} is empty")]
	Empty(&'static str),
	#[error("{field} has {actual} values but {expected} were expected")]
	LengthMismatch {
		field: &'static str,
		expected: usize,
		actual: usize,
	},
	#[error("{0} contains a value that is not finite")]
	NotFinite(&'static str),
	#[error("variances contains a negative value")]
	NegativeVariance,
}

pub trait Artifact: Serialize + DeserializeOwned {
	/// Check the invariants that deserialization alone cannot enforce.
	fn validate(&self) -> Result<(), ArtifactError>;

	/// Deserialize an artifact from a slice.
	fn from_slice(slice: &[u8]) -> Result<Self> {
		let first_byte = slice
			.iter()
			.find(|byte| !byte.is_ascii_whitespace())
			.ok_or_else(|| format_err!("artifact is empty"))?;
		let artifact: Self = if *first_byte == b'{' {
			serde_json::from_slice(slice)?
		} else {
			let major_version = slice[0];
			if major_version != MAJOR_VERSION {
				return Err(format_err!("unknown major version {}", major_version));
			}
			rmp_serde::from_slice(&slice[1..])?
		};
		artifact.validate()?;
		Ok(artifact)
	}

	/// Deserialize an artifact by reading the file at `path`.
	fn from_path(path: &Path) -> Result<Self> {
		let bytes = std::fs::read(path)
			.with_context(|| format!("failed to read artifact {}", path.display()))?;
		Self::from_slice(&bytes)
			.with_context(|| format!("failed to load artifact {}", path.display()))
	}

	/// Write this artifact to the file at `path` in the binary encoding.
	fn to_file(&self, path: &Path) -> Result<()> {
		let file = std::fs::File::create(path)?;
		let mut writer = std::io::BufWriter::new(file);
		writer.write_all(&[MAJOR_VERSION])?;
		rmp_serde::encode::write_named(&mut writer, self)?;
		writer.flush()?;
		Ok(())
	}
}

fn check_finite(field: &'static str, values: &[f64]) -> Result<(), ArtifactError> {
	if values.iter().all(|value| value.is_finite()) {
		Ok(())
	} else {
		Err(ArtifactError::NotFinite(field))
	}
}

#[test]
fn test_empty_artifact() {
	let error = StandardScalerArtifact::from_slice(b"").unwrap_err();
	assert_eq!(error.to_string(), "artifact is empty");
	let error = StandardScalerArtifact::from_slice(b"  \n").unwrap_err();
	assert_eq!(error.to_string(), "artifact is empty");
}

#[test]
fn test_unknown_major_version() {
	let error = StandardScalerArtifact::from_slice(&[3, 0x80]).unwrap_err();
	assert_eq!(error.to_string(), "unknown major version 3");
}

#[test]
fn test_truncated_binary_artifact() {
	let artifact = StandardScalerArtifact {
		means: vec![0.1, 0.2],
		variances: vec![1.0, 2.0],
	};
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join(SCALER_FILE_NAME);
	artifact.to_file(&path).unwrap();
	let bytes = std::fs::read(&path).unwrap();
	assert!(StandardScalerArtifact::from_slice(&bytes[..bytes.len() - 3]).is_err());
}

#[test]
fn test_to_file_and_from_path() {
	let artifact = BinaryClassifierArtifact {
		weights: vec![0.5, -1.5, 2.0],
		bias: 0.25,
		classes: [0, 1],
	};
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join(MODEL_FILE_NAME);
	artifact.to_file(&path).unwrap();
	let bytes = std::fs::read(&path).unwrap();
	assert_eq!(bytes[0], MAJOR_VERSION);
	assert_eq!(BinaryClassifierArtifact::from_path(&path).unwrap(), artifact);
}

#[test]
fn test_from_path_missing_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join(MODEL_FILE_NAME);
	let error = BinaryClassifierArtifact::from_path(&path).unwrap_err();
	assert!(error.to_string().starts_with("failed to read artifact"));
}
