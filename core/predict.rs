use crate::Artifacts;
use anyhow::{format_err, Context, Result};
use ndarray::prelude::*;
use std::io::Read;

/// The class label the classifier assigns to a healthy reading.
pub const HEALTHY_CLASS: i64 = 0;

#[derive(serde::Deserialize, Debug, PartialEq)]
pub struct PredictInput {
	pub ecg: Vec<f64>,
}

#[derive(serde::Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictOutput {
	pub prediction: i64,
	/// The probability of the positive class.
	pub probability: f64,
	pub is_healthy: bool,
	pub status: &'static str,
}

/// Read `reader` to the end and parse it as a `PredictInput`.
pub fn read_input(mut reader: impl Read) -> Result<PredictInput> {
	let mut json = String::new();
	reader
		.read_to_string(&mut json)
		.context("failed to read the input")?;
	let input: PredictInput = serde_json::from_str(&json).context("failed to parse the input")?;
	if let Some(index) = input.ecg.iter().position(|value| !value.is_finite()) {
		return Err(format_err!("ecg value at index {} is out of range", index));
	}
	Ok(input)
}

/// Scale and classify a single sample.
pub fn predict(artifacts: &Artifacts, input: &PredictInput) -> Result<PredictOutput> {
	let features = ArrayView2::from_shape((1, input.ecg.len()), input.ecg.as_slice())?;
	let features = artifacts.scaler.transform(features)?;
	let probabilities = artifacts
		.classifier
		.predict_probabilities(features.view())?;
	let prediction = artifacts
		.classifier
		.predict(features.view())?
		.first()
		.copied()
		.ok_or_else(|| format_err!("the classifier returned no prediction"))?;
	let is_healthy = prediction == HEALTHY_CLASS;
	log::debug!(
		"predicted class {} with positive class probability {}",
		prediction,
		probabilities[[0, 1]],
	);
	Ok(PredictOutput {
		prediction,
		probability: probabilities[[0, 1]],
		is_healthy,
		status: if is_healthy { "Healthy" } else { "Unhealthy" },
	})
}

#[test]
fn test_read_input() {
	let input = read_input(r#"{"ecg": [0.1, 2, -3.5]}"#.as_bytes()).unwrap();
	assert_eq!(
		input,
		PredictInput {
			ecg: vec![0.1, 2.0, -3.5]
		}
	);
}

#[test]
fn test_read_input_large_values() {
	let input = read_input(r#"{"ecg": [1e39, -1e300]}"#.as_bytes()).unwrap();
	assert_eq!(input.ecg, vec![1e39, -1e300]);
}

#[test]
fn test_read_input_ignores_other_keys() {
	let input = read_input(r#"{"user": "a", "ecg": [1.0]}"#.as_bytes()).unwrap();
	assert_eq!(input.ecg, vec![1.0]);
}

#[test]
fn test_read_input_errors() {
	let inputs = [
		"{\"ecg\": [0.1, 0.2",
		"not json",
		"",
		r#"{"samples": [0.1, 0.2]}"#,
		r#"{"ecg": 0.1}"#,
		r#"{"ecg": "0.1, 0.2"}"#,
		r#"{"ecg": [0.1, "0.2"]}"#,
		r#"{"ecg": [0.1, null]}"#,
		r#"[0.1, 0.2]"#,
		r#"{"ecg": [1e400]}"#,
	];
	for input in inputs.iter() {
		assert!(read_input(input.as_bytes()).is_err(), "{}", input);
	}
}

#[test]
fn test_predict() {
	let artifacts = crate::test::artifacts();
	let input = PredictInput {
		ecg: vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9],
	};
	let output = predict(&artifacts, &input).unwrap();
	assert_eq!(output.prediction, 0);
	assert!(output.is_healthy);
	assert_eq!(output.status, "Healthy");
	assert!((output.probability - 0.475).abs() < 1e-3);
	let input = PredictInput {
		ecg: vec![0.9; crate::test::N_FEATURES],
	};
	let output = predict(&artifacts, &input).unwrap();
	assert_eq!(output.prediction, 1);
	assert!(!output.is_healthy);
	assert_eq!(output.status, "Unhealthy");
}

#[test]
fn test_predict_near_decision_boundary() {
	let artifacts = Artifacts {
		classifier: ecg_linear::BinaryClassifier {
			weights: arr1(&[1.0, -1.0]),
			bias: 0.0,
			classes: [0, 1],
		},
		scaler: ecg_features::StandardScaler {
			means: vec![0.0, 0.0],
			variances: vec![1.0, 1.0],
		},
	};
	let input = PredictInput {
		ecg: vec![1.00000001, 1.0],
	};
	assert_eq!(predict(&artifacts, &input).unwrap().prediction, 1);
	let input = PredictInput {
		ecg: vec![1.0, 1.00000001],
	};
	assert_eq!(predict(&artifacts, &input).unwrap().prediction, 0);
}

#[test]
fn test_predict_is_deterministic() {
	let artifacts = crate::test::artifacts();
	let input = PredictInput {
		ecg: vec![0.3, 0.9, 0.1, 0.4, 0.7, 0.2, 0.6, 0.8, 0.5],
	};
	let first = predict(&artifacts, &input).unwrap();
	for _ in 0..10 {
		assert_eq!(predict(&artifacts, &input).unwrap(), first);
	}
}

#[test]
fn test_predict_shape_mismatch() {
	let artifacts = crate::test::artifacts();
	for len in [0, 8, 10].iter() {
		let input = PredictInput {
			ecg: vec![0.5; *len],
		};
		let error = predict(&artifacts, &input).unwrap_err();
		assert_eq!(
			error.to_string(),
			format!("expected 9 features but the input has {}", len)
		);
	}
}

#[test]
fn test_predict_output_json() {
	let output = PredictOutput {
		prediction: 1,
		probability: 0.75,
		is_healthy: false,
		status: "Unhealthy",
	};
	insta::assert_snapshot!(
		serde_json::to_string(&output).unwrap(),
		@r###"{"prediction":1,"probability":0.75,"isHealthy":false,"status":"Unhealthy"}"###
	);
}
