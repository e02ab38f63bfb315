use ecg_model::{
	Artifact, BinaryClassifierArtifact, StandardScalerArtifact, MODEL_FILE_NAME, SCALER_FILE_NAME,
};
use std::{
	io::Write,
	path::Path,
	process::{Command, Output, Stdio},
	time::{Duration, Instant},
};

const ECG_PREDICT: &str = env!("CARGO_BIN_EXE_ecg_predict");

fn write_artifacts(dir: &Path) {
	BinaryClassifierArtifact {
		weights: vec![1.0; 9],
		bias: -0.1,
		classes: [0, 1],
	}
	.to_file(&dir.join(MODEL_FILE_NAME))
	.unwrap();
	StandardScalerArtifact {
		means: vec![0.5; 9],
		variances: vec![0.04; 9],
	}
	.to_file(&dir.join(SCALER_FILE_NAME))
	.unwrap();
}

fn command(program: &Path) -> Command {
	let mut command = Command::new(program);
	command
		.env_remove("ECG_ARTIFACTS_DIR")
		.env_remove("ECG_OUTPUT_FORMAT")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped());
	command
}

fn run(mut command: Command, stdin: &str) -> Output {
	let mut child = command.spawn().unwrap();
	// The process may exit before reading its input.
	let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
	child.wait_with_output().unwrap()
}

const HEALTHY_INPUT: &str = r#"{"ecg": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]}"#;
const UNHEALTHY_INPUT: &str = r#"{"ecg": [0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9]}"#;

#[test]
fn test_predict_with_artifacts_next_to_executable() {
	// Hard link, since exec fails with ETXTBSY while another thread holds a copy open for writing.
	let target_dir = Path::new(ECG_PREDICT).parent().unwrap();
	let dir = tempfile::tempdir_in(target_dir).unwrap();
	write_artifacts(dir.path());
	let program = dir.path().join("ecg_predict");
	std::fs::hard_link(ECG_PREDICT, &program).unwrap();
	let output = run(command(&program), HEALTHY_INPUT);
	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout).unwrap(), "0\n");
	let output = run(command(&program), UNHEALTHY_INPUT);
	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout).unwrap(), "1\n");
}

#[test]
fn test_predict_with_artifacts_dir() {
	let dir = tempfile::tempdir().unwrap();
	write_artifacts(dir.path());
	let mut cmd = command(Path::new(ECG_PREDICT));
	cmd.arg("--artifacts-dir").arg(dir.path());
	let output = run(cmd, HEALTHY_INPUT);
	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout).unwrap(), "0\n");
	let mut cmd = command(Path::new(ECG_PREDICT));
	cmd.env("ECG_ARTIFACTS_DIR", dir.path());
	let output = run(cmd, HEALTHY_INPUT);
	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout).unwrap(), "0\n");
}

#[test]
fn test_predict_is_deterministic() {
	let dir = tempfile::tempdir().unwrap();
	write_artifacts(dir.path());
	let outputs: Vec<Vec<u8>> = (0..3)
		.map(|_| {
			let mut cmd = command(Path::new(ECG_PREDICT));
			cmd.arg("--artifacts-dir").arg(dir.path());
			run(cmd, UNHEALTHY_INPUT).stdout
		})
		.collect();
	assert!(outputs.iter().all(|output| output == &outputs[0]));
}

#[test]
fn test_json_format() {
	let dir = tempfile::tempdir().unwrap();
	write_artifacts(dir.path());
	let mut cmd = command(Path::new(ECG_PREDICT));
	cmd.arg("--artifacts-dir")
		.arg(dir.path())
		.arg("--format")
		.arg("json");
	let output = run(cmd, UNHEALTHY_INPUT);
	assert!(output.status.success());
	let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(value["prediction"], 1);
	assert_eq!(value["isHealthy"], false);
	assert_eq!(value["status"], "Unhealthy");
}

#[test]
fn test_missing_artifacts_fail_before_reading_stdin() {
	let dir = tempfile::tempdir().unwrap();
	let mut cmd = command(Path::new(ECG_PREDICT));
	cmd.arg("--artifacts-dir").arg(dir.path());
	let mut child = cmd.spawn().unwrap();
	// Hold stdin open. Reading it would block until the deadline.
	let stdin = child.stdin.take().unwrap();
	let deadline = Instant::now() + Duration::from_secs(10);
	let status = loop {
		if let Some(status) = child.try_wait().unwrap() {
			break status;
		}
		if Instant::now() > deadline {
			child.kill().unwrap();
			panic!("ecg_predict blocked on stdin with no artifacts to load");
		}
		std::thread::sleep(Duration::from_millis(20));
	};
	drop(stdin);
	assert!(!status.success());
}

#[test]
fn test_invalid_inputs_fail() {
	let dir = tempfile::tempdir().unwrap();
	write_artifacts(dir.path());
	let inputs = [
		"{\"ecg\": [0.1,",
		r#"{"samples": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]}"#,
		r#"{"ecg": 0.5}"#,
		r#"{"ecg": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]}"#,
		r#"{"ecg": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]}"#,
	];
	for input in inputs.iter() {
		let mut cmd = command(Path::new(ECG_PREDICT));
		cmd.arg("--artifacts-dir").arg(dir.path());
		let output = run(cmd, input);
		assert!(!output.status.success(), "{}", input);
		assert_eq!(output.status.code(), Some(1));
		assert!(output.stdout.is_empty());
		assert!(String::from_utf8(output.stderr).unwrap().contains("error"));
	}
}

#[test]
fn test_expected_length() {
	let dir = tempfile::tempdir().unwrap();
	write_artifacts(dir.path());
	let mut cmd = command(Path::new(ECG_PREDICT));
	cmd.arg("--artifacts-dir")
		.arg(dir.path())
		.arg("--expected-length")
		.arg("200");
	let output = run(cmd, HEALTHY_INPUT);
	assert!(!output.status.success());
	let stderr = String::from_utf8(output.stderr).unwrap();
	assert!(stderr.contains("expected exactly 200 ecg values but received 9"));
}
