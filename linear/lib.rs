/*!
This crate implements inference for linear binary classifiers. A [`BinaryClassifier`](struct.BinaryClassifier.html) computes a logit as the dot product of the features with its weights plus a bias, and uses the sigmoid activation function to turn the logit into a probability.
*/

mod binary_classifier;

pub use binary_classifier::BinaryClassifier;
pub use ecg_features::ShapeMismatchError;
