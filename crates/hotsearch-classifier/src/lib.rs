//! Topic classification of hot-search titles by weighted keyword scoring.

pub mod classifier;
mod keywords;

pub use classifier::{core_key, Classifier};
