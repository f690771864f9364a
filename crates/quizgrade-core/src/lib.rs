//! quizgrade-core — Answer grading, attempt policies, and lesson scoring.
//!
//! This crate defines the question model, the grading engine, the attempt
//! policy evaluator, and the ingestion boundary that turns loosely-shaped
//! lesson documents into validated questions.

pub mod attempts;
pub mod error;
pub mod grading;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod policy;
pub mod report;
