//! Procedural generation of propositional-logic quiz questions.
//!
//! The pipeline samples a [`models::Plan`] and [`models::Profile`], asks a
//! category generator for semantically checked candidate pools, renders the
//! prompt and shuffles the options. [`services::QuestionService`] drives the
//! whole thing with bounded retries.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::AppConfig;
pub use error::{ConfigError, GenerationError};
pub use models::{AnswerType, Category, Difficulty, Formula, Question};
pub use services::{QuestionRequest, QuestionService};
