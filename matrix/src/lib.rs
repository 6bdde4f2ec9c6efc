//! Test matrix generation for coordinator evaluation campaigns.
//!
//! This crate turns a campaign into directories the simulation can run:
//! - Uniform sampling of distinct combinations from the parameter space
//! - Weight-profile draws and cyclic start-offset assignment
//! - Rendering of the `KEY VALUE` configuration template
//! - One case directory per sampled combination per coordinator
//!
//! # Design Principles
//!
//! - **Plan, then write** - Every fatal check runs before the first directory
//!   is created.
//! - **Deterministic layout** - Cases are sorted by identifier, so a seed
//!   fully determines the tree.
//! - **Keep going** - A directory that cannot be written is reported and the
//!   rest of the matrix is still materialized.

mod case;
mod error;
mod generate;
pub mod layout;
mod template;

pub use case::{plan_cases, sample_combinations, TestCase};
pub use error::{GenerateError, GenerateResult};
pub use generate::{GenerateOptions, GenerateReport, MatrixGenerator};
pub use template::{parse_config_values, ConfigTemplate};
