//! ## Crate layout
//! - `config`: generation settings loaded from TOML.
//! - `model`: semantic-source interface, descriptor builders, contract
//!   validation and the metadata model.
//! - `pass`: drives discovered items through the builders into one model.
//!
//! The `prelude` module carries the vocabulary a generator front end needs to
//! feed a pass and read its result.

pub use rivet_config as config;
pub use rivet_model as model;

pub mod pass;

use thiserror::Error as ThisError;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        config::GeneratorConfig,
        model::prelude::*,
        pass::{
            CancelToken, Discovered, DiscoveredInterface, DiscoveredType, ExtractionPass,
            PassReport,
        },
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] rivet_config::ConfigError),

    #[error(transparent)]
    Model(#[from] rivet_model::Error),

    #[error("extraction cancelled after {processed} of {total} items")]
    Cancelled { processed: usize, total: usize },
}

impl From<rivet_model::library::LibraryError> for Error {
    fn from(err: rivet_model::library::LibraryError) -> Self {
        Self::Model(err.into())
    }
}
