//! Top-level error type for docli commands

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::output::OutputError;

/// Any error that ends a command
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
