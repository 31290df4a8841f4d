//! Shared primitives for the parley crates

#![allow(clippy::must_use_candidate)]

mod error;

pub use error::{ErrorBody, ErrorResponse, HttpError};
