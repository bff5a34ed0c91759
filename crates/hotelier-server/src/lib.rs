#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod extract;
pub mod handler;
pub mod service;
pub mod validate;

/// Tracing target for authentication operations.
pub const TRACING_TARGET_AUTHENTICATION: &str = "hotelier_server::authentication";

/// Tracing target for authorization operations.
pub const TRACING_TARGET_AUTHORIZATION: &str = "hotelier_server::authorization";

pub use crate::error::{BoxedError, Error, ErrorKind, Result};
