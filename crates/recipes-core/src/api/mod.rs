//! HTTP transport and error taxonomy for the recipe endpoint.
//!
//! This module provides the `Transport` trait used by the manager to
//! perform a single GET, the reqwest-backed `HttpTransport`, and the
//! `RecipeError` type that HTTP statuses are mapped onto.

pub mod error;
pub mod transport;

pub use error::RecipeError;
pub use transport::{HttpResponse, HttpTransport, Transport, TransportError};
