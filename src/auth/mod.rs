//! Authentication primitives
//!
//! Password credentials and the registry the request gate checks against.

pub mod credential;
pub mod registry;

pub use credential::{Credential, DEFAULT_ITERATIONS};
pub use registry::{AuthError, UserRegistry};
