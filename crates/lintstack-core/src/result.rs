//! Result type alias for resolution operations

use crate::error::ResolveError;

/// Standard Result type for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;
