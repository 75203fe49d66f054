//! Domain types shared by the creative-direction compiler: the record schema,
//! the error type, and record validation.

pub mod error;
pub mod hashing;
pub mod schema;
pub mod types;
pub mod validation;
