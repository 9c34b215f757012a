//! Todo Types - Pure type definitions shared by the todo service
//!
//! This crate contains only data types with no async runtime or database
//! driver dependencies. The server maps driver rows into these types at the
//! storage boundary.

pub mod request;
pub mod response;
pub mod todo;

pub use request::*;
pub use response::*;
pub use todo::*;
