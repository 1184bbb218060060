//! Structural metadata extracted from interface declarations.

mod method;
mod types;

pub use method::{InterfaceDecl, Method, MethodResult, Param};
pub use types::{ChanDir, Field, InterfaceElem, Signature, StructField, TypeDescriptor, TypeTerm};
