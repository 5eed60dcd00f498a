//! Request authorization

pub mod header;

pub use header::{CustomHeaders, HeaderSupplier, SessionHeaderSupplier, AUTHORIZATION_HEADER};
