//! Launch-side data types: inbound requests, extracted parameters, and responses.

pub mod params;
pub mod request;
pub mod response;

pub use params::*;
pub use request::*;
pub use response::*;
