pub mod response;
pub mod service;
pub mod schema;

pub use response::*;
pub use service::*;
pub use schema::*;
