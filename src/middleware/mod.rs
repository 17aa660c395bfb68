pub mod request_id;

pub use request_id::{current_request_id, request_logging, RequestId, REQUEST_ID_HEADER};
