pub mod migrations;
pub mod upstream;

pub use migrations::{MigrationService, MIGRATOR};
pub use upstream::{ForwardRequest, ForwardResponse, UpstreamClient};
