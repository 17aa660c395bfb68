pub mod greeting;
pub mod health;
pub mod pages;
pub mod proxy;

pub use greeting::*;
pub use health::*;
pub use pages::*;
pub use proxy::*;
