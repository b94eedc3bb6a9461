pub mod http;
#[cfg(test)]
pub mod mock;
pub mod traits;

pub use http::{HttpConfig, HttpTransport};
pub use traits::MessageTransport;
