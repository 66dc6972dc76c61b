pub mod backend;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod error;
pub mod models;
pub mod page;

pub use backend::{AnswerStream, Backend, HttpBackend};
pub use config::ClientConfig;
pub use controller::{Key, PageController};
pub use decoder::StreamDecoder;
pub use error::{BackendError, ConfigError};
pub use models::*;
pub use page::{Control, Page, PageEvent};
