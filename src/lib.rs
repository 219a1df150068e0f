mod client;
mod diff;
mod error;
mod logger;
mod normalize;
pub mod protocol;
mod registry;
mod translation;
mod types;

pub use client::{PanelClient, PanelClientBuilder};
pub use error::{Error, Result};
pub use logger::MessageLogMode;
pub use normalize::Normalizer;
pub use protocol::{decode_document, Endpoints};
pub use registry::DeviceRegistry;
pub use translation::{Tables, XT1_TABLES, XT2_TABLES};
pub use types::*;
