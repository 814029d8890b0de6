mod error;
mod event;
mod normalizer;
pub mod raw;

pub use error::NormalizeError;
pub use event::*;
pub use normalizer::{decode_payload, normalize};
pub use raw::RawEvent;
