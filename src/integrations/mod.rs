//! External service integrations.

pub mod analysis_client {
    pub use crate::analysis_client::*;
}
