// Report engine building blocks and shared errors/models
pub mod report {
    pub use crate::report::*;
}

pub mod scoring {
    pub use crate::scoring::*;
}

pub mod provenance {
    pub use crate::provenance::*;
}

pub mod export {
    pub use crate::export::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
