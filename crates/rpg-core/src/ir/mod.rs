pub mod models;
pub mod resources;
pub mod security;
pub mod types;

pub use models::*;
pub use resources::*;
pub use security::*;
pub use types::{IrInfo, IrSpec, NormalizedName};
