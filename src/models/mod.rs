pub mod link;
pub mod settings;

pub use link::*;
pub use settings::*;
