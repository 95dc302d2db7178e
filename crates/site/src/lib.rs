pub mod context;
pub mod pages;
pub mod settings;

pub use context::*;
pub use pages::*;
pub use settings::*;
