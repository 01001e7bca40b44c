mod config;
mod defaults;
mod error;
mod template;

pub use config::*;
pub use defaults::*;
pub use error::*;
pub use template::*;
