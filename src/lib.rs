pub mod config;
pub mod network;
mod resp;
mod stream;

pub use config::*;
pub use resp::*;
pub use stream::*;
