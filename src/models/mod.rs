pub mod client;
pub mod features;
pub mod score;

pub use client::*;
pub use features::*;
pub use score::*;
