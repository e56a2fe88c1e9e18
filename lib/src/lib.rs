mod accessor;
mod corridor;
mod error;
mod filter;
mod tolerance;

pub use accessor::*;
pub use error::*;
pub use filter::*;
pub use tolerance::*;
