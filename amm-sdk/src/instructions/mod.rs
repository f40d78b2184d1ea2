pub mod builder;
pub mod liquidity;
pub mod native;
pub mod swap;

pub use builder::*;
pub use liquidity::*;
pub use native::*;
pub use swap::*;
