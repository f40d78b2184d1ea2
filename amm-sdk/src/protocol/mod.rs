pub mod layout;
pub mod math;
pub mod pda;

pub use layout::*;
pub use math::*;
pub use pda::*;
