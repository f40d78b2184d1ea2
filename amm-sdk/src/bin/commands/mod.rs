// Command modules for the ammv4 CLI

pub mod execute;
pub mod fetch_pool;
pub mod quote;
pub mod utils;
