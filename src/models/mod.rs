pub mod advisory;
pub mod farm;
pub mod weather;

pub use advisory::*;
pub use farm::*;
pub use weather::*;
