pub mod chart;
pub mod display;
pub mod index;
pub mod quote;
pub mod response;

pub use chart::*;
pub use display::*;
pub use index::*;
pub use quote::*;
pub use response::*;
