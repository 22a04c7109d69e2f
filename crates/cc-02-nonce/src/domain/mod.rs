pub mod errors;
pub mod window;

pub use errors::*;
pub use window::*;
