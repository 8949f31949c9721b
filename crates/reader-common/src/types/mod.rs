mod core;
mod lifecycle;
mod viewport;

pub use self::core::*;
pub use lifecycle::*;
pub use viewport::*;
