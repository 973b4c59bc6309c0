//! Loading and validation of authored game directories.

pub mod load;
pub mod summary;
pub mod validate;

pub use load::*;
pub use summary::*;
pub use validate::*;
