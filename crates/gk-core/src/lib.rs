pub mod error;
pub mod float;
pub mod tolerance;
pub mod traits;

pub use error::{GeomError, Result};
pub use tolerance::Tolerance;
pub use traits::Validate;
