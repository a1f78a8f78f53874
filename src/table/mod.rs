pub mod errors;
pub mod legals;
pub mod types;

pub use errors::*;
pub use legals::*;
pub use types::*;
