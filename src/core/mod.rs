pub mod error;
pub mod types;
pub mod value;

pub use error::{PageError, Result};
pub use types::{Renderer, Table, TypeTag};
pub use value::{Object, Value};
