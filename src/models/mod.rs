pub mod todo;
pub mod category;

pub use todo::*;
pub use category::*;
