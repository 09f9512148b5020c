mod category;
mod expense;
mod money;
mod month;

pub use category::*;
pub use expense::*;
pub use money::*;
pub use month::*;
