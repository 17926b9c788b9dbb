pub mod body;
pub mod envelope;
pub mod movement;
pub mod product;

pub use body::*;
pub use envelope::*;
pub use movement::*;
pub use product::*;
