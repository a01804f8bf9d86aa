pub mod crop;
pub mod decision;
pub mod field;
pub mod forecast;
pub mod sensor;

pub use crop::*;
pub use decision::*;
pub use field::*;
pub use forecast::*;
pub use sensor::*;
