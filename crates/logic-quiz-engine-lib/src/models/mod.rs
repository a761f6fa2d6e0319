pub mod formula;
pub mod plan;
pub mod pools;
pub mod question;
pub mod rules;

pub use formula::*;
pub use plan::*;
pub use pools::*;
pub use question::*;
