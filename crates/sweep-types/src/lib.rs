pub mod command;
pub mod errors;
pub mod experiment;

pub use command::*;
pub use errors::*;
pub use experiment::*;
