pub mod variable;

pub use variable::{FlagValue, Variable, VariableRecord, VariableType};
