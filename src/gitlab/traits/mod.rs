pub mod variable;

pub use variable::VariableOperations;
