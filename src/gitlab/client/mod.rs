pub mod base;
pub mod v4;

pub use base::BaseClient;
pub use v4::V4Client;
