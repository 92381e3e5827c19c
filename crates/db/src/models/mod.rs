pub mod character;
pub mod statistics;
