pub mod probe;
pub mod send;
