pub mod locations;
pub mod session;
