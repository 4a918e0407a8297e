pub mod client;
pub mod suite;
pub mod token;
pub mod transport;
