pub mod generation;
pub mod network;
