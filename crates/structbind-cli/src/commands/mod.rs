pub mod catalog;
pub mod converge;
pub mod resolve;
