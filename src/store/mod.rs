pub mod audit;
pub mod requests;
pub mod roster;
