pub mod audit;
pub mod employee;
pub mod request;
pub mod status;
pub mod supply;
