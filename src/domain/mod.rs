pub mod entities;
pub mod errors;
pub mod ports;
pub mod report;
pub mod token;
