pub mod aggregator;
pub mod dto;
pub mod seed;
