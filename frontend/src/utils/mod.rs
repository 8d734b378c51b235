pub mod geo;
pub mod storage;
