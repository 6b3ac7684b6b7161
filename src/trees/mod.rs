pub mod median;
pub mod node;
pub mod params;
pub mod regressor;
pub mod splitter;
pub mod storage;
