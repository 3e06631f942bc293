pub mod catalog;
pub mod classifier;
pub mod normalize;
pub mod sorter;
