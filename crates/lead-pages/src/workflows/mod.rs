pub mod catalog;
pub mod publishing;
pub mod wizard;
