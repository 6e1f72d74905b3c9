pub mod group;
pub mod summary;

pub use summary::Summary;
