pub mod catalog;

pub use catalog::MockCatalog;
