/// Backends for tests.
pub mod backend;
/// Tree-building helpers.
pub mod tree;
