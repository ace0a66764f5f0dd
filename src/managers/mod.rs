// Smartmarks state managers
// Managers handle stateful operations: the persistent store, the visible
// collection of one view, and the per-mount dashboard session.

pub mod bookmark_list;
pub mod bookmark_store;
pub mod dashboard;
