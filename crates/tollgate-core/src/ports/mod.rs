//! Ports - trait definitions the infrastructure must implement.

mod counter_store;

pub use counter_store::{CounterStore, StoreError, WindowState};
