//! FFI boundary crate for the LazyPlan UI shell.
//! All exported surface lives in [`api`].

pub mod api;
