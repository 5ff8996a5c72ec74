//! Command implementations.

mod run;
mod validate;

pub use run::run_collect;
pub use validate::run_validate;
