//! rowbind Engine - Operation layer
//!
//! Runs rendered statements through any `ConnectionGateway` and turns the
//! results back into records and typed models:
//! - `commands::persist`: save / create / update / delete
//! - `commands::query`: get / find / all
//! - `commands::relations`: has_one / has_many / belongs_to

pub mod commands;

pub use commands::persist::{
    adopt_generated_key, create, create_reporting_key, delete, delete_with_clock, save,
    save_reporting_key, save_reporting_key_with_clock, save_with_clock, update, WriteOutcome,
};
pub use commands::query::{all, all_as, find, find_as, find_or_fail, get, get_as};
pub use commands::relations::{
    belongs_to, belongs_to_as, has_many, has_many_as, has_one, has_one_as, resolve,
};
