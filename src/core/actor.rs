pub mod actor_cell;
pub mod actor_path;
pub mod actor_ref;
