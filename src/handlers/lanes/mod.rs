pub mod create;
pub mod delete;
pub mod list;
pub mod memories;
pub mod show;
pub mod update;
pub mod utils;

// Re-export handler functions for use in routing
pub use create::create;
pub use delete::delete;
pub use list::{list, my};
pub use memories::create as create_memory;
pub use memories::list as list_memories;
pub use show::show;
pub use update::update;
