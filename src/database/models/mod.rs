pub mod image;
pub mod lane;
pub mod memory;
pub mod tag;
pub mod user;

pub use image::MemoryImage;
pub use lane::{Lane, LaneDetail, LaneSummary};
pub use memory::{Memory, MemoryPreview, MemoryWithImages};
pub use tag::{Tag, TagWithCount};
pub use user::{PublicUser, User};
