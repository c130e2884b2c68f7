//! The orchestration layer of the blog core: the post service and the
//! patch/filter machinery it drives.

pub mod filter;
pub mod patch;
pub mod post_service;

pub use filter::PostFilter;
pub use post_service::PostService;
