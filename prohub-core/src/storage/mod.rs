pub mod files;
pub mod traits;

pub use files::FileContentStore;
pub use traits::ContentStore;
