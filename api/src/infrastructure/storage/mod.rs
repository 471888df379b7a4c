mod core;
mod fs_store;
mod s3_store;
pub use core::*;
pub use fs_store::FsStoragePort;
pub use s3_store::S3StoragePort;
