// Upload authorization and asset deletion policy

pub mod delete;
pub mod policy;
pub mod upload;

pub use delete::AssetDeleter;
pub use policy::{UploadFolder, DELETABLE_PREFIX};
pub use upload::UploadAuthorizer;
