pub mod editor;
pub mod loaders;
pub mod store;

pub use editor::EditorConfig;
pub use store::StoreConfig;

#[async_trait::async_trait]
pub trait Configs: Sized {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>>;
}
