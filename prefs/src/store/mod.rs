pub mod sqlite_store;

#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load_all(&self) -> anyhow::Result<Vec<crate::model::PreferenceRecord>>;
    async fn save(&self, record: &crate::model::PreferenceRecord) -> anyhow::Result<()>;
    async fn delete(&self, user_id: crate::model::UserId) -> anyhow::Result<()>;
}
