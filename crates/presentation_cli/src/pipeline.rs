//! Wiring of the moderation services from configuration

use std::sync::Arc;

use anyhow::Context;
use application::{
    AgeEvaluator, ContentModerationService, LexicalClassifier, ModerationRecordManager,
    PiiDetector,
};
use infrastructure::{AppConfig, AsyncDatabase, SqliteModerationRecordStore, load_classifier};
use tracing::debug;

/// Services assembled for one CLI invocation
#[derive(Debug)]
pub struct Pipeline {
    pub classifier: Arc<LexicalClassifier>,
    pub records: Arc<ModerationRecordManager>,
    pub moderation: ContentModerationService,
    pub age: AgeEvaluator,
    db: AsyncDatabase,
}

impl Pipeline {
    /// Compile the tier table, open the record database and run migrations
    pub async fn build(config: &AppConfig) -> anyhow::Result<Self> {
        let classifier = Arc::new(
            load_classifier(config.moderation.tier_table_path.as_deref())
                .context("failed to load tier table")?,
        );
        debug!(version = classifier.version(), "Classifier ready");

        let db = AsyncDatabase::new(&config.database)
            .await
            .with_context(|| format!("failed to open database {}", config.database.url))?;
        db.migrate().await.context("failed to run migrations")?;

        let store = SqliteModerationRecordStore::new(db.pool().clone());
        let records = Arc::new(ModerationRecordManager::new(Arc::new(store)));

        let moderation = ContentModerationService::new(
            Arc::clone(&classifier),
            PiiDetector::new()?,
            Arc::clone(&records),
            config.moderation.policy(),
        );
        let age = AgeEvaluator::new(Arc::clone(&classifier), config.moderation.age)?;

        Ok(Self {
            classifier,
            records,
            moderation,
            age,
            db,
        })
    }

    /// Close the database pool
    pub async fn shutdown(self) {
        self.db.close().await;
    }
}
