use chrono::{DateTime, Utc};
use ocula_core::JourneyMilestone;
use tokio::sync::watch;

use crate::{Collection, JourneyRepository, Latency, ObservableList, RepoResult, RepositoryError};

pub struct MockJourneyRepository {
    items: ObservableList<JourneyMilestone>,
    latency: Latency,
}

impl MockJourneyRepository {
    pub fn new(items: Vec<JourneyMilestone>, latency: Latency) -> Self {
        Self {
            items: ObservableList::new(items),
            latency,
        }
    }

    pub fn seeded(now: DateTime<Utc>, latency: Latency) -> Self {
        Self::new(crate::seed::demo_milestones(now), latency)
    }
}

#[async_trait::async_trait]
impl JourneyRepository for MockJourneyRepository {
    fn observe(&self) -> watch::Receiver<Collection<JourneyMilestone>> {
        self.items.observe()
    }

    async fn for_customer(&self, customer_id: &str) -> RepoResult<Vec<JourneyMilestone>> {
        self.latency.simulate().await;
        let mut milestones: Vec<JourneyMilestone> = self.items.query(|items| {
            items
                .iter()
                .filter(|m| m.customer_id == customer_id)
                .cloned()
                .collect()
        });
        milestones.sort_by_key(|m| m.stage);
        Ok(milestones)
    }

    /// Completing an already completed milestone keeps the first timestamp.
    async fn complete(&self, id: &str, now: DateTime<Utc>) -> RepoResult<JourneyMilestone> {
        self.latency.simulate().await;
        self.items.try_update(|items| {
            let m = items
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| RepositoryError::not_found("JourneyMilestone", id))?;
            if m.completed_at.is_none() {
                m.completed_at = Some(now);
            }
            Ok(m.clone())
        })
    }
}
