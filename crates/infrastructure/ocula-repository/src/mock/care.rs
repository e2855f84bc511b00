use chrono::{DateTime, Utc};
use ocula_core::{CareCategory, CareInstruction, NewCareInstruction};
use tokio::sync::watch;

use crate::{
    CareInstructionRepository, Collection, Latency, ObservableList, RepoResult, RepositoryError,
};

pub struct MockCareInstructionRepository {
    items: ObservableList<CareInstruction>,
    latency: Latency,
}

impl MockCareInstructionRepository {
    pub fn new(items: Vec<CareInstruction>, latency: Latency) -> Self {
        Self {
            items: ObservableList::new(items),
            latency,
        }
    }

    pub fn seeded(latency: Latency) -> Self {
        Self::new(crate::seed::demo_care_instructions(), latency)
    }
}

#[async_trait::async_trait]
impl CareInstructionRepository for MockCareInstructionRepository {
    fn observe(&self) -> watch::Receiver<Collection<CareInstruction>> {
        self.items.observe()
    }

    async fn for_customer(&self, customer_id: &str) -> RepoResult<Vec<CareInstruction>> {
        self.latency.simulate().await;
        Ok(self.items.query(|items| {
            items
                .iter()
                .filter(|c| c.customer_id == customer_id)
                .cloned()
                .collect()
        }))
    }

    async fn add(&self, instruction: NewCareInstruction) -> RepoResult<CareInstruction> {
        self.latency.simulate().await;
        let created = CareInstruction {
            id: super::new_id(),
            customer_id: instruction.customer_id,
            title: instruction.title.trim().to_string(),
            description: instruction.description,
            frequency: instruction.frequency,
            category: instruction.category,
            completed: false,
            last_completed_at: None,
        };
        self.items.push(created.clone());
        Ok(created)
    }

    async fn toggle_completed(&self, id: &str, now: DateTime<Utc>) -> RepoResult<CareInstruction> {
        self.latency.simulate().await;
        self.items.try_update(|items| {
            let c = items
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| RepositoryError::not_found("CareInstruction", id))?;
            c.completed = !c.completed;
            if c.completed {
                c.last_completed_at = Some(now);
            }
            Ok(c.clone())
        })
    }

    async fn filter_by_category(
        &self,
        customer_id: &str,
        category: CareCategory,
    ) -> RepoResult<Vec<CareInstruction>> {
        self.latency.simulate().await;
        Ok(self.items.query(|items| {
            items
                .iter()
                .filter(|c| c.customer_id == customer_id && c.category == category)
                .cloned()
                .collect()
        }))
    }

    fn count_open(&self) -> usize {
        self.items
            .query(|items| items.iter().filter(|c| !c.completed).count())
    }
}
