use chrono::Utc;
use ocula_core::{EyeRecord, NewEyeRecord};
use tokio::sync::watch;

use crate::{Collection, EyeRecordRepository, Latency, ObservableList, RepoResult};

pub struct MockEyeRecordRepository {
    items: ObservableList<EyeRecord>,
    latency: Latency,
}

impl MockEyeRecordRepository {
    pub fn new(items: Vec<EyeRecord>, latency: Latency) -> Self {
        Self {
            items: ObservableList::new(items),
            latency,
        }
    }

    pub fn seeded(latency: Latency) -> Self {
        Self::new(crate::seed::demo_eye_records(), latency)
    }
}

#[async_trait::async_trait]
impl EyeRecordRepository for MockEyeRecordRepository {
    fn observe(&self) -> watch::Receiver<Collection<EyeRecord>> {
        self.items.observe()
    }

    async fn for_customer(&self, customer_id: &str) -> RepoResult<Vec<EyeRecord>> {
        self.latency.simulate().await;
        let mut records: Vec<EyeRecord> = self.items.query(|items| {
            items
                .iter()
                .filter(|r| r.customer_id == customer_id)
                .cloned()
                .collect()
        });
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(records)
    }

    async fn add(&self, record: NewEyeRecord) -> RepoResult<EyeRecord> {
        self.latency.simulate().await;
        let created = EyeRecord {
            id: super::new_id(),
            customer_id: record.customer_id,
            side: record.side,
            iris_color: record.iris_color,
            iris_diameter_mm: record.iris_diameter_mm,
            pupil_diameter_mm: record.pupil_diameter_mm,
            sclera_shade: record.sclera_shade,
            notes: record.notes,
            recorded_at: Utc::now(),
        };
        self.items.push(created.clone());
        Ok(created)
    }
}
