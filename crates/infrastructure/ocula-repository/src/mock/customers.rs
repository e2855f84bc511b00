use chrono::{DateTime, Utc};
use ocula_core::{Customer, NewCustomer};
use tokio::sync::watch;

use crate::{Collection, CustomerRepository, Latency, ObservableList, RepoResult, RepositoryError};

pub struct MockCustomerRepository {
    items: ObservableList<Customer>,
    latency: Latency,
}

impl MockCustomerRepository {
    pub fn new(items: Vec<Customer>, latency: Latency) -> Self {
        Self {
            items: ObservableList::new(items),
            latency,
        }
    }

    pub fn seeded(now: DateTime<Utc>, latency: Latency) -> Self {
        Self::new(crate::seed::demo_customers(now), latency)
    }
}

#[async_trait::async_trait]
impl CustomerRepository for MockCustomerRepository {
    fn observe(&self) -> watch::Receiver<Collection<Customer>> {
        self.items.observe()
    }

    fn snapshot(&self) -> Collection<Customer> {
        self.items.snapshot()
    }

    async fn list(&self) -> RepoResult<Collection<Customer>> {
        self.latency.simulate().await;
        Ok(self.items.snapshot())
    }

    async fn get(&self, id: &str) -> RepoResult<Customer> {
        self.latency.simulate().await;
        self.items
            .query(|items| items.iter().find(|c| c.id == id).cloned())
            .ok_or_else(|| RepositoryError::not_found("Customer", id))
    }

    async fn add(&self, customer: NewCustomer) -> RepoResult<Customer> {
        self.latency.simulate().await;
        let email = customer.email.trim().to_string();
        self.items.try_update(|items| {
            if items.iter().any(|c| c.email.eq_ignore_ascii_case(&email)) {
                return Err(RepositoryError::Duplicate {
                    entity: "Customer",
                    key: email.clone(),
                });
            }
            let created = Customer {
                id: super::new_id(),
                full_name: customer.full_name.trim().to_string(),
                email: email.clone(),
                phone: customer.phone.trim().to_string(),
                date_of_birth: customer.date_of_birth,
                affected_eye: customer.affected_eye,
                notes: customer.notes,
                created_at: Utc::now(),
            };
            items.push(created.clone());
            Ok(created)
        })
    }

    async fn update(&self, customer: Customer) -> RepoResult<Customer> {
        self.latency.simulate().await;
        self.items.try_update(|items| {
            let slot = items
                .iter_mut()
                .find(|c| c.id == customer.id)
                .ok_or_else(|| RepositoryError::not_found("Customer", &customer.id))?;
            *slot = customer.clone();
            Ok(customer)
        })
    }

    async fn search(&self, query: &str) -> RepoResult<Vec<Customer>> {
        self.latency.simulate().await;
        Ok(self
            .items
            .query(|items| items.iter().filter(|c| c.matches(query)).cloned().collect()))
    }

    fn count(&self) -> usize {
        self.items.query(|items| items.len())
    }
}
