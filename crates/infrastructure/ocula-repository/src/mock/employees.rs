use ocula_core::{Employee, EmployeeRole, NewEmployee};
use tokio::sync::watch;

use crate::{Collection, EmployeeRepository, Latency, ObservableList, RepoResult, RepositoryError};

pub struct MockEmployeeRepository {
    items: ObservableList<Employee>,
    latency: Latency,
}

impl MockEmployeeRepository {
    pub fn new(items: Vec<Employee>, latency: Latency) -> Self {
        Self {
            items: ObservableList::new(items),
            latency,
        }
    }

    pub fn seeded(latency: Latency) -> Self {
        Self::new(crate::seed::demo_employees(), latency)
    }
}

#[async_trait::async_trait]
impl EmployeeRepository for MockEmployeeRepository {
    fn observe(&self) -> watch::Receiver<Collection<Employee>> {
        self.items.observe()
    }

    fn snapshot(&self) -> Collection<Employee> {
        self.items.snapshot()
    }

    async fn list(&self) -> RepoResult<Collection<Employee>> {
        self.latency.simulate().await;
        Ok(self.items.snapshot())
    }

    async fn add(&self, employee: NewEmployee) -> RepoResult<Employee> {
        self.latency.simulate().await;
        let email = employee.email.trim().to_string();
        self.items.try_update(|items| {
            if items.iter().any(|e| e.email.eq_ignore_ascii_case(&email)) {
                return Err(RepositoryError::Duplicate {
                    entity: "Employee",
                    key: email.clone(),
                });
            }
            let created = Employee {
                id: super::new_id(),
                full_name: employee.full_name.trim().to_string(),
                email: email.clone(),
                role: employee.role,
                active: true,
            };
            items.push(created.clone());
            Ok(created)
        })
    }

    async fn set_active(&self, id: &str, active: bool) -> RepoResult<Employee> {
        self.latency.simulate().await;
        self.items.try_update(|items| {
            let e = items
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| RepositoryError::not_found("Employee", id))?;
            e.active = active;
            Ok(e.clone())
        })
    }

    async fn search(&self, query: &str) -> RepoResult<Vec<Employee>> {
        self.latency.simulate().await;
        Ok(self
            .items
            .query(|items| items.iter().filter(|e| e.matches(query)).cloned().collect()))
    }

    async fn filter_by_role(&self, role: EmployeeRole) -> RepoResult<Vec<Employee>> {
        self.latency.simulate().await;
        Ok(self
            .items
            .query(|items| items.iter().filter(|e| e.role == role).cloned().collect()))
    }
}
