use std::sync::Arc;

use ocula_core::validation::{validate_customer, validate_new_customer, validate_new_eye_record};
use ocula_core::{Customer, EyeRecord, NewCustomer, NewEyeRecord};
use ocula_repository::{CustomerRepository, EyeRecordRepository, RepositoryError};
use tracing::info;

use crate::app_core::{Controller, Scope};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomersState {
    pub is_loading: bool,
    pub query: String,
    pub customers: Vec<Customer>,
    pub selected: Option<Customer>,
    /// Records of the selected customer, newest first.
    pub eye_records: Vec<EyeRecord>,
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum CustomersEvent {
    Load,
    Search(String),
    Select(String),
    ClearSelection,
    Add(NewCustomer),
    Update(Customer),
    AddEyeRecord(NewEyeRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomersEffect {
    NavigateToCustomer(String),
    ShowSuccess(String),
    ShowError(String),
}

type CustomersScope = Scope<CustomersState, CustomersEffect>;

/// Patient records and the prosthesis measurements attached to them.
pub struct CustomersController {
    customers: Arc<dyn CustomerRepository>,
    eye_records: Arc<dyn EyeRecordRepository>,
}

impl CustomersController {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        eye_records: Arc<dyn EyeRecordRepository>,
    ) -> Self {
        Self {
            customers,
            eye_records,
        }
    }

    fn fail(scope: &CustomersScope, e: RepositoryError) {
        let message = e.to_string();
        scope.update_state(|s| CustomersState {
            is_loading: false,
            error: Some(message.clone()),
            ..s
        });
        scope.send_effect(CustomersEffect::ShowError(message));
    }

    fn invalid(scope: &CustomersScope, message: String) {
        scope.update_state(|s| CustomersState {
            error: Some(message),
            ..s
        });
    }

    fn start_loading(scope: &CustomersScope) {
        scope.update_state(|s| CustomersState {
            is_loading: true,
            error: None,
            ..s
        });
    }

    fn matching(&self, query: &str) -> Vec<Customer> {
        self.customers
            .snapshot()
            .iter()
            .filter(|c| c.matches(query))
            .cloned()
            .collect()
    }

    async fn select(&self, id: String, scope: &CustomersScope) {
        Self::start_loading(scope);
        let customer = match self.customers.get(&id).await {
            Ok(c) => c,
            Err(e) => return Self::fail(scope, e),
        };
        match self.eye_records.for_customer(&id).await {
            Ok(records) => {
                scope.update_state(|s| CustomersState {
                    is_loading: false,
                    selected: Some(customer),
                    eye_records: records,
                    ..s
                });
                scope.send_effect(CustomersEffect::NavigateToCustomer(id));
            }
            Err(e) => Self::fail(scope, e),
        }
    }
}

#[async_trait::async_trait]
impl Controller for CustomersController {
    type State = CustomersState;
    type Event = CustomersEvent;
    type Effect = CustomersEffect;

    const NAME: &'static str = "customers";

    async fn on_event(
        &mut self,
        event: CustomersEvent,
        scope: &CustomersScope,
    ) -> anyhow::Result<()> {
        match event {
            CustomersEvent::Load => {
                Self::start_loading(scope);
                match self.customers.list().await {
                    Ok(all) => scope.update_state(|s| CustomersState {
                        is_loading: false,
                        customers: all.iter().filter(|c| c.matches(&s.query)).cloned().collect(),
                        ..s
                    }),
                    Err(e) => Self::fail(scope, e),
                }
            }

            CustomersEvent::Search(query) => {
                scope.update_state(|s| CustomersState {
                    is_loading: true,
                    query: query.clone(),
                    error: None,
                    ..s
                });
                match self.customers.search(&query).await {
                    Ok(customers) => scope.update_state(|s| CustomersState {
                        is_loading: false,
                        customers,
                        ..s
                    }),
                    Err(e) => Self::fail(scope, e),
                }
            }

            CustomersEvent::Select(id) => self.select(id, scope).await,

            CustomersEvent::ClearSelection => scope.update_state(|s| CustomersState {
                selected: None,
                eye_records: Vec::new(),
                ..s
            }),

            CustomersEvent::Add(new) => {
                if let Err(e) = validate_new_customer(&new) {
                    Self::invalid(scope, e.to_string());
                    return Ok(());
                }
                Self::start_loading(scope);
                match self.customers.add(new).await {
                    Ok(created) => {
                        info!(id = %created.id, "customer added");
                        let id = created.id.clone();
                        scope.update_state(|s| CustomersState {
                            is_loading: false,
                            customers: self.matching(&s.query),
                            selected: Some(created),
                            eye_records: Vec::new(),
                            ..s
                        });
                        scope.send_effect(CustomersEffect::ShowSuccess("Customer added".into()));
                        scope.send_effect(CustomersEffect::NavigateToCustomer(id));
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }

            CustomersEvent::Update(customer) => {
                if let Err(e) = validate_customer(&customer) {
                    Self::invalid(scope, e.to_string());
                    return Ok(());
                }
                Self::start_loading(scope);
                match self.customers.update(customer).await {
                    Ok(updated) => {
                        scope.update_state(|s| {
                            let customers = s
                                .customers
                                .into_iter()
                                .map(|c| if c.id == updated.id { updated.clone() } else { c })
                                .collect();
                            let selected = s.selected.map(|c| {
                                if c.id == updated.id {
                                    updated.clone()
                                } else {
                                    c
                                }
                            });
                            CustomersState {
                                is_loading: false,
                                customers,
                                selected,
                                ..s
                            }
                        });
                        scope.send_effect(CustomersEffect::ShowSuccess(
                            "Customer updated".into(),
                        ));
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }

            CustomersEvent::AddEyeRecord(record) => {
                if let Err(e) = validate_new_eye_record(&record) {
                    Self::invalid(scope, e.to_string());
                    return Ok(());
                }
                Self::start_loading(scope);
                match self.eye_records.add(record).await {
                    Ok(created) => {
                        scope.update_state(|s| {
                            let mut eye_records = s.eye_records;
                            let is_selected = s
                                .selected
                                .as_ref()
                                .is_some_and(|c| c.id == created.customer_id);
                            if is_selected {
                                eye_records.insert(0, created);
                            }
                            CustomersState {
                                is_loading: false,
                                eye_records,
                                ..s
                            }
                        });
                        scope.send_effect(CustomersEffect::ShowSuccess(
                            "Eye record saved".into(),
                        ));
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }
        }
        Ok(())
    }

    fn recover(state: CustomersState) -> CustomersState {
        CustomersState {
            is_loading: false,
            ..state
        }
    }
}
