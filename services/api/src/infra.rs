use dp2001::auth::KeyCache;
use dp2001::workflows::personnel::{Employee, InMemoryWorkflowStore, NewEmployee, WorkflowStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) keys: Arc<KeyCache>,
}

/// Employee records are create-once and owned by the store; the workflow
/// exposes no mutation endpoints for them, so local serving seeds a few.
pub(crate) fn seed_employees(store: &InMemoryWorkflowStore) -> Vec<Employee> {
    let seeds = [
        NewEmployee {
            name: "Dana Reyes".to_string(),
            title: "Field Technician".to_string(),
            location: "Queens Yard".to_string(),
            union_affiliation: Some("Local 237".to_string()),
            salary_step: Some("Step 3".to_string()),
        },
        NewEmployee {
            name: "Priya Natarajan".to_string(),
            title: "Station Supervisor".to_string(),
            location: "Jamaica Depot".to_string(),
            union_affiliation: Some("Local 100".to_string()),
            salary_step: None,
        },
        NewEmployee {
            name: "Marcus Webb".to_string(),
            title: "Payroll Analyst".to_string(),
            location: "Downtown Office".to_string(),
            union_affiliation: None,
            salary_step: Some("Step 5".to_string()),
        },
    ];

    seeds
        .into_iter()
        .map(|seed| store.insert_employee(seed).expect("seed employee inserted"))
        .collect()
}
