use crate::infra::seed_employees;
use clap::Args;
use dp2001::auth::Principal;
use dp2001::error::AppError;
use dp2001::workflows::personnel::{
    ActionRequestStatus, ActionType, InMemoryWorkflowStore, WorkflowEngine, WorkflowStore,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Personnel action exercised by the demo workflow
    #[arg(long, default_value = "hire", value_parser = parse_action_type)]
    pub(crate) action_type: Option<ActionType>,
    /// Reject the pre-validation gate instead of approving it
    #[arg(long)]
    pub(crate) reject_gate: bool,
}

fn parse_action_type(raw: &str) -> Result<ActionType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "hire" => Ok(ActionType::Hire),
        "transfer" => Ok(ActionType::Transfer),
        "title_change" => Ok(ActionType::TitleChange),
        "termination" => Ok(ActionType::Termination),
        other => Err(format!(
            "unknown action type '{other}': expected hire, transfer, title_change, or termination"
        )),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let action_type = args.action_type.unwrap_or(ActionType::Hire);

    let store = Arc::new(InMemoryWorkflowStore::new());
    let employees = seed_employees(&store);
    let engine = WorkflowEngine::new(store.clone());
    let operator = Principal("demo-operator".to_string());
    let subject = &employees[0];

    println!("== DP-2001 workflow demo ==");
    println!(
        "subject: #{} {} ({}, {})",
        subject.id, subject.name, subject.title, subject.location
    );

    let gate = engine.create_prevalidation(
        &operator,
        subject.id,
        action_type,
        Some("demo walkthrough".to_string()),
    )?;
    println!(
        "pre-validation #{} opened for '{}' -> {}",
        gate.id,
        action_type.label(),
        gate.status.label()
    );

    if args.reject_gate {
        let rejected = engine.reject_prevalidation(&operator, gate.id)?;
        println!("pre-validation #{} -> {}", rejected.id, rejected.status.label());

        match engine.create_action_request(&operator, subject.id, gate.id, action_type, None) {
            Err(err) => println!("DP-2001 filing refused as expected: {err}"),
            Ok(record) => println!("unexpected filing accepted: #{}", record.id),
        }
        print_audit_trail(&store);
        return Ok(());
    }

    let approved = engine.approve_prevalidation(&operator, gate.id)?;
    println!("pre-validation #{} -> {}", approved.id, approved.status.label());

    let request =
        engine.create_action_request(&operator, subject.id, gate.id, action_type, None)?;
    println!("DP-2001 #{} filed -> {}", request.id, request.status.label());

    for target in [ActionRequestStatus::Processing, ActionRequestStatus::Completed] {
        let moved = engine.advance_action_request(&operator, request.id, target)?;
        println!("DP-2001 #{} -> {}", moved.id, moved.status.label());
    }

    match engine.advance_action_request(&operator, request.id, ActionRequestStatus::Rejected) {
        Err(err) => println!("further movement refused as expected: {err}"),
        Ok(record) => println!("unexpected transition accepted: {}", record.status.label()),
    }

    print_audit_trail(&store);
    Ok(())
}

fn print_audit_trail(store: &InMemoryWorkflowStore) {
    println!("\n== audit trail ==");
    match store.audit_entries() {
        Ok(entries) => {
            for entry in entries {
                println!(
                    "[{}] {} {} #{}: {} -> {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.action,
                    entry.entity_type.label(),
                    entry.entity_id,
                    entry.old_value,
                    entry.new_value
                );
            }
        }
        Err(err) => println!("audit trail unavailable: {err}"),
    }
}
