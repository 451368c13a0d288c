mod app_system;
mod config;
mod domain;
mod error;
mod export;
mod manager;
mod messages;
mod repository;
mod service;
mod validation;

#[cfg(test)]
mod mock_framework;

use tracing::{info, Instrument};
use crate::app_system::{setup_tracing, UserSystem};
use crate::config::SystemConfig;
use crate::domain::{UserFields, UserPatch};

fn user_fields(name: &str, email: &str) -> UserFields {
    UserFields::from([
        ("name".to_string(), name.to_string()),
        ("email".to_string(), email.to_string()),
    ])
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = SystemConfig::from_env();

    // Setup tracing once for the entire application
    setup_tracing(&config);

    let system = UserSystem::new(&config);

    let test_users = vec![
        user_fields("Alice Johnson", "alice@example.com"),
        user_fields("Bob Smith", "bob@example.com"),
        user_fields("Charlie Brown", "charlie@example.com"),
    ];

    let span = tracing::info_span!("user_creation");
    let created = async {
        info!("Creating test users");
        system.manager.bulk_create_users(test_users).await
    }
    .instrument(span)
    .await;
    println!("Created {} users", created.len());

    let all_users = system
        .service
        .list_users(None)
        .await
        .map_err(|e| e.to_string())?;
    println!("Total users: {}", all_users.len());

    let json_export = system
        .manager
        .export_users("json")
        .await
        .map_err(|e| e.to_string())?;
    println!("Exported users:");
    println!("{}", json_export);

    if let Some(bob) = created.iter().find(|u| u.name == "Bob Smith") {
        let updates = UserFields::from([("status".to_string(), "suspended".to_string())]);
        let patch = UserPatch::from_fields(&updates).map_err(|e| e.to_string())?;
        let bob = system
            .service
            .update_user(bob.id, patch)
            .await
            .map_err(|e| e.to_string())?;
        info!(user = %bob.display_name(), status = %bob.status, "Updated user");
    }

    let matches = system
        .service
        .search_users("example.com")
        .await
        .map_err(|e| e.to_string())?;
    println!("Users matching 'example.com': {}", matches.len());

    if let Some(charlie) = created.iter().find(|u| u.name == "Charlie Brown") {
        let removed = system
            .service
            .delete_user(charlie.id)
            .await
            .map_err(|e| e.to_string())?;
        info!(removed, remaining = system.service.user_count(), "Deleted test user");
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
