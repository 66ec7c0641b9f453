//! Runs the registry contract against a real Postgres server.
//! Needs `DATABASE_URL` pointing to a server where new databases can be created:
//! `cargo test -- --ignored`

use anyhow::{Context, Result};
use chrono::Utc;
use claims::{assert_matches, assert_none, assert_some};
use letterbox::{
    config::DbConfig,
    database::DbManager,
    domain::{NewSubscriber, SubscriberEmail},
    registry::{PgRegistry, Registry, RegistryError},
};

async fn pg_registry() -> Result<PgRegistry> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let db_config = DbConfig::try_from(database_url.as_str())?;
    let dm = DbManager::test_init(&db_config).await?;

    Ok(PgRegistry::new(&dm))
}

#[tokio::test]
#[ignore = "needs a running Postgres server"]
async fn pg_registry_insert_find_and_conflict() -> Result<()> {
    let registry = pg_registry().await?;
    let email = SubscriberEmail::parse("a@x.com")?;

    assert_none!(registry.find_by_email(&email).await?);

    let id = registry
        .insert(NewSubscriber::new(email.clone(), Utc::now()))
        .await?;

    let stored = assert_some!(registry.find_by_email(&email).await?);
    assert_eq!(stored.id, id);
    assert_eq!(stored.email, email);
    assert_none!(stored.name);
    assert!(!stored.confirmed);

    assert_matches!(
        registry
            .insert(NewSubscriber::new(email.clone(), Utc::now()))
            .await,
        Err(RegistryError::Conflict)
    );

    // Exact match only.
    let upper = SubscriberEmail::parse("A@x.com")?;
    assert!(!registry.exists(&upper).await?);

    Ok(())
}
