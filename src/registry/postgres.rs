use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Registry, RegistryError, RegistryResult};
use crate::{
    database::DbManager,
    domain::{NewSubscriber, Subscriber, SubscriberEmail, SubscriberId},
};

/// A registry backed by the `subscriptions` table.
#[derive(Debug, Clone)]
pub struct PgRegistry {
    db: PgPool,
}

impl PgRegistry {
    pub fn new(database_mgr: &DbManager) -> Self {
        PgRegistry {
            db: database_mgr.db().clone(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubscriberRow {
    id: Uuid,
    email: String,
    name: Option<String>,
    confirmed: bool,
    subscribed_at: DateTime<Utc>,
}

impl TryFrom<SubscriberRow> for Subscriber {
    type Error = RegistryError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(row.email)
            .map_err(|er| RegistryError::Unexpected(anyhow::anyhow!("stored email: {er}")))?;

        Ok(Subscriber {
            id: row.id,
            email,
            name: row.name,
            confirmed: row.confirmed,
            subscribed_at: row.subscribed_at,
        })
    }
}

#[async_trait]
impl Registry for PgRegistry {
    #[tracing::instrument(name = "Looking up a subscriber", skip(self))]
    async fn find_by_email(&self, email: &SubscriberEmail) -> RegistryResult<Option<Subscriber>> {
        let row: Option<SubscriberRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, confirmed, subscribed_at
            FROM subscriptions
            WHERE email = $1
        "#,
        )
        .bind(email.as_ref())
        .fetch_optional(&self.db)
        .await
        .map_err(RegistryError::Database)?;

        row.map(Subscriber::try_from).transpose()
    }

    #[tracing::instrument(
        name = "Saving new subscriber to the database",
        skip(self, new_subscriber),
        fields(subscriber_email = %new_subscriber.email)
    )]
    async fn insert(&self, new_subscriber: NewSubscriber) -> RegistryResult<SubscriberId> {
        let subscriber_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, email, subscribed_at)
            VALUES ($1, $2, $3)
        "#,
        )
        .bind(subscriber_id)
        .bind(new_subscriber.email.as_ref())
        .bind(new_subscriber.subscribed_at)
        .execute(&self.db)
        .await
        .map_err(|er| {
            if is_unique_violation(&er) {
                RegistryError::Conflict
            } else {
                RegistryError::Database(er)
            }
        })?;

        Ok(subscriber_id)
    }
}

/// Checks whether the query failed because of the `UNIQUE(email)` constraint.
fn is_unique_violation(er: &sqlx::Error) -> bool {
    match er {
        sqlx::Error::Database(db_er) => db_er.is_unique_violation(),
        _ => false,
    }
}
