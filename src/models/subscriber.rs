use crate::domain::SubscriberFields;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Subscriber {
    pub id: i64,
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
    pub activation_flag: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgRow> for Subscriber {
    type Error = sqlx::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email_address: row.try_get("email_address")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            activation_flag: row.try_get("activation_flag")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Reads and writes `subscribers` rows, keyed by id.
pub struct SubscriberGateway<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriberGateway<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(name = "Querying all subscribers", skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Subscriber>, sqlx::Error> {
        sqlx::query(
            r#"
              SELECT
                id,
                email_address,
                first_name,
                last_name,
                activation_flag,
                created_at,
                updated_at
              FROM subscribers
              ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(Subscriber::try_from)
        .collect()
    }

    #[tracing::instrument(name = "Querying subscriber by id", skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Subscriber>, sqlx::Error> {
        sqlx::query(
            r#"
              SELECT
                id,
                email_address,
                first_name,
                last_name,
                activation_flag,
                created_at,
                updated_at
              FROM subscribers
              WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Subscriber::try_from)
        .transpose()
    }

    /// Missing names and email address are stored empty, a missing
    /// activation flag is stored as `false`.
    #[tracing::instrument(name = "Inserting subscriber", skip_all)]
    pub async fn insert(&self, fields: SubscriberFields) -> Result<Subscriber, sqlx::Error> {
        let row = sqlx::query(
            r#"
              INSERT INTO subscribers (
                email_address,
                first_name,
                last_name,
                activation_flag
              )
              VALUES ($1, $2, $3, $4)
              RETURNING
                id,
                email_address,
                first_name,
                last_name,
                activation_flag,
                created_at,
                updated_at
            "#,
        )
        .bind(fields.email_address.unwrap_or_default())
        .bind(fields.first_name.unwrap_or_default())
        .bind(fields.last_name.unwrap_or_default())
        .bind(fields.activation_flag.unwrap_or(false))
        .fetch_one(self.pool)
        .await?;

        Subscriber::try_from(row)
    }

    /// Overwrites only the supplied fields and bumps `updated_at`.
    #[tracing::instrument(name = "Updating subscriber", skip(self, fields))]
    pub async fn update_by_id(
        &self,
        id: i64,
        fields: SubscriberFields,
    ) -> Result<Option<Subscriber>, sqlx::Error> {
        sqlx::query(
            r#"
              UPDATE subscribers
              SET email_address = COALESCE($2, email_address),
                  first_name = COALESCE($3, first_name),
                  last_name = COALESCE($4, last_name),
                  activation_flag = COALESCE($5, activation_flag),
                  updated_at = now()
              WHERE id = $1
              RETURNING
                id,
                email_address,
                first_name,
                last_name,
                activation_flag,
                created_at,
                updated_at
            "#,
        )
        .bind(id)
        .bind(fields.email_address)
        .bind(fields.first_name)
        .bind(fields.last_name)
        .bind(fields.activation_flag)
        .fetch_optional(self.pool)
        .await?
        .map(Subscriber::try_from)
        .transpose()
    }

    /// Returns whether a row was removed.
    #[tracing::instrument(name = "Deleting subscriber", skip(self))]
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscribers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes every row. The id sequence keeps counting.
    #[tracing::instrument(name = "Deleting all subscribers", skip(self))]
    pub async fn delete_all(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscribers")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
