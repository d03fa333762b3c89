use std::time::Duration;

use anyhow::{Context, Result};
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::policies::load_balancing::DefaultPolicy;
use scylla::statement::prepared::PreparedStatement;

const INSERT_STMT: &str = "INSERT INTO benchks.benchtab (pk, v1, v2) VALUES (?, ?, ?)";
const SELECT_STMT: &str = "SELECT v1, v2 FROM benchks.benchtab WHERE pk = ?";

const TIMEOUT: Duration = Duration::from_secs(5);

/// One session against the cluster plus the two statements the benchmark
/// runs. Shared as-is between all workers.
pub struct Database {
    session: Session,
    insert: PreparedStatement,
    select: PreparedStatement,
}

impl Database {
    /// Connects to the cluster and, unless the caller opted out, drops and
    /// recreates the benchmark schema before preparing the statements.
    pub async fn connect(address: &str, create_schema: bool) -> Result<Self> {
        let policy = DefaultPolicy::builder().token_aware(true).build();
        let profile = ExecutionProfile::builder()
            .load_balancing_policy(policy)
            .request_timeout(Some(TIMEOUT))
            .build();

        let session = SessionBuilder::new()
            .known_node(address)
            .connection_timeout(TIMEOUT)
            .default_execution_profile_handle(profile.into_handle())
            .build()
            .await
            .with_context(|| format!("failed to connect to {address}"))?;

        if create_schema {
            Self::recreate_schema(&session)
                .await
                .context("schema setup failed")?;
        }

        let insert = session.prepare(INSERT_STMT).await?;
        let select = session.prepare(SELECT_STMT).await?;

        Ok(Database {
            session,
            insert,
            select,
        })
    }

    async fn recreate_schema(session: &Session) -> Result<()> {
        session
            .query_unpaged("DROP KEYSPACE IF EXISTS benchks", &[])
            .await?;
        session.await_schema_agreement().await?;

        session
            .query_unpaged(
                "CREATE KEYSPACE IF NOT EXISTS benchks WITH REPLICATION = \
                {'class' : 'SimpleStrategy', 'replication_factor' : 1}",
                &[],
            )
            .await?;
        session.await_schema_agreement().await?;

        session
            .query_unpaged(
                "CREATE TABLE IF NOT EXISTS benchks.benchtab \
                (pk bigint PRIMARY KEY, v1 bigint, v2 bigint)",
                &[],
            )
            .await?;
        session.await_schema_agreement().await?;

        Ok(())
    }

    pub async fn insert(&self, pk: i64, v1: i64, v2: i64) -> Result<()> {
        self.session
            .execute_unpaged(&self.insert, (pk, v1, v2))
            .await?;
        Ok(())
    }

    /// Reads `(v1, v2)` for a key; a missing row is an error.
    pub async fn select(&self, pk: i64) -> Result<(i64, i64)> {
        let row = self
            .session
            .execute_unpaged(&self.select, (pk,))
            .await?
            .into_rows_result()?
            .first_row::<(i64, i64)>()?;
        Ok(row)
    }
}
