//! Postgres harness for integration tests.
//!
//! One container per test binary. Migrations run once into a template
//! database; every `TestHarness` then gets a fresh database cloned from it,
//! so tests see the seeded catalogue and nothing written by other tests.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::{Mutex, OnceCell};
use uuid::Uuid;

const TEMPLATE_DB: &str = "evolvo_template";

struct PostgresContainer {
    /// Server URL without a database name
    server_url: String,
    _container: ContainerAsync<Postgres>,
}

static CONTAINER: OnceCell<PostgresContainer> = OnceCell::const_new();

/// Clones of the template run one at a time.
static CLONE_LOCK: Mutex<()> = Mutex::const_new(());

impl PostgresContainer {
    async fn start() -> Result<Self> {
        // RUST_LOG=server_core=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let container = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await
            .context("Postgres container did not start")?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let server_url = format!("postgresql://postgres:postgres@{host}:{port}");

        let admin = connect(&server_url, "postgres").await?;
        admin
            .execute(format!("CREATE DATABASE {TEMPLATE_DB}").as_str())
            .await
            .context("Failed to create template database")?;
        admin.close().await;

        let template = connect(&server_url, TEMPLATE_DB).await?;
        sqlx::migrate!("./migrations")
            .run(&template)
            .await
            .context("Failed to migrate template database")?;
        // Postgres refuses to clone a template that has open connections.
        template.close().await;

        Ok(Self {
            server_url,
            _container: container,
        })
    }

    async fn shared() -> &'static Self {
        CONTAINER
            .get_or_init(|| async {
                Self::start()
                    .await
                    .expect("Postgres test container unavailable")
            })
            .await
    }
}

async fn connect(server_url: &str, database: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(&format!("{server_url}/{database}"))
        .await
        .with_context(|| format!("Failed to connect to {database}"))
}

/// A migrated, seeded database of its own.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn stores_post(ctx: &TestHarness) {
///     let store = PgBlogStore::new(ctx.db_pool.clone());
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test database")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let container = PostgresContainer::shared().await;
        let database = format!("test_{}", Uuid::new_v4().simple());

        let _clone = CLONE_LOCK.lock().await;
        let admin = connect(&container.server_url, "postgres").await?;
        admin
            .execute(format!("CREATE DATABASE {database} TEMPLATE {TEMPLATE_DB}").as_str())
            .await
            .with_context(|| format!("Failed to clone {TEMPLATE_DB}"))?;
        admin.close().await;

        Ok(Self {
            db_pool: connect(&container.server_url, &database).await?,
        })
    }
}
