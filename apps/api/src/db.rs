use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `blurbs` table if it does not exist yet.
/// The candidate record tables belong to the CRUD layer and are not touched here.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blurbs (
            seq             BIGSERIAL PRIMARY KEY,
            id              UUID NOT NULL UNIQUE,
            template_name   TEXT NOT NULL,
            field_key       TEXT NOT NULL,
            suggestion_text TEXT NOT NULL,
            user_text       TEXT,
            status          TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'accepted', 'modified', 'rejected')),
            created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS blurbs_template_field_seq_idx \
         ON blurbs (template_name, field_key, seq)",
    )
    .execute(pool)
    .await?;

    info!("Blurb schema ready");
    Ok(())
}
