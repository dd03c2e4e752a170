//! Postgres-backed blurb store. Creation order is the `seq` column, not `created_at`,
//! so blurbs written in the same instant still have a total order.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::blurbs::review::Review;
use crate::blurbs::store::BlurbStore;
use crate::errors::AppError;
use crate::models::blurb::{Blurb, BlurbRow};

const BLURB_COLUMNS: &str =
    "id, template_name, field_key, suggestion_text, user_text, status, created_at, updated_at";

#[derive(Clone)]
pub struct PgBlurbStore {
    pool: PgPool,
}

impl PgBlurbStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_blurbs(rows: Vec<BlurbRow>) -> Result<Vec<Blurb>, AppError> {
    rows.into_iter().map(Blurb::try_from).collect()
}

#[async_trait]
impl BlurbStore for PgBlurbStore {
    async fn append(&self, blurbs: &[Blurb]) -> Result<(), AppError> {
        // One transaction: a generation contributes all of its candidates or none.
        let mut tx = self.pool.begin().await?;
        for blurb in blurbs {
            sqlx::query(
                r#"
                INSERT INTO blurbs
                    (id, template_name, field_key, suggestion_text, user_text, status,
                     created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(blurb.id)
            .bind(&blurb.template_name)
            .bind(&blurb.field_key)
            .bind(&blurb.suggestion_text)
            .bind(&blurb.user_text)
            .bind(blurb.status.as_str())
            .bind(blurb.created_at)
            .bind(blurb.updated_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Blurb>, AppError> {
        sqlx::query_as::<_, BlurbRow>(&format!("SELECT {BLURB_COLUMNS} FROM blurbs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Blurb::try_from)
            .transpose()
    }

    async fn by_field(
        &self,
        template_name: &str,
        field_key: &str,
    ) -> Result<Vec<Blurb>, AppError> {
        let rows = sqlx::query_as::<_, BlurbRow>(&format!(
            "SELECT {BLURB_COLUMNS} FROM blurbs \
             WHERE template_name = $1 AND field_key = $2 ORDER BY seq"
        ))
        .bind(template_name)
        .bind(field_key)
        .fetch_all(&self.pool)
        .await?;
        into_blurbs(rows)
    }

    async fn by_template(&self, template_name: &str) -> Result<Vec<Blurb>, AppError> {
        let rows = sqlx::query_as::<_, BlurbRow>(&format!(
            "SELECT {BLURB_COLUMNS} FROM blurbs WHERE template_name = $1 ORDER BY seq"
        ))
        .bind(template_name)
        .fetch_all(&self.pool)
        .await?;
        into_blurbs(rows)
    }

    async fn apply_review(&self, id: Uuid, review: &Review) -> Result<Option<Blurb>, AppError> {
        // COALESCE keeps the stored edit when the review carries no text.
        sqlx::query_as::<_, BlurbRow>(&format!(
            r#"
            UPDATE blurbs
            SET status = $2, user_text = COALESCE($3, user_text), updated_at = now()
            WHERE id = $1
            RETURNING {BLURB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(review.status.as_str())
        .bind(&review.user_text)
        .fetch_optional(&self.pool)
        .await?
        .map(Blurb::try_from)
        .transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Blurb>, AppError> {
        sqlx::query_as::<_, BlurbRow>(&format!(
            "DELETE FROM blurbs WHERE id = $1 RETURNING {BLURB_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Blurb::try_from)
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::blurb::BlurbStatus;

    fn row(text: &str, status: &str, user_text: Option<&str>) -> BlurbRow {
        let now = Utc::now();
        BlurbRow {
            id: Uuid::new_v4(),
            template_name: "classic".into(),
            field_key: "summary".into(),
            suggestion_text: text.into(),
            user_text: user_text.map(str::to_string),
            status: status.into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_rows_convert_in_query_order() {
        let blurbs = into_blurbs(vec![
            row("first", "accepted", None),
            row("second", "modified", Some("")),
        ])
        .unwrap();

        assert_eq!(blurbs[0].suggestion_text, "first");
        assert_eq!(blurbs[0].status, BlurbStatus::Accepted);
        assert_eq!(blurbs[1].status, BlurbStatus::Modified);
        assert_eq!(blurbs[1].user_text.as_deref(), Some(""));
    }

    #[test]
    fn test_one_bad_status_fails_the_whole_batch() {
        let result = into_blurbs(vec![row("ok", "pending", None), row("bad", "archived", None)]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
