use sqlx::PgPool;

/// Execute the schema DDL (CREATE TABLE IF NOT EXISTS, safe to rerun).
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../../sql/schema.sql"))
        .execute(pool)
        .await?;
    Ok(())
}
