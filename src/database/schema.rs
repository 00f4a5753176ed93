use sqlx::PgPool;
use tracing::info;

use super::DatabaseError;

/// Idempotent DDL, one statement per entry (Postgres prepares each separately).
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "admins",
        r#"CREATE TABLE IF NOT EXISTS admins (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(100) NOT NULL UNIQUE,
            password VARCHAR(255) NOT NULL,
            name VARCHAR(100) NOT NULL,
            last_login TIMESTAMPTZ,
            login_count BIGINT NOT NULL DEFAULT 0,
            ip_address VARCHAR(64),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    ),
    (
        "admin_login_logs",
        r#"CREATE TABLE IF NOT EXISTS admin_login_logs (
            id BIGSERIAL PRIMARY KEY,
            admin_id BIGINT NOT NULL DEFAULT 0,
            ip_address VARCHAR(64) NOT NULL,
            user_agent TEXT,
            status VARCHAR(16) NOT NULL CHECK (status IN ('success', 'failed')),
            login_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    ),
    (
        "idx_admin_login_logs_login_at",
        "CREATE INDEX IF NOT EXISTS idx_admin_login_logs_login_at ON admin_login_logs (login_at DESC)",
    ),
    (
        "work_categories",
        r#"CREATE TABLE IF NOT EXISTS work_categories (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    ),
    (
        "works",
        r#"CREATE TABLE IF NOT EXISTS works (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            category_id BIGINT NOT NULL REFERENCES work_categories(id) ON DELETE RESTRICT,
            description TEXT,
            event_date DATE NOT NULL,
            thumbnail_image TEXT,
            content_images TEXT DEFAULT '[]',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            view_count BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    ),
    (
        "idx_works_category_id",
        "CREATE INDEX IF NOT EXISTS idx_works_category_id ON works (category_id)",
    ),
    (
        "idx_works_listing",
        "CREATE INDEX IF NOT EXISTS idx_works_listing ON works (event_date DESC, created_at DESC, id DESC)",
    ),
    (
        "history",
        r#"CREATE TABLE IF NOT EXISTS history (
            id BIGSERIAL PRIMARY KEY,
            year INTEGER NOT NULL,
            date VARCHAR(100) NOT NULL,
            description TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    ),
    (
        "idx_history_year",
        "CREATE INDEX IF NOT EXISTS idx_history_year ON history (year DESC)",
    ),
];

/// Create every table and index that does not exist yet.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
    for (name, ddl) in MIGRATIONS {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!("Applied migration: {}", name);
    }
    info!("Database schema is up to date ({} statements)", MIGRATIONS.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_idempotent_and_single() {
        for (name, ddl) in MIGRATIONS {
            assert!(ddl.contains("IF NOT EXISTS"), "{} is not idempotent", name);
            assert!(!ddl.trim_end().ends_with(';'), "{} should be a single statement", name);
        }
    }

    #[test]
    fn referenced_tables_come_first() {
        let position = |table: &str| MIGRATIONS.iter().position(|(name, _)| *name == table);
        assert!(position("work_categories") < position("works"));
    }
}
