use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

/// Схема базы: каждая таблица создаётся, только если её ещё нет
const SCHEMA: &[(&str, &str)] = &[
    (
        "sys_users",
        r#"
        CREATE TABLE IF NOT EXISTS sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            full_name TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_login_at TEXT
        );
        "#,
    ),
    (
        "sys_refresh_tokens",
        r#"
        CREATE TABLE IF NOT EXISTS sys_refresh_tokens (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            token_hash TEXT NOT NULL UNIQUE,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            revoked_at TEXT
        );
        "#,
    ),
    (
        "sys_settings",
        r#"
        CREATE TABLE IF NOT EXISTS sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "a001_banner",
        r#"
        CREATE TABLE IF NOT EXISTS a001_banner (
            id TEXT PRIMARY KEY NOT NULL,
            kind TEXT NOT NULL,
            image_url TEXT NOT NULL,
            storage_path TEXT NOT NULL,
            created_at TEXT NOT NULL,
            dominant_color TEXT,
            link_type TEXT,
            link_id TEXT,
            link_name TEXT
        );
        "#,
    ),
    (
        "a002_pickup_point",
        r#"
        CREATE TABLE IF NOT EXISTS a002_pickup_point (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            lat REAL NOT NULL DEFAULT 0,
            lng REAL NOT NULL DEFAULT 0,
            contact_person TEXT,
            contact_phone TEXT NOT NULL,
            working_hours TEXT,
            notes TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "a003_product",
        r#"
        CREATE TABLE IF NOT EXISTS a003_product (
            id TEXT PRIMARY KEY NOT NULL,
            collection TEXT NOT NULL,
            shop_id TEXT,
            seller_id TEXT,
            name TEXT NOT NULL,
            description TEXT,
            price REAL NOT NULL DEFAULT 0,
            currency TEXT NOT NULL,
            images_json TEXT NOT NULL DEFAULT '[]',
            category TEXT,
            subcategory TEXT,
            sub_subcategory TEXT,
            stats_json TEXT NOT NULL DEFAULT '{}',
            is_archived INTEGER NOT NULL DEFAULT 0,
            archived_at TEXT,
            archived_by TEXT,
            archive_reason TEXT,
            needs_update INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "a004_order_line",
        r#"
        CREATE TABLE IF NOT EXISTS a004_order_line (
            id TEXT PRIMARY KEY NOT NULL,
            order_id TEXT NOT NULL,
            seller_id TEXT NOT NULL,
            seller_name TEXT NOT NULL,
            product_id TEXT NOT NULL,
            product_name TEXT NOT NULL,
            category TEXT,
            quantity INTEGER NOT NULL,
            unit_price REAL NOT NULL,
            commission_rate REAL NOT NULL,
            status TEXT NOT NULL,
            ordered_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "a005_shop",
        r#"
        CREATE TABLE IF NOT EXISTS a005_shop (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            owner_name TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "p900_weekly_report",
        r#"
        CREATE TABLE IF NOT EXISTS p900_weekly_report (
            week_id TEXT PRIMARY KEY NOT NULL,
            week_start TEXT NOT NULL,
            week_end TEXT NOT NULL,
            status TEXT NOT NULL,
            error_message TEXT,
            total_revenue REAL NOT NULL DEFAULT 0,
            total_commission REAL NOT NULL DEFAULT 0,
            total_orders INTEGER NOT NULL DEFAULT 0,
            total_quantity INTEGER NOT NULL DEFAULT 0,
            seller_count INTEGER NOT NULL DEFAULT 0,
            is_paid INTEGER NOT NULL DEFAULT 0,
            paid_by TEXT,
            paid_at TEXT,
            calculated_at TEXT,
            updated_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "p900_shop_sale",
        r#"
        CREATE TABLE IF NOT EXISTS p900_shop_sale (
            id TEXT PRIMARY KEY NOT NULL,
            week_id TEXT NOT NULL,
            seller_id TEXT NOT NULL,
            seller_name TEXT NOT NULL,
            revenue REAL NOT NULL,
            quantity INTEGER NOT NULL,
            commission REAL NOT NULL,
            net REAL NOT NULL,
            order_count INTEGER NOT NULL,
            category_breakdown TEXT NOT NULL DEFAULT '{}'
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_a001_banner_kind ON a001_banner (kind, created_at);",
    "CREATE INDEX IF NOT EXISTS idx_a003_product_archived ON a003_product (collection, is_archived);",
    "CREATE INDEX IF NOT EXISTS idx_a004_order_line_ordered_at ON a004_order_line (ordered_at);",
    "CREATE INDEX IF NOT EXISTS idx_p900_shop_sale_week ON p900_shop_sale (week_id);",
    "CREATE INDEX IF NOT EXISTS idx_sys_refresh_tokens_user ON sys_refresh_tokens (user_id);",
];

/// Открывает (создаёт при необходимости) файл SQLite и приводит схему в порядок
pub async fn initialize_database(db_path: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database: {}", absolute_path.display());
    let conn = Database::connect(&db_url).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

/// Создаёт недостающие таблицы и индексы
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for (table, ddl) in SCHEMA {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, ddl.to_string()))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create table {}: {}", table, e))?;
    }
    for ddl in INDEXES {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, ddl.to_string()))
            .await?;
    }
    tracing::debug!("Schema ready: {} tables", SCHEMA.len());
    Ok(())
}

/// Временная база для тестов репозиториев
#[cfg(test)]
pub async fn test_database() -> (tempfile::TempDir, DatabaseConnection) {
    let dir = tempfile::tempdir().expect("temp dir");
    let conn = initialize_database(&dir.path().join("test.db"))
        .await
        .expect("test database");
    (dir, conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let (_dir, conn) = test_database().await;
        bootstrap_schema(&conn).await.unwrap();

        let rows = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'"
                    .to_string(),
            ))
            .await
            .unwrap();
        let names: Vec<String> = rows
            .iter()
            .map(|r| r.try_get::<String>("", "name").unwrap())
            .collect();
        for (table, _) in SCHEMA {
            assert!(names.iter().any(|n| n == table), "missing table {}", table);
        }
    }
}
