use anyhow::{Context, Result};
use directories::ProjectDirs;
use sqlx::any::AnyPoolOptions;
use sqlx::{any::AnyConnectOptions, migrate::Migrator, AnyPool, ConnectOptions};
use std::sync::Once;
use std::{path::PathBuf, str::FromStr};

use crate::storage::Storage;

// Ensure drivers are installed exactly once for sqlx::any
static INSTALL_DRIVERS: Once = Once::new();

// Embed SQL migrations from the migrations/ directory
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    // Create a connection pool. If database_url is None, use a sensible default
    // (SQLite file in the user's data directory).
    pub async fn connect(database_url: Option<&str>) -> Result<Self> {
        // Register compiled-in drivers for sqlx::any
        INSTALL_DRIVERS.call_once(|| sqlx::any::install_default_drivers());

        let url = match database_url {
            Some(u) if !u.trim().is_empty() => u.to_string(),
            _ => default_sqlite_url()?,
        };

        // Parse options to tweak connection settings (e.g., logging)
        let opts = AnyConnectOptions::from_str(&url)
            .with_context(|| format!("invalid database URL: {url}"))?;
        // Quiet by default; callers can enable SQLX_LOG if they want
        let opts = opts.disable_statement_logging();

        let pool = AnyPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .with_context(|| format!("failed to connect to database: {url}"))?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.context("running migrations")
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Drop cached list pages. Durable prefs (the subscription set) are a
    /// separate table and are never touched by this.
    pub async fn clear_cache_prefix(&self, prefix: Option<&str>) -> Result<u64> {
        let result = if let Some(p) = prefix {
            let like = format!("{}%", p);
            sqlx::query("DELETE FROM list_cache WHERE key LIKE ?")
                .bind(like)
                .execute(&self.pool)
                .await?
        } else {
            sqlx::query("DELETE FROM list_cache")
                .execute(&self.pool)
                .await?
        };
        Ok(result.rows_affected())
    }

    pub async fn vacuum(&self) -> Result<()> {
        // Best-effort: works on SQLite
        let _ = sqlx::query("VACUUM").execute(&self.pool).await;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for Database {
    async fn get_cache(&self, key: &str, now: i64) -> Result<Option<String>> {
        let row = sqlx::query_scalar::<_, String>(
            "SELECT payload FROM list_cache WHERE key = ? AND expires_at > ?",
        )
        .bind(key)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn put_cache(&self, key: &str, payload: &str, expires_at: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO list_cache(key, payload, expires_at) VALUES (?, ?, ?)\n             ON CONFLICT(key) DO UPDATE SET payload=excluded.payload, expires_at=excluded.expires_at",
        )
        .bind(key)
        .bind(payload)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_pref(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query_scalar::<_, String>("SELECT payload FROM prefs WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn put_pref(&self, key: &str, payload: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO prefs(key, payload) VALUES (?, ?)\n             ON CONFLICT(key) DO UPDATE SET payload=excluded.payload, updated_at=CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn default_sqlite_url() -> Result<String> {
    let proj = ProjectDirs::from("dev", "streamhub", "streamhub")
        .context("unable to determine data directory for default sqlite path")?;
    let mut path: PathBuf = proj.data_dir().to_path_buf();
    std::fs::create_dir_all(&path)
        .with_context(|| format!("creating data dir: {}", path.display()))?;
    path.push("streamhub.db");

    // Ensure parent directory exists (double safety)
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating db parent dir: {}", parent.display()))?;
    }

    // Ensure the file exists so SQLite can open it in rw mode
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&path);

    // Encode spaces in the path for a valid sqlite URL
    let mut path_str = path.to_string_lossy().to_string();
    if path_str.contains(' ') {
        path_str = path_str.replace(' ', "%20");
    }
    Ok(format!("sqlite:///{path_str}?mode=rwc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_db(dir: &tempfile::TempDir) -> Database {
        let path = dir.path().join("test.db");
        std::fs::File::create(&path).unwrap();
        let url = format!("sqlite:///{}?mode=rwc", path.display());
        let db = Database::connect(Some(&url)).await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    #[tokio::test]
    async fn cache_roundtrip_honors_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let db = temp_db(&dir).await;

        db.put_cache("content|page|0|50", "{}", 1000).await.unwrap();
        assert_eq!(
            db.get_cache("content|page|0|50", 500).await.unwrap().as_deref(),
            Some("{}")
        );
        assert_eq!(db.get_cache("content|page|0|50", 1000).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_cache_prefix_leaves_prefs_alone() {
        let dir = tempfile::tempdir().unwrap();
        let db = temp_db(&dir).await;

        db.put_cache("content|page|0|50", "a", i64::MAX).await.unwrap();
        db.put_cache("platforms|all", "b", i64::MAX).await.unwrap();
        db.put_pref("subscriptions", r#"["p1"]"#).await.unwrap();

        let removed = db.clear_cache_prefix(Some("content|")).await.unwrap();
        assert_eq!(removed, 1);
        assert!(db.get_cache("platforms|all", 0).await.unwrap().is_some());

        let removed = db.clear_cache_prefix(None).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            db.get_pref("subscriptions").await.unwrap().as_deref(),
            Some(r#"["p1"]"#)
        );
    }

    #[tokio::test]
    async fn pref_upsert_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let db = temp_db(&dir).await;

        db.put_pref("subscriptions", r#"["p1"]"#).await.unwrap();
        db.put_pref("subscriptions", "[]").await.unwrap();
        assert_eq!(
            db.get_pref("subscriptions").await.unwrap().as_deref(),
            Some("[]")
        );
    }
}
