use blogrank_core::{AnalysisResult, DatabaseError, Grade, RankEntry};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info, warn};


/// Version tag written with every row so future field changes can be
/// tolerated on read.
pub const SCHEMA_VERSION: i64 = 1;

/// A persisted analysis row.
#[derive(Debug, Clone)]
pub struct StoredAnalysis {
    pub id: i64,
    pub schema_version: i64,
    pub result: AnalysisResult,
}

/// Append-only store of analysis results on SQLite.
#[derive(Debug)]
pub struct Database {
    connection_string: String,
    pool: Option<SqlitePool>,
}

impl Database {
    pub fn new(connection_string: String) -> Self {
        Self {
            connection_string,
            pool: None,
        }
    }

    pub async fn connect(&mut self) -> Result<(), DatabaseError> {
        let options = SqliteConnectOptions::from_str(&self.connection_string)
            .map_err(|e| DatabaseError::ConnectionFailed {
                reason: e.to_string(),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        self.pool = Some(pool);
        debug!("Connected to result store at {}", self.connection_string);
        Ok(())
    }

    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        let pool = self.pool()?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analysis_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                schema_version INTEGER NOT NULL,
                blog_id TEXT NOT NULL,
                url TEXT NOT NULL,
                title TEXT NOT NULL,
                hashtags TEXT NOT NULL,
                smart_keywords TEXT NOT NULL,
                pool TEXT NOT NULL,
                title_rank INTEGER,
                ranks TEXT NOT NULL,
                best_keyword TEXT,
                best_rank INTEGER,
                other_good_keywords TEXT NOT NULL,
                final_keyword TEXT,
                volume_pc INTEGER,
                volume_mobile INTEGER,
                analyzed_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed {
            migration: format!("analysis_results: {}", e),
        })?;

        info!("Result store migrations applied");
        Ok(())
    }

    pub async fn save_result(&self, result: &AnalysisResult) -> Result<i64, DatabaseError> {
        let pool = self.pool()?;
        let hashtags = to_json(&result.hashtags)?;
        let smart_keywords = to_json(&result.smart_keywords)?;
        let keyword_pool = to_json(&result.pool)?;
        let ranks = to_json(&result.ranks)?;
        let other_good = to_json(&result.other_good_keywords)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO analysis_results (
                schema_version, blog_id, url, title, hashtags, smart_keywords,
                pool, title_rank, ranks, best_keyword, best_rank,
                other_good_keywords, final_keyword, volume_pc, volume_mobile,
                analyzed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(SCHEMA_VERSION)
        .bind(&result.blog_id)
        .bind(&result.url)
        .bind(&result.title)
        .bind(hashtags)
        .bind(smart_keywords)
        .bind(keyword_pool)
        .bind(result.title_rank.map(|rank| rank as i64))
        .bind(ranks)
        .bind(&result.best_keyword)
        .bind(result.best_rank.map(|rank| rank as i64))
        .bind(other_good)
        .bind(&result.final_keyword)
        .bind(result.search_volume.map(|volume| volume.pc as i64))
        .bind(result.search_volume.map(|volume| volume.mobile as i64))
        .bind(result.analyzed_at.to_rfc3339())
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::QueryFailed {
            query: format!("insert analysis result: {}", e),
        })?;

        debug!("Saved analysis of '{}'", result.title);
        Ok(inserted.last_insert_rowid())
    }

    /// All stored rows in insertion order. Rows written by an unrecognized
    /// schema version are skipped with a warning instead of failing the
    /// whole load.
    pub async fn load_results(&self) -> Result<Vec<StoredAnalysis>, DatabaseError> {
        let pool = self.pool()?;
        let rows = sqlx::query("SELECT * FROM analysis_results ORDER BY id ASC")
            .fetch_all(pool)
            .await
            .map_err(|e| DatabaseError::QueryFailed {
                query: format!("load analysis results: {}", e),
            })?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let schema_version: i64 = row.try_get("schema_version").map_err(DatabaseError::Sql)?;
            if schema_version != SCHEMA_VERSION {
                warn!(
                    "Skipping row with unrecognized schema version {}",
                    schema_version
                );
                continue;
            }
            stored.push(row_to_stored(&row)?);
        }
        Ok(stored)
    }

    pub async fn clear_results(&self) -> Result<u64, DatabaseError> {
        let pool = self.pool()?;
        let outcome = sqlx::query("DELETE FROM analysis_results")
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::QueryFailed {
                query: format!("clear analysis results: {}", e),
            })?;
        info!("Cleared {} stored analyses", outcome.rows_affected());
        Ok(outcome.rows_affected())
    }

    fn pool(&self) -> Result<&SqlitePool, DatabaseError> {
        self.pool.as_ref().ok_or(DatabaseError::ConnectionFailed {
            reason: "not connected".to_string(),
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::CorruptRow {
        details: format!("serialize: {}", e),
    })
}

fn from_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(raw).map_err(|e| DatabaseError::CorruptRow {
        details: format!("deserialize: {}", e),
    })
}

fn row_to_stored(row: &sqlx::sqlite::SqliteRow) -> Result<StoredAnalysis, DatabaseError> {
    let id: i64 = row.try_get("id").map_err(DatabaseError::Sql)?;
    let schema_version: i64 = row.try_get("schema_version").map_err(DatabaseError::Sql)?;

    let hashtags: String = row.try_get("hashtags").map_err(DatabaseError::Sql)?;
    let smart_keywords: String = row.try_get("smart_keywords").map_err(DatabaseError::Sql)?;
    let keyword_pool: String = row.try_get("pool").map_err(DatabaseError::Sql)?;
    let ranks: String = row.try_get("ranks").map_err(DatabaseError::Sql)?;
    let other_good: String = row
        .try_get("other_good_keywords")
        .map_err(DatabaseError::Sql)?;

    let title_rank: Option<i64> = row.try_get("title_rank").map_err(DatabaseError::Sql)?;
    let best_rank: Option<i64> = row.try_get("best_rank").map_err(DatabaseError::Sql)?;
    let volume_pc: Option<i64> = row.try_get("volume_pc").map_err(DatabaseError::Sql)?;
    let volume_mobile: Option<i64> = row.try_get("volume_mobile").map_err(DatabaseError::Sql)?;

    let analyzed_at: String = row.try_get("analyzed_at").map_err(DatabaseError::Sql)?;
    let analyzed_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&analyzed_at)
        .map_err(|e| DatabaseError::CorruptRow {
            details: format!("analyzed_at: {}", e),
        })?
        .with_timezone(&Utc);

    let best_rank = best_rank.map(|rank| rank as u32);
    let search_volume = match (volume_pc, volume_mobile) {
        (Some(pc), Some(mobile)) => {
            Some(blogrank_core::SearchVolume::new(pc as u64, mobile as u64))
        }
        _ => None,
    };

    let ranks: Vec<RankEntry> = from_json(&ranks)?;
    let other_good_keywords: Vec<RankEntry> = from_json(&other_good)?;

    let result = AnalysisResult {
        blog_id: row.try_get("blog_id").map_err(DatabaseError::Sql)?,
        url: row.try_get("url").map_err(DatabaseError::Sql)?,
        title: row.try_get("title").map_err(DatabaseError::Sql)?,
        hashtags: from_json(&hashtags)?,
        smart_keywords: from_json(&smart_keywords)?,
        pool: from_json(&keyword_pool)?,
        title_rank: title_rank.map(|rank| rank as u32),
        ranks,
        best_keyword: row.try_get("best_keyword").map_err(DatabaseError::Sql)?,
        best_rank,
        other_good_keywords,
        final_keyword: row.try_get("final_keyword").map_err(DatabaseError::Sql)?,
        search_volume,
        // Derived value; never stored independently of the rank.
        grade: Grade::from_rank(best_rank),
        analyzed_at,
    };

    Ok(StoredAnalysis {
        id,
        schema_version,
        result,
    })
}
