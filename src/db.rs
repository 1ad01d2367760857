// ==========================================
// 集装箱堆场排位系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout
// - 建表（幂等），供配置层与仓储层共用
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 默认数据库文件名
pub const DEFAULT_DB_FILE: &str = "container_yard_aps.db";

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key      TEXT NOT NULL,
    value    TEXT NOT NULL,
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS sim_run (
    run_id       TEXT NOT NULL PRIMARY KEY,
    mode         TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    vessel_count INTEGER NOT NULL,
    day_count    INTEGER NOT NULL,
    detail_json  TEXT
);

CREATE TABLE IF NOT EXISTS sim_event (
    run_id      TEXT NOT NULL REFERENCES sim_run(run_id) ON DELETE CASCADE,
    seq_no      INTEGER NOT NULL,
    event_date  TEXT NOT NULL,
    kind        TEXT NOT NULL,
    vessel      TEXT NOT NULL,
    cluster     TEXT,
    block       TEXT,
    quantity    INTEGER NOT NULL,
    description TEXT NOT NULL,
    PRIMARY KEY (run_id, seq_no)
);

CREATE TABLE IF NOT EXISTS sim_snapshot_slot (
    run_id        TEXT NOT NULL REFERENCES sim_run(run_id) ON DELETE CASCADE,
    snap_date     TEXT NOT NULL,
    slot_seq      INTEGER NOT NULL,
    slot_id       TEXT NOT NULL,
    block         TEXT NOT NULL,
    capacity      INTEGER NOT NULL,
    total         INTEGER NOT NULL,
    clusters_json TEXT NOT NULL,
    PRIMARY KEY (run_id, snap_date, slot_seq)
);

CREATE TABLE IF NOT EXISTS static_allocation (
    run_id   TEXT NOT NULL REFERENCES sim_run(run_id) ON DELETE CASCADE,
    slot_seq INTEGER NOT NULL,
    slot_id  TEXT NOT NULL,
    position INTEGER NOT NULL,
    vessel   TEXT NOT NULL,
    amount   INTEGER NOT NULL,
    PRIMARY KEY (run_id, slot_seq, position)
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）并写入 schema_version
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 默认数据库路径（用户数据目录下，取不到时退回当前目录）
pub fn default_db_path() -> String {
    match dirs::data_local_dir() {
        Some(dir) => {
            let app_dir = dir.join("container-yard-aps");
            if std::fs::create_dir_all(&app_dir).is_ok() {
                return app_dir.join(DEFAULT_DB_FILE).to_string_lossy().to_string();
            }
            DEFAULT_DB_FILE.to_string()
        }
        None => DEFAULT_DB_FILE.to_string(),
    }
}
