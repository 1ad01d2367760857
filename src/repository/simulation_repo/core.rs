use crate::db;
use crate::engine::static_allocator::StaticAllocationResult;
use crate::engine::timeline::TimelineResult;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub(super) const DATE_FMT: &str = "%Y-%m-%d";
pub(super) const TS_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub(super) const MODE_TIMELINE: &str = "timeline";
pub(super) const MODE_STATIC: &str = "static";

/// 运行记录摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimRunSummary {
    pub run_id: String,
    pub mode: String,
    pub created_at: NaiveDateTime,
    pub vessel_count: i64,
    pub day_count: i64,
}

/// 静态排位明细行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAllocationRow {
    pub slot_seq: i64,
    pub slot_id: String,
    pub position: i64,
    pub vessel: String,
    pub amount: i64,
}

// ==========================================
// SimulationRepository - 模拟结果仓储
// ==========================================
pub struct SimulationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SimulationRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 建表（幂等）
    pub fn ensure_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        db::init_schema(&conn)?;
        Ok(())
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 保存时间线模拟结果（单事务：运行记录 + 事件 + 快照）
    pub fn save_timeline(&self, result: &TimelineResult) -> RepositoryResult<()> {
        let detail_json = serde_json::to_string(&result.vessels)?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO sim_run (run_id, mode, created_at, vessel_count, day_count, detail_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                result.run_id,
                MODE_TIMELINE,
                Utc::now().naive_utc().format(TS_FMT).to_string(),
                result.vessels.len() as i64,
                result.day_count() as i64,
                detail_json,
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO sim_event (
                    run_id, seq_no, event_date, kind, vessel, cluster, block, quantity, description
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )?;
            for (seq_no, event) in result.events.iter().enumerate() {
                stmt.execute(params![
                    result.run_id,
                    seq_no as i64,
                    event.date.format(DATE_FMT).to_string(),
                    event.kind.as_str(),
                    event.vessel,
                    event.cluster,
                    event.block,
                    event.quantity as i64,
                    event.description,
                ])?;
            }
        }

        let mut slot_rows = 0usize;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO sim_snapshot_slot (
                    run_id, snap_date, slot_seq, slot_id, block, capacity, total, clusters_json
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )?;
            for (date, snapshot) in &result.snapshots {
                let snap_date = date.format(DATE_FMT).to_string();
                for (slot_seq, slot) in snapshot.slots.iter().enumerate() {
                    stmt.execute(params![
                        result.run_id,
                        snap_date,
                        slot_seq as i64,
                        slot.slot_id,
                        slot.block,
                        slot.capacity as i64,
                        slot.total as i64,
                        serde_json::to_string(&slot.clusters)?,
                    ])?;
                    slot_rows += 1;
                }
            }
        }

        tx.commit()?;

        info!(
            run_id = %result.run_id,
            events = result.events.len(),
            days = result.day_count(),
            "时间线结果已保存"
        );
        debug!(slot_rows, "快照槽位行数");
        Ok(())
    }

    /// 保存静态排位结果（单事务）
    pub fn save_static(&self, result: &StaticAllocationResult) -> RepositoryResult<()> {
        let detail_json = serde_json::to_string(&serde_json::json!({
            "slot_order": result.slot_order,
            "allocated": result.allocated,
            "unallocated": result.unallocated,
        }))?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO sim_run (run_id, mode, created_at, vessel_count, day_count, detail_json)
            VALUES (?1, ?2, ?3, ?4, 0, ?5)
            "#,
            params![
                result.run_id,
                MODE_STATIC,
                Utc::now().naive_utc().format(TS_FMT).to_string(),
                result.allocated.len() as i64,
                detail_json,
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO static_allocation (run_id, slot_seq, slot_id, position, vessel, amount)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for (slot_seq, slot) in result.slots.iter().enumerate() {
                for (position, (vessel, amount)) in slot.vessels.iter().enumerate() {
                    stmt.execute(params![
                        result.run_id,
                        slot_seq as i64,
                        slot.slot_id,
                        position as i64,
                        vessel,
                        *amount as i64,
                    ])?;
                }
            }
        }

        tx.commit()?;

        info!(run_id = %result.run_id, "静态排位结果已保存");
        Ok(())
    }

    /// 删除运行记录（明细级联删除）
    pub fn delete_run(&self, run_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM sim_run WHERE run_id = ?1", params![run_id])?;
        Ok(rows)
    }
}
