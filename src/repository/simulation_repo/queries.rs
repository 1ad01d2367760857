use super::core::{SimRunSummary, SimulationRepository, StaticAllocationRow, DATE_FMT, TS_FMT};
use crate::domain::event::YardEvent;
use crate::domain::snapshot::{DaySnapshot, SlotSnapshot};
use crate::domain::types::EventKind;
use crate::repository::error::RepositoryResult;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Result as SqliteResult, Row};
use std::collections::BTreeMap;

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_date(idx: usize, value: &str) -> SqliteResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FMT).map_err(|e| conversion_error(idx, e))
}

impl SimulationRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 运行的事件日志（按日期、描述排序）
    pub fn list_events(&self, run_id: &str) -> RepositoryResult<Vec<YardEvent>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT event_date, kind, vessel, cluster, block, quantity, description
            FROM sim_event
            WHERE run_id = ?1
            ORDER BY event_date, description, seq_no
            "#,
        )?;

        let events = stmt
            .query_map(params![run_id], |row| self.map_event_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(events)
    }

    /// 重建某日快照；该日无记录返回 None
    pub fn load_snapshot(&self, run_id: &str, date: NaiveDate) -> RepositoryResult<Option<DaySnapshot>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT slot_id, block, capacity, total, clusters_json
            FROM sim_snapshot_slot
            WHERE run_id = ?1 AND snap_date = ?2
            ORDER BY slot_seq
            "#,
        )?;

        let slots = stmt
            .query_map(params![run_id, date.format(DATE_FMT).to_string()], |row| {
                self.map_slot_row(row)
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        if slots.is_empty() {
            return Ok(None);
        }
        Ok(Some(DaySnapshot { date, slots }))
    }

    /// 运行的快照日期列表
    pub fn list_snapshot_dates(&self, run_id: &str) -> RepositoryResult<Vec<NaiveDate>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT DISTINCT snap_date FROM sim_snapshot_slot WHERE run_id = ?1 ORDER BY snap_date",
        )?;

        let dates = stmt
            .query_map(params![run_id], |row| {
                let s: String = row.get(0)?;
                parse_date(0, &s)
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(dates)
    }

    /// 全部运行记录（新的在前）
    pub fn list_runs(&self) -> RepositoryResult<Vec<SimRunSummary>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT run_id, mode, created_at, vessel_count, day_count
            FROM sim_run
            ORDER BY created_at DESC, run_id
            "#,
        )?;

        let runs = stmt
            .query_map([], |row| {
                let created_at_str: String = row.get(2)?;
                let created_at = NaiveDateTime::parse_from_str(&created_at_str, TS_FMT)
                    .map_err(|e| conversion_error(2, e))?;
                Ok(SimRunSummary {
                    run_id: row.get(0)?,
                    mode: row.get(1)?,
                    created_at,
                    vessel_count: row.get(3)?,
                    day_count: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(runs)
    }

    /// 静态排位明细（按槽位、放入顺序）
    pub fn list_static_allocation(&self, run_id: &str) -> RepositoryResult<Vec<StaticAllocationRow>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT slot_seq, slot_id, position, vessel, amount
            FROM static_allocation
            WHERE run_id = ?1
            ORDER BY slot_seq, position
            "#,
        )?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok(StaticAllocationRow {
                    slot_seq: row.get(0)?,
                    slot_id: row.get(1)?,
                    position: row.get(2)?,
                    vessel: row.get(3)?,
                    amount: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }

    // ==========================================
    // 行映射
    // ==========================================

    fn map_event_row(&self, row: &Row) -> SqliteResult<YardEvent> {
        let date_str: String = row.get(0)?;
        let kind_str: String = row.get(1)?;
        let quantity: i64 = row.get(5)?;

        let kind = kind_str.parse::<EventKind>().map_err(|msg| {
            conversion_error(1, std::io::Error::new(std::io::ErrorKind::InvalidData, msg))
        })?;

        Ok(YardEvent {
            date: parse_date(0, &date_str)?,
            kind,
            vessel: row.get(2)?,
            cluster: row.get(3)?,
            block: row.get(4)?,
            quantity: quantity as u32,
            description: row.get(6)?,
        })
    }

    fn map_slot_row(&self, row: &Row) -> SqliteResult<SlotSnapshot> {
        let capacity: i64 = row.get(2)?;
        let total: i64 = row.get(3)?;
        let clusters_json: String = row.get(4)?;

        let clusters: BTreeMap<String, u32> =
            serde_json::from_str(&clusters_json).map_err(|e| conversion_error(4, e))?;

        Ok(SlotSnapshot {
            slot_id: row.get(0)?,
            block: row.get(1)?,
            capacity: capacity as u32,
            total: total as u32,
            clusters,
        })
    }
}
