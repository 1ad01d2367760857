// ==========================================
// 集装箱堆场排位系统 - 配置管理器
// ==========================================
// 职责: 模拟参数/堆场拓扑的加载、覆写、快照
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::simulation_config::{RateModel, SimulationConfig};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::types::StaticSlotOrder;
use crate::domain::yard::YardLayout;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager（建表幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn.lock().map_err(|e| ConfigError::LockError(e.to_string()))?;
            init_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| ConfigError::LockError(e.to_string()))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ConfigError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| ConfigError::LockError(e.to_string()))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 覆写的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| ConfigError::LockError(e.to_string()))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    // ==========================================
    // 模拟参数
    // ==========================================

    /// 加载模拟参数（缺失键使用默认值）
    pub fn load_simulation_config(&self) -> ConfigResult<SimulationConfig> {
        let mut config = SimulationConfig::default();

        if let Some(v) = self.parse_value::<i64>(config_keys::RECEIVING_DAYS)? {
            config.receiving_days = v;
        }
        if let Some(v) = self.parse_value::<i64>(config_keys::SIMULATION_TAIL_DAYS)? {
            config.simulation_tail_days = v;
        }
        if let Some(v) = self.parse_value::<i64>(config_keys::CLASH_MARGIN_DAYS)? {
            config.clash_margin_days = v;
        }
        if let Some(v) = self.parse_value::<f64>(config_keys::CRANES_PER_VESSEL)? {
            config.cranes_per_vessel = v;
        }
        if let Some(v) = self.parse_value::<f64>(config_keys::MOVES_PER_CRANE_PER_HOUR)? {
            config.moves_per_crane_per_hour = v;
        }
        if let Some(v) = self.parse_value::<u32>(config_keys::SMALL_VESSEL_THRESHOLD)? {
            config.small_vessel_threshold = v;
        }
        if let Some(v) = self.parse_value::<u32>(config_keys::MEDIUM_VESSEL_THRESHOLD)? {
            config.medium_vessel_threshold = v;
        }
        if let Some(v) = self.parse_value::<StaticSlotOrder>(config_keys::STATIC_SLOT_ORDER)? {
            config.static_slot_order = v;
        }
        if let Some(raw) = self.get_config_value(config_keys::RATE_MODEL)? {
            config.rate_model = serde_json::from_str::<RateModel>(&raw).map_err(|e| {
                ConfigError::ConfigValueError {
                    key: config_keys::RATE_MODEL.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                }
            })?;
        }

        tracing::debug!(?config, "模拟参数加载完成");
        Ok(config)
    }

    /// 保存模拟参数（全部键覆写）
    pub fn save_simulation_config(&self, config: &SimulationConfig) -> ConfigResult<()> {
        self.set_config_value(config_keys::RECEIVING_DAYS, &config.receiving_days.to_string())?;
        self.set_config_value(
            config_keys::SIMULATION_TAIL_DAYS,
            &config.simulation_tail_days.to_string(),
        )?;
        self.set_config_value(config_keys::CLASH_MARGIN_DAYS, &config.clash_margin_days.to_string())?;
        self.set_config_value(config_keys::CRANES_PER_VESSEL, &config.cranes_per_vessel.to_string())?;
        self.set_config_value(
            config_keys::MOVES_PER_CRANE_PER_HOUR,
            &config.moves_per_crane_per_hour.to_string(),
        )?;
        self.set_config_value(
            config_keys::SMALL_VESSEL_THRESHOLD,
            &config.small_vessel_threshold.to_string(),
        )?;
        self.set_config_value(
            config_keys::MEDIUM_VESSEL_THRESHOLD,
            &config.medium_vessel_threshold.to_string(),
        )?;
        self.set_config_value(config_keys::STATIC_SLOT_ORDER, config.static_slot_order.as_str())?;
        self.set_config_value(config_keys::RATE_MODEL, &serde_json::to_string(&config.rate_model)?)?;
        Ok(())
    }

    // ==========================================
    // 堆场拓扑
    // ==========================================

    /// 加载堆场拓扑（未配置时使用默认码头堆场）
    pub fn load_yard_layout(&self) -> ConfigResult<YardLayout> {
        match self.get_config_value(config_keys::YARD_LAYOUT)? {
            None => Ok(YardLayout::default_terminal()),
            Some(raw) => serde_json::from_str::<YardLayout>(&raw).map_err(|e| {
                ConfigError::ConfigValueError {
                    key: config_keys::YARD_LAYOUT.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                }
            }),
        }
    }

    pub fn save_yard_layout(&self, layout: &YardLayout) -> ConfigResult<()> {
        self.set_config_value(config_keys::YARD_LAYOUT, &serde_json::to_string(layout)?)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn parse_value<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key)? {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::ConfigValueError {
                    key: key.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                }),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 时间窗口
    pub const RECEIVING_DAYS: &str = "receiving_days";
    pub const SIMULATION_TAIL_DAYS: &str = "simulation_tail_days";

    // 冲突规则
    pub const CLASH_MARGIN_DAYS: &str = "clash_margin_days";

    // 装船效率
    pub const CRANES_PER_VESSEL: &str = "cranes_per_vessel";
    pub const MOVES_PER_CRANE_PER_HOUR: &str = "moves_per_crane_per_hour";

    // 簇划分
    pub const SMALL_VESSEL_THRESHOLD: &str = "small_vessel_threshold";
    pub const MEDIUM_VESSEL_THRESHOLD: &str = "medium_vessel_threshold";

    // 模式
    pub const RATE_MODEL: &str = "rate_model";               // 收箱速率 (JSON)
    pub const STATIC_SLOT_ORDER: &str = "static_slot_order"; // flat / berth_preference

    // 堆场拓扑
    pub const YARD_LAYOUT: &str = "yard_layout";             // 箱区列表 (JSON)
}
