// ==========================================
// 集装箱堆场排位系统 - 命令行入口
// ==========================================
// 用法:
//   container-yard-aps <vessels.xlsx|.csv> [db_path] [--static]
// 流程: 日志 → 数据库 → 配置 → 导入 → 模拟 → 落库 → 摘要
// ==========================================

use anyhow::{bail, Context, Result};
use container_yard_aps::db::{default_db_path, open_sqlite_connection};
use container_yard_aps::{
    logging, ConfigManager, SimulationRepository, VesselImporter, YardPlanner, APP_NAME, VERSION,
};
use std::sync::{Arc, Mutex};
use tracing::info;

struct CliArgs {
    input: String,
    db_path: String,
    run_static: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut positional = Vec::new();
    let mut run_static = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--static" => run_static = true,
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let input = match positional.next() {
        Some(p) => p,
        None => bail!("用法: container-yard-aps <vessels.xlsx|.csv> [db_path] [--static]"),
    };
    let db_path = positional.next().unwrap_or_else(default_db_path);

    Ok(CliArgs {
        input,
        db_path,
        run_static,
    })
}

fn main() -> Result<()> {
    logging::init();
    let args = parse_args()?;

    info!("==================================================");
    info!("{} v{}", APP_NAME, VERSION);
    info!("使用数据库: {}", args.db_path);
    info!("==================================================");

    let conn = open_sqlite_connection(&args.db_path)
        .with_context(|| format!("无法打开数据库: {}", args.db_path))?;
    let conn = Arc::new(Mutex::new(conn));

    let config_manager = ConfigManager::from_connection(conn.clone())?;
    let config = config_manager.load_simulation_config()?;
    let layout = config_manager.load_yard_layout()?;

    let repo = SimulationRepository::new(conn);
    repo.ensure_schema()?;

    let records = VesselImporter::new()
        .import_file(&args.input)
        .with_context(|| format!("船期导入失败: {}", args.input))?;

    let planner = YardPlanner::new(config, layout);

    let timeline = planner.run_timeline(&records);
    repo.save_timeline(&timeline)?;

    println!("run_id       : {}", timeline.run_id);
    println!("vessels      : {}", records.len());
    println!("days         : {}", timeline.day_count());
    println!("events       : {}", timeline.events.len());
    match timeline.peak_day() {
        Some((date, occupied)) => println!("peak day     : {} ({} TEU)", date, occupied),
        None => println!("peak day     : -"),
    }
    println!("shortfall    : {}", timeline.shortfall_total());

    if args.run_static {
        let static_result = planner.run_static(&records);
        repo.save_static(&static_result)?;

        println!("static run   : {}", static_result.run_id);
        println!("allocated    : {}", static_result.total_allocated());
        for (vessel, remaining) in &static_result.unallocated {
            println!("unallocated  : {} {}", vessel, remaining);
        }
    }

    Ok(())
}
