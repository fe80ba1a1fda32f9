// ==========================================
// 餐饮门店排班系统 - 命令行主入口
// ==========================================
// 用法: restaurant-shift-aps <branch_id> <year> <month> [db_path]
// 输出: 生成摘要（日志）+ 响应 JSON（标准输出）
// ==========================================

use restaurant_shift_aps::api::GenerateScheduleRequest;
use restaurant_shift_aps::app::{get_default_db_path, AppState};
use restaurant_shift_aps::{i18n, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", restaurant_shift_aps::APP_NAME);
    tracing::info!("系统版本: {}", restaurant_shift_aps::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("用法: {} <branch_id> <year> <month> [db_path]", args[0]);
        return ExitCode::from(2);
    }

    let branch_id = args[1].clone();
    let (year, month) = match (args[2].parse::<i32>(), args[3].parse::<u32>()) {
        (Ok(y), Ok(m)) => (y, m),
        _ => {
            eprintln!("年月参数必须为数字: year={}, month={}", args[2], args[3]);
            return ExitCode::from(2);
        }
    };
    let db_path = args
        .get(4)
        .cloned()
        .unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = match AppState::new(db_path) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("AppState 初始化失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "{}",
        i18n::t_with_args(
            "schedule.generate.start",
            &[("year", &year.to_string()), ("month", &month.to_string())]
        )
    );

    let request = GenerateScheduleRequest {
        branch_id,
        year,
        month,
    };
    let response = match state.schedule_api.generate_schedule(request).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("排班生成失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "{}",
        i18n::t_with_args(
            "schedule.generate.done",
            &[("count", &response.total_shifts_generated.to_string())]
        )
    );
    if response.total_shifts_not_covered > 0 {
        tracing::warn!(
            "{}",
            i18n::t_with_args(
                "schedule.generate.not_covered",
                &[("count", &response.total_shifts_not_covered.to_string())]
            )
        );
    }
    if !response.warnings.is_empty() {
        tracing::warn!(
            "{}",
            i18n::t_with_args(
                "schedule.generate.warnings",
                &[("count", &response.warnings.len().to_string())]
            )
        );
    }

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("响应序列化失败: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
