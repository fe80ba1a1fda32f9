// ==========================================
// 餐饮门店排班系统 - 班次分配领域模型
// ==========================================
// 引擎输出实体,按生成窗口整体替换（软删除旧行）
// ==========================================

use crate::domain::types::ApprovalState;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// 净工时保留两位小数
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// 计算净工时
///
/// 公式: max(0, (end − start) − break − lunch),两位小数
///
/// # 参数
/// - start / end: 班次起止时间
/// - break_minutes / lunch_minutes: 扣除时长（分钟）
pub fn calculate_worked_hours(
    start: NaiveTime,
    end: NaiveTime,
    break_minutes: i64,
    lunch_minutes: i64,
) -> f64 {
    let gross_minutes = (end - start).num_minutes();
    let net_minutes = gross_minutes - break_minutes - lunch_minutes;
    round_hours((net_minutes.max(0)) as f64 / 60.0)
}

// ==========================================
// ShiftAssignment - 班次分配
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftAssignment {
    // ===== 主键 =====
    pub assignment_id: String, // 分配ID (UUID)
    pub branch_id: String,     // 所属门店

    // ===== 分配内容 =====
    pub employee_id: String,   // 员工ID
    pub date: NaiveDate,       // 排班日期
    pub area_id: String,       // 工作区域
    pub role_id: String,       // 岗位
    pub start_time: NaiveTime, // 班次开始
    pub end_time: NaiveTime,   // 班次结束
    pub break_minutes: i64,    // 休息时长（分钟）
    pub lunch_minutes: i64,    // 用餐时长（分钟）
    pub worked_hours: f64,     // 净工时（两位小数）

    // ===== 状态 =====
    pub approval_state: ApprovalState, // 审批状态
    pub notes: Option<String>,         // 备注
    pub deleted: bool,                 // 软删除标志

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_hours_basic() {
        // 09:00-17:00, 30分钟休息 + 30分钟用餐 => 7.0h
        let h = calculate_worked_hours(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            30,
            30,
        );
        assert_eq!(h, 7.0);
    }

    #[test]
    fn test_worked_hours_two_decimals() {
        // 09:00-13:20, 无扣除 => 4.33h
        let h = calculate_worked_hours(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(13, 20, 0).unwrap(),
            0,
            0,
        );
        assert_eq!(h, 4.33);
    }

    #[test]
    fn test_worked_hours_never_negative() {
        // 扣除超过班次时长时取 0
        let h = calculate_worked_hours(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            60,
            30,
        );
        assert_eq!(h, 0.0);
    }
}
