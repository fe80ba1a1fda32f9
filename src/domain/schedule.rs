// ==========================================
// 餐饮门店排班系统 - 排班运行领域模型
// ==========================================
// 需求线 / 门店排班配置 / 诊断警告
// ==========================================

use crate::domain::assignment::calculate_worked_hours;
use crate::domain::types::{CoverageReason, DemandSource};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// DemandLine - 单日需求线
// ==========================================
// 由 DemandResolver 将周模板与特殊日期模板合并得出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandLine {
    pub date: NaiveDate,       // 需求日期
    pub area_id: String,       // 工作区域
    pub role_id: String,       // 岗位
    pub start_time: NaiveTime, // 班次开始
    pub end_time: NaiveTime,   // 班次结束
    pub break_minutes: i64,    // 休息时长（分钟）
    pub lunch_minutes: i64,    // 用餐时长（分钟）
    pub required_count: i32,   // 需求人数
    pub notes: Option<String>, // 备注
    pub source: DemandSource,  // 来源（周模板/特殊日期）
    pub source_id: String,     // 来源模板ID（用于确定性排序）
}

impl DemandLine {
    /// 该需求线单个班次的净工时
    pub fn net_hours(&self) -> f64 {
        calculate_worked_hours(
            self.start_time,
            self.end_time,
            self.break_minutes,
            self.lunch_minutes,
        )
    }
}

// ==========================================
// ScheduleConfiguration - 门店排班配置
// ==========================================
// hours_per_day 为历史遗留配置: 持久化但算法不消费
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfiguration {
    pub branch_id: String,             // 门店ID
    pub hours_per_day: f64,            // 参考每日工时（遗留,不参与计算）
    pub calendar_color: Option<String>, // 日历颜色提示（UI 专用）
}

// ==========================================
// ScheduleWarning - 诊断警告
// ==========================================
// 所有警告均为建议性: 不阻断生成,不触发回滚
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleWarning {
    /// 覆盖缺口: 某需求线未能配满
    #[serde(rename_all = "camelCase")]
    Coverage {
        date: NaiveDate,
        weekday: String,
        work_area_name: String,
        work_role_name: String,
        required_count: i32,
        assigned_count: i32,
        reason: CoverageReason,
        message: String,
    },

    /// 预检: 岗位没有任何可用员工
    #[serde(rename_all = "camelCase")]
    RoleWithoutEmployees {
        work_role_name: String,
        required_days: i64,
    },

    /// 预检: 人天容量不足
    #[serde(rename_all = "camelCase")]
    CapacityDaysShortfall {
        work_role_name: String,
        required_days: i64,
        capacity_days: i64,
        gap_days: i64,
    },

    /// 预检: 工时容量与需求不一致（缺口为正,富余为负）
    #[serde(rename_all = "camelCase")]
    CapacityHoursMismatch {
        work_role_name: String,
        required_hours: f64,
        capacity_hours: f64,
        gap_hours: f64,
    },

    /// 后审: 全职员工实际出勤天数偏离配额
    #[serde(rename_all = "camelCase")]
    QuotaMismatch {
        employee_id: String,
        employee_name: String,
        expected_days: i64,
        assigned_days: i64,
        difference: i64,
    },

    /// 后审: 计划休息日被实际排班占用（软约束违规,仅提示）
    #[serde(rename_all = "camelCase")]
    PlannedOffViolation {
        employee_id: String,
        employee_name: String,
        date: NaiveDate,
    },
}

impl ScheduleWarning {
    /// 是否为覆盖缺口警告（totalShiftsNotCovered 仅统计此类）
    pub fn is_coverage(&self) -> bool {
        matches!(self, ScheduleWarning::Coverage { .. })
    }

    /// 覆盖缺口数量（required − assigned）,非覆盖警告为 0
    pub fn uncovered_count(&self) -> i32 {
        match self {
            ScheduleWarning::Coverage {
                required_count,
                assigned_count,
                ..
            } => (required_count - assigned_count).max(0),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncovered_count() {
        let w = ScheduleWarning::Coverage {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            weekday: "Monday".to_string(),
            work_area_name: "前厅".to_string(),
            work_role_name: "收银".to_string(),
            required_count: 3,
            assigned_count: 1,
            reason: CoverageReason::LimitsReached,
            message: String::new(),
        };
        assert!(w.is_coverage());
        assert_eq!(w.uncovered_count(), 2);

        let q = ScheduleWarning::QuotaMismatch {
            employee_id: "E1".to_string(),
            employee_name: "张三".to_string(),
            expected_days: 24,
            assigned_days: 22,
            difference: -2,
        };
        assert!(!q.is_coverage());
        assert_eq!(q.uncovered_count(), 0);
    }
}
