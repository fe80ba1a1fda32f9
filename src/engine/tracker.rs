// ==========================================
// 餐饮门店排班系统 - 分配状态跟踪器
// ==========================================
// 贪心填充过程中的逐员工运行状态:
// - 已分配日期集合（含窗口外已保留的当月历史班次）
// - 月累计净工时
// - 逐周工时桶（周窗口按月1号对齐,每7天一桶,与自然周无关）
// ==========================================

use crate::domain::assignment::ShiftAssignment;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default, Clone)]
struct EmployeeRunState {
    assigned_dates: BTreeSet<NaiveDate>,
    total_hours: f64,
    week_hours: HashMap<i64, f64>, // 周索引 -> 累计净工时
}

// ==========================================
// AssignmentTracker - 分配状态跟踪器
// ==========================================

pub struct AssignmentTracker {
    month_start: NaiveDate,
    states: HashMap<String, EmployeeRunState>,
}

impl AssignmentTracker {
    /// 创建跟踪器,周索引以目标月1号为锚点
    pub fn new(month_start: NaiveDate) -> Self {
        Self {
            month_start,
            states: HashMap::new(),
        }
    }

    /// 日期所属周索引 = (日期 - 月1号) / 7
    ///
    /// 月内第1~7天为第0周,第8~14天为第1周,以此类推
    pub fn week_index(&self, date: NaiveDate) -> i64 {
        (date - self.month_start).num_days() / 7
    }

    /// 用当月已保留的历史班次预热状态
    ///
    /// 当月生成窗口之前的班次不重排,但其出勤天数与工时
    /// 必须计入配额与周工时上限
    pub fn seed_from_existing(&mut self, assignments: &[ShiftAssignment]) {
        for a in assignments {
            self.record(&a.employee_id, a.date, a.worked_hours);
        }
    }

    /// 记录一次分配
    pub fn record(&mut self, employee_id: &str, date: NaiveDate, hours: f64) {
        let widx = self.week_index(date);
        let state = self.states.entry(employee_id.to_string()).or_default();
        state.assigned_dates.insert(date);
        state.total_hours += hours;
        *state.week_hours.entry(widx).or_insert(0.0) += hours;
    }

    /// 员工当天是否已有班次
    pub fn has_assignment_on(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.states
            .get(employee_id)
            .map(|s| s.assigned_dates.contains(&date))
            .unwrap_or(false)
    }

    /// 员工当月已分配天数
    pub fn assigned_days(&self, employee_id: &str) -> i64 {
        self.states
            .get(employee_id)
            .map(|s| s.assigned_dates.len() as i64)
            .unwrap_or(0)
    }

    /// 员工当月累计净工时
    pub fn total_hours(&self, employee_id: &str) -> f64 {
        self.states
            .get(employee_id)
            .map(|s| s.total_hours)
            .unwrap_or(0.0)
    }

    /// 员工在指定日期所属周的累计净工时
    pub fn week_hours(&self, employee_id: &str, date: NaiveDate) -> f64 {
        let widx = self.week_index(date);
        self.states
            .get(employee_id)
            .and_then(|s| s.week_hours.get(&widx))
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_week_index_anchored_to_month_start() {
        let tracker = AssignmentTracker::new(date(1));
        assert_eq!(tracker.week_index(date(1)), 0);
        assert_eq!(tracker.week_index(date(7)), 0);
        assert_eq!(tracker.week_index(date(8)), 1);
        assert_eq!(tracker.week_index(date(14)), 1);
        assert_eq!(tracker.week_index(date(15)), 2);
        assert_eq!(tracker.week_index(date(29)), 4);
    }

    #[test]
    fn test_record_accumulates_per_week() {
        let mut tracker = AssignmentTracker::new(date(1));
        tracker.record("E1", date(2), 8.0);
        tracker.record("E1", date(3), 8.0);
        tracker.record("E1", date(9), 5.0);

        assert_eq!(tracker.assigned_days("E1"), 3);
        assert!((tracker.total_hours("E1") - 21.0).abs() < 1e-9);
        // date(2) 与 date(3) 同属第0周
        assert!((tracker.week_hours("E1", date(5)) - 16.0).abs() < 1e-9);
        // date(9) 属第1周
        assert!((tracker.week_hours("E1", date(9)) - 5.0).abs() < 1e-9);
        assert!(tracker.has_assignment_on("E1", date(2)));
        assert!(!tracker.has_assignment_on("E1", date(4)));
    }

    #[test]
    fn test_unknown_employee_defaults_to_zero() {
        let tracker = AssignmentTracker::new(date(1));
        assert_eq!(tracker.assigned_days("E9"), 0);
        assert_eq!(tracker.total_hours("E9"), 0.0);
        assert!(!tracker.has_assignment_on("E9", date(1)));
    }
}
