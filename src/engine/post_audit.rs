// ==========================================
// 餐饮门店排班系统 - 排班后审引擎
// ==========================================
// 提交后的事后体检,只产出警告,从不回滚:
// - 全职实际出勤天数 vs 应出勤天数
// - 计划休息日被占用（软约束违规提示）
// ==========================================

use crate::domain::employee::Employee;
use crate::domain::schedule::ScheduleWarning;
use crate::engine::tracker::AssignmentTracker;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

// ==========================================
// PostAuditor - 排班后审引擎
// ==========================================

pub struct PostAuditor;

impl Default for PostAuditor {
    fn default() -> Self {
        Self::new()
    }
}

impl PostAuditor {
    pub fn new() -> Self {
        Self
    }

    /// 执行后审
    ///
    /// 范围: 本轮持有至少一个岗位的员工
    ///
    /// # 参数
    /// - employees: 员工ID -> 员工
    /// - employees_with_roles: 持岗员工ID集合
    /// - planned_off: 员工 -> 计划休息日
    /// - tracker: 最终分配状态（历史 + 新生成）
    pub fn audit(
        &self,
        employees: &BTreeMap<String, Employee>,
        employees_with_roles: &BTreeSet<String>,
        planned_off: &HashMap<String, BTreeSet<NaiveDate>>,
        tracker: &AssignmentTracker,
        days_in_month: u32,
    ) -> Vec<ScheduleWarning> {
        let mut warnings = Vec::new();

        for employee_id in employees_with_roles {
            let Some(employee) = employees.get(employee_id) else {
                continue;
            };
            if !employee.contract_type.is_full_time() {
                continue;
            }

            let expected = employee.required_working_days(days_in_month);
            let assigned = tracker.assigned_days(employee_id);
            if assigned != expected {
                debug!(
                    employee_id = %employee_id,
                    expected, assigned, "全职出勤天数偏离配额"
                );
                warnings.push(ScheduleWarning::QuotaMismatch {
                    employee_id: employee_id.clone(),
                    employee_name: employee.name.clone(),
                    expected_days: expected,
                    assigned_days: assigned,
                    difference: assigned - expected,
                });
            }

            if let Some(off_days) = planned_off.get(employee_id) {
                for &date in off_days {
                    if tracker.has_assignment_on(employee_id, date) {
                        warnings.push(ScheduleWarning::PlannedOffViolation {
                            employee_id: employee_id.clone(),
                            employee_name: employee.name.clone(),
                            date,
                        });
                    }
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ContractType;
    use chrono::Utc;

    fn employee(id: &str, contract: ContractType, quota: i32) -> Employee {
        Employee {
            employee_id: id.to_string(),
            branch_id: "B1".to_string(),
            name: format!("员工{id}"),
            contract_type: contract,
            weekly_min_hours: 10.0,
            weekly_max_hours: 40.0,
            free_days_per_month: quota,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_quota_mismatch_reports_shortfall() {
        // 配额28 -> 应出勤2天,实际1天
        let mut employees = BTreeMap::new();
        employees.insert("E1".to_string(), employee("E1", ContractType::FullTime, 28));
        let with_roles: BTreeSet<String> = ["E1".to_string()].into_iter().collect();
        let planned = HashMap::new();
        let mut tracker = AssignmentTracker::new(date(1));
        tracker.record("E1", date(2), 5.0);

        let warnings = PostAuditor::new().audit(&employees, &with_roles, &planned, &tracker, 30);

        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            ScheduleWarning::QuotaMismatch {
                expected_days: 2,
                assigned_days: 1,
                difference: -1,
                ..
            }
        ));
    }

    #[test]
    fn test_exact_quota_is_silent() {
        let mut employees = BTreeMap::new();
        employees.insert("E1".to_string(), employee("E1", ContractType::FullTime, 28));
        let with_roles: BTreeSet<String> = ["E1".to_string()].into_iter().collect();
        let planned = HashMap::new();
        let mut tracker = AssignmentTracker::new(date(1));
        tracker.record("E1", date(2), 5.0);
        tracker.record("E1", date(3), 5.0);

        let warnings = PostAuditor::new().audit(&employees, &with_roles, &planned, &tracker, 30);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_part_time_not_audited() {
        let mut employees = BTreeMap::new();
        employees.insert("E1".to_string(), employee("E1", ContractType::PartTime, 0));
        let with_roles: BTreeSet<String> = ["E1".to_string()].into_iter().collect();
        let planned = HashMap::new();
        let tracker = AssignmentTracker::new(date(1));

        let warnings = PostAuditor::new().audit(&employees, &with_roles, &planned, &tracker, 30);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_planned_off_violation_detected() {
        // 配额29 -> 应出勤1天,在计划休息日出勤
        let mut employees = BTreeMap::new();
        employees.insert("E1".to_string(), employee("E1", ContractType::FullTime, 29));
        let with_roles: BTreeSet<String> = ["E1".to_string()].into_iter().collect();
        let mut planned: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
        planned.entry("E1".to_string()).or_default().insert(date(9));
        let mut tracker = AssignmentTracker::new(date(1));
        tracker.record("E1", date(9), 5.0);

        let warnings = PostAuditor::new().audit(&employees, &with_roles, &planned, &tracker, 30);

        assert!(warnings.iter().any(|w| matches!(
            w,
            ScheduleWarning::PlannedOffViolation { date: d, .. } if *d == date(9)
        )));
    }
}
