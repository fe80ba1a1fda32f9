// ==========================================
// 餐饮门店排班系统 - 容量预检引擎
// ==========================================
// 写入前的建议性容量体检: 逐岗位对比窗口内需求总量与
// 可用员工容量（人天与工时两个口径）。只产出警告,不阻断
// ==========================================

use crate::domain::assignment::round_hours;
use crate::domain::employee::Employee;
use crate::domain::schedule::{DemandLine, ScheduleWarning};
use crate::engine::demand::GenerationWindow;
use crate::engine::tracker::AssignmentTracker;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// 工时对账容差: 两位小数口径下半个最低位
const HOURS_TOLERANCE: f64 = 0.005;

// ==========================================
// CapacityAuditor - 容量预检引擎
// ==========================================

pub struct CapacityAuditor;

impl Default for CapacityAuditor {
    fn default() -> Self {
        Self::new()
    }
}

impl CapacityAuditor {
    pub fn new() -> Self {
        Self
    }

    /// 执行容量预检
    ///
    /// 逐岗位:
    /// - 需求人天 = Σ required_count; 需求工时 = Σ required_count × 班次净工时
    /// - 容量人天 = Σ(持岗员工) min(剩余配额人天, 窗口内可用天数)
    ///   其中全职剩余配额 = 应出勤天数 - 已分配天数; 非全职不设配额上限
    /// - 容量工时 = 逐员工人天 × (周最大工时 / 5)
    ///
    /// # 参数
    /// - role_holders: 岗位 -> 持岗员工ID（升序,仅在职）
    /// - exceptions: 员工 -> 不可用日期
    /// - tracker: 已用历史班次预热的跟踪器
    /// - role_names: 岗位ID -> 岗位名（警告展示用）
    pub fn audit(
        &self,
        window: &GenerationWindow,
        demand_index: &BTreeMap<NaiveDate, Vec<DemandLine>>,
        employees: &BTreeMap<String, Employee>,
        role_holders: &BTreeMap<String, Vec<String>>,
        exceptions: &HashMap<String, BTreeSet<NaiveDate>>,
        tracker: &AssignmentTracker,
        role_names: &HashMap<String, String>,
    ) -> Vec<ScheduleWarning> {
        // 岗位 -> (需求人天, 需求工时)
        let mut required: BTreeMap<&str, (i64, f64)> = BTreeMap::new();
        for lines in demand_index.values() {
            for line in lines {
                let entry = required.entry(line.role_id.as_str()).or_insert((0, 0.0));
                entry.0 += line.required_count as i64;
                entry.1 += line.required_count as f64 * line.net_hours();
            }
        }

        let window_days = window.len_days();
        let mut warnings = Vec::new();

        for (role_id, (required_days, required_hours)) in required {
            let role_name = role_names
                .get(role_id)
                .cloned()
                .unwrap_or_else(|| role_id.to_string());

            let holders = role_holders.get(role_id);
            let holders = match holders {
                Some(h) if !h.is_empty() => h,
                _ => {
                    warnings.push(ScheduleWarning::RoleWithoutEmployees {
                        work_role_name: role_name,
                        required_days,
                    });
                    continue;
                }
            };

            let mut capacity_days: i64 = 0;
            let mut capacity_hours: f64 = 0.0;
            for employee_id in holders {
                let Some(employee) = employees.get(employee_id) else {
                    continue;
                };
                let exception_days = exceptions
                    .get(employee_id)
                    .map(|dates| dates.iter().filter(|d| window.contains(**d)).count() as i64)
                    .unwrap_or(0);
                let available_days = (window_days - exception_days).max(0);

                let quota_days = if employee.contract_type.is_full_time() {
                    (employee.required_working_days(window.days_in_month)
                        - tracker.assigned_days(employee_id))
                    .max(0)
                } else {
                    available_days
                };

                let employee_days = quota_days.min(available_days);
                capacity_days += employee_days;
                capacity_hours += employee_days as f64 * (employee.weekly_max_hours / 5.0);
            }

            debug!(
                role_id,
                required_days, required_hours, capacity_days, capacity_hours, "岗位容量核对"
            );

            if capacity_days < required_days {
                warnings.push(ScheduleWarning::CapacityDaysShortfall {
                    work_role_name: role_name.clone(),
                    required_days,
                    capacity_days,
                    gap_days: required_days - capacity_days,
                });
            }

            let required_hours = round_hours(required_hours);
            let capacity_hours = round_hours(capacity_hours);
            if (capacity_hours - required_hours).abs() > HOURS_TOLERANCE {
                warnings.push(ScheduleWarning::CapacityHoursMismatch {
                    work_role_name: role_name,
                    required_hours,
                    capacity_hours,
                    gap_hours: round_hours(required_hours - capacity_hours),
                });
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ContractType, DemandSource};
    use chrono::{NaiveTime, Utc};

    fn employee(id: &str, contract: ContractType, quota: i32, max_hours: f64) -> Employee {
        Employee {
            employee_id: id.to_string(),
            branch_id: "B1".to_string(),
            name: format!("员工{id}"),
            contract_type: contract,
            weekly_min_hours: 10.0,
            weekly_max_hours: max_hours,
            free_days_per_month: quota,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn june_window() -> GenerationWindow {
        GenerationWindow {
            month_start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            days_in_month: 30,
        }
    }

    fn daily_demand(
        window: &GenerationWindow,
        role: &str,
        count: i32,
        hours: u32,
    ) -> BTreeMap<NaiveDate, Vec<DemandLine>> {
        let mut index = BTreeMap::new();
        for date in window.dates() {
            index.insert(
                date,
                vec![DemandLine {
                    date,
                    area_id: "A1".to_string(),
                    role_id: role.to_string(),
                    start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(10 + hours, 0, 0).unwrap(),
                    break_minutes: 0,
                    lunch_minutes: 0,
                    required_count: count,
                    notes: None,
                    source: DemandSource::WeeklyTemplate,
                    source_id: "T1".to_string(),
                }],
            );
        }
        index
    }

    #[test]
    fn test_role_without_employees() {
        let window = june_window();
        let demand = daily_demand(&window, "R-COOK", 2, 8);
        let employees = BTreeMap::new();
        let role_holders = BTreeMap::new();
        let exceptions = HashMap::new();
        let tracker = AssignmentTracker::new(window.month_start);
        let mut role_names = HashMap::new();
        role_names.insert("R-COOK".to_string(), "厨师".to_string());

        let warnings = CapacityAuditor::new().audit(
            &window,
            &demand,
            &employees,
            &role_holders,
            &exceptions,
            &tracker,
            &role_names,
        );

        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            ScheduleWarning::RoleWithoutEmployees {
                work_role_name,
                required_days: 60,
            } if work_role_name == "厨师"
        ));
    }

    #[test]
    fn test_capacity_shortfall_and_hours_gap() {
        let window = june_window();
        // 每天需1人×5小时,共30人天/150小时
        let demand = daily_demand(&window, "R-CASHIER", 1, 5);

        // 唯一全职,配额6 -> 应出勤24天,容量 24 × (40/5) = 192 小时
        let mut employees = BTreeMap::new();
        employees.insert(
            "E1".to_string(),
            employee("E1", ContractType::FullTime, 6, 40.0),
        );
        let mut role_holders = BTreeMap::new();
        role_holders.insert("R-CASHIER".to_string(), vec!["E1".to_string()]);
        let exceptions = HashMap::new();
        let tracker = AssignmentTracker::new(window.month_start);
        let role_names = HashMap::new();

        let warnings = CapacityAuditor::new().audit(
            &window,
            &demand,
            &employees,
            &role_holders,
            &exceptions,
            &tracker,
            &role_names,
        );

        // 人天: 24 < 30 -> 缺口6; 工时: 192 vs 150 -> 富余,gap 为负
        assert_eq!(warnings.len(), 2);
        assert!(matches!(
            warnings[0],
            ScheduleWarning::CapacityDaysShortfall {
                required_days: 30,
                capacity_days: 24,
                gap_days: 6,
                ..
            }
        ));
        match &warnings[1] {
            ScheduleWarning::CapacityHoursMismatch {
                required_hours,
                capacity_hours,
                gap_hours,
                ..
            } => {
                assert!((required_hours - 150.0).abs() < 1e-9);
                assert!((capacity_hours - 192.0).abs() < 1e-9);
                assert!((gap_hours - (-42.0)).abs() < 1e-9);
            }
            other => panic!("意外警告: {other:?}"),
        }
    }

    #[test]
    fn test_exceptions_reduce_part_time_capacity() {
        let window = june_window();
        let demand = daily_demand(&window, "R-CASHIER", 1, 8);

        let mut employees = BTreeMap::new();
        employees.insert(
            "E1".to_string(),
            employee("E1", ContractType::PartTime, 0, 40.0),
        );
        let mut role_holders = BTreeMap::new();
        role_holders.insert("R-CASHIER".to_string(), vec!["E1".to_string()]);
        let mut exceptions: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
        let set = exceptions.entry("E1".to_string()).or_default();
        for d in 1..=10 {
            set.insert(NaiveDate::from_ymd_opt(2025, 6, d).unwrap());
        }
        let tracker = AssignmentTracker::new(window.month_start);
        let role_names = HashMap::new();

        let warnings = CapacityAuditor::new().audit(
            &window,
            &demand,
            &employees,
            &role_holders,
            &exceptions,
            &tracker,
            &role_names,
        );

        // 非全职容量 = 30 - 10 例外 = 20 人天 < 30 需求
        assert!(warnings.iter().any(|w| matches!(
            w,
            ScheduleWarning::CapacityDaysShortfall {
                capacity_days: 20,
                gap_days: 10,
                ..
            }
        )));
    }
}
