// ==========================================
// 餐饮门店排班系统 - 休息日规划引擎
// ==========================================
// 为全职员工预排计划休息日:
// - 周节奏 [1, 2, 1, 2] 循环,周窗口按月1号对齐
// - 候选日仅限周一至周五,周末竞争留给正常分配
// - 输出仅为建议: 经由可行性过滤引导分配,违规由后审提示
// ==========================================

use crate::domain::employee::{Employee, EmployeeRoleAssignment};
use crate::domain::schedule::DemandLine;
use crate::engine::demand::GenerationWindow;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

/// 周休息日节奏: 第1周1天,第2周2天,循环往复
const WEEKLY_REST_PATTERN: [u32; 4] = [1, 2, 1, 2];

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// ==========================================
// OffDayPlanner - 休息日规划引擎
// ==========================================

pub struct OffDayPlanner;

impl Default for OffDayPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl OffDayPlanner {
    pub fn new() -> Self {
        Self
    }

    /// 为全部全职员工规划计划休息日
    ///
    /// # 参数
    /// - window: 生成窗口
    /// - employees: 在职员工（内部仅处理全职）
    /// - role_assignments: 员工岗位关联（用于需求评分）
    /// - demand_index: 逐日需求索引
    ///
    /// # 返回
    /// - 员工ID -> 计划休息日集合（非全职员工不出现在结果中）
    pub fn plan(
        &self,
        window: &GenerationWindow,
        employees: &[Employee],
        role_assignments: &[EmployeeRoleAssignment],
        demand_index: &BTreeMap<NaiveDate, Vec<DemandLine>>,
    ) -> HashMap<String, BTreeSet<NaiveDate>> {
        let mut roles_by_employee: HashMap<&str, HashSet<&str>> = HashMap::new();
        for ra in role_assignments {
            roles_by_employee
                .entry(ra.employee_id.as_str())
                .or_default()
                .insert(ra.role_id.as_str());
        }

        let mut planned: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
        for employee in employees {
            if !employee.contract_type.is_full_time() {
                continue;
            }
            let roles = roles_by_employee
                .get(employee.employee_id.as_str())
                .cloned()
                .unwrap_or_default();
            let days = self.plan_for_employee(window, employee, &roles, demand_index);
            debug!(
                employee_id = %employee.employee_id,
                planned_days = days.len(),
                quota = employee.free_days_per_month,
                "计划休息日已规划"
            );
            planned.insert(employee.employee_id.clone(), days);
        }
        planned
    }

    fn plan_for_employee(
        &self,
        window: &GenerationWindow,
        employee: &Employee,
        roles: &HashSet<&str>,
        demand_index: &BTreeMap<NaiveDate, Vec<DemandLine>>,
    ) -> BTreeSet<NaiveDate> {
        let mut result = BTreeSet::new();
        let mut remaining = employee.free_days_per_month.max(0) as u32;
        if remaining == 0 {
            return result;
        }

        let score = |date: NaiveDate| -> i64 {
            demand_index
                .get(&date)
                .map(|lines| {
                    lines
                        .iter()
                        .filter(|l| roles.contains(l.role_id.as_str()))
                        .map(|l| l.required_count as i64)
                        .sum()
                })
                .unwrap_or(0)
        };

        let mut week = 0usize;
        loop {
            let week_start = window.month_start + Duration::days(7 * week as i64);
            if week_start > window.end || remaining == 0 {
                break;
            }
            let week_end = (week_start + Duration::days(6)).min(window.end);

            // 候选日: 本周内、窗口内的工作日（周一至周五）
            let mut candidates: Vec<NaiveDate> = Vec::new();
            let mut d = week_start.max(window.start);
            while d <= week_end {
                if is_weekday(d) {
                    candidates.push(d);
                }
                d += Duration::days(1);
            }

            // 没有候选日的周直接跳过,不消耗配额
            if candidates.is_empty() {
                week += 1;
                continue;
            }

            let needed = WEEKLY_REST_PATTERN[week % WEEKLY_REST_PATTERN.len()].min(remaining);
            let picked = if needed >= 2 {
                self.pick_two(&candidates, &score)
            } else {
                vec![self.pick_one(&candidates, &score)]
            };

            for date in picked {
                if remaining == 0 {
                    break;
                }
                result.insert(date);
                remaining -= 1;
            }
            week += 1;
        }

        result
    }

    /// 取单日: 需求分最低,并列取最早日期
    fn pick_one(&self, candidates: &[NaiveDate], score: &impl Fn(NaiveDate) -> i64) -> NaiveDate {
        *candidates
            .iter()
            .min_by_key(|&&d| (score(d), d))
            .unwrap()
    }

    /// 取两日: 优先相邻工作日对（合计分最低,并列取最早）,
    /// 无相邻对时退化为两个最低分单日
    fn pick_two(&self, candidates: &[NaiveDate], score: &impl Fn(NaiveDate) -> i64) -> Vec<NaiveDate> {
        let set: BTreeSet<NaiveDate> = candidates.iter().copied().collect();
        let best_pair = candidates
            .iter()
            .filter(|&&d| set.contains(&(d + Duration::days(1))))
            .map(|&d| (score(d) + score(d + Duration::days(1)), d))
            .min();

        if let Some((_, first)) = best_pair {
            return vec![first, first + Duration::days(1)];
        }

        // 无相邻对: 取两个最低分单日
        let mut sorted: Vec<NaiveDate> = candidates.to_vec();
        sorted.sort_by_key(|&d| (score(d), d));
        sorted.into_iter().take(2).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ContractType, DemandSource};
    use chrono::{NaiveTime, Utc};

    fn full_time_employee(id: &str, quota: i32) -> Employee {
        Employee {
            employee_id: id.to_string(),
            branch_id: "B1".to_string(),
            name: format!("员工{id}"),
            contract_type: ContractType::FullTime,
            weekly_min_hours: 20.0,
            weekly_max_hours: 40.0,
            free_days_per_month: quota,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn role_link(employee: &str, role: &str) -> EmployeeRoleAssignment {
        EmployeeRoleAssignment {
            employee_id: employee.to_string(),
            role_id: role.to_string(),
            is_primary: true,
            priority_rank: 1,
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

    fn flat_demand(window: &GenerationWindow, role: &str) -> BTreeMap<NaiveDate, Vec<DemandLine>> {
        let mut index = BTreeMap::new();
        for date in window.dates() {
            index.insert(
                date,
                vec![DemandLine {
                    date,
                    area_id: "A1".to_string(),
                    role_id: role.to_string(),
                    start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
                    break_minutes: 0,
                    lunch_minutes: 0,
                    required_count: 1,
                    notes: None,
                    source: DemandSource::WeeklyTemplate,
                    source_id: "T1".to_string(),
                }],
            );
        }
        index
    }

    #[test]
    fn test_pattern_1212_with_flat_demand() {
        // 2025-06-01 是周日: 第0周工作日为 2..6,第1周为 9..13,以此类推
        let window = june_window();
        let demand = flat_demand(&window, "R-CASHIER");
        let employee = full_time_employee("E1", 6);
        let links = vec![role_link("E1", "R-CASHIER")];

        let planned = OffDayPlanner::new().plan(&window, &[employee], &links, &demand);
        let days = &planned["E1"];

        // 平分需求下: 每周取最早候选; [1,2,1,2] -> 2日 / 9,10日 / 16日 / 23,24日
        let expected: BTreeSet<NaiveDate> = [2, 9, 10, 16, 23, 24]
            .iter()
            .map(|&d| NaiveDate::from_ymd_opt(2025, 6, d).unwrap())
            .collect();
        assert_eq!(days, &expected);
    }

    #[test]
    fn test_quota_exhaustion_stops_planning() {
        let window = june_window();
        let demand = flat_demand(&window, "R-CASHIER");
        let employee = full_time_employee("E1", 2);
        let links = vec![role_link("E1", "R-CASHIER")];

        let planned = OffDayPlanner::new().plan(&window, &[employee], &links, &demand);
        // 配额2: 第0周1天 + 第1周只取1天（配额钳制）
        assert_eq!(planned["E1"].len(), 2);
    }

    #[test]
    fn test_part_time_employee_gets_no_plan() {
        let window = june_window();
        let demand = flat_demand(&window, "R-CASHIER");
        let mut employee = full_time_employee("E1", 6);
        employee.contract_type = ContractType::PartTime;
        let links = vec![role_link("E1", "R-CASHIER")];

        let planned = OffDayPlanner::new().plan(&window, &[employee], &links, &demand);
        assert!(planned.is_empty());
    }

    #[test]
    fn test_low_demand_day_preferred() {
        let window = june_window();
        let mut demand = flat_demand(&window, "R-CASHIER");
        // 6月2日（周一）需求调高,首周应改选6月3日
        if let Some(lines) = demand.get_mut(&NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()) {
            lines[0].required_count = 5;
        }
        let employee = full_time_employee("E1", 1);
        let links = vec![role_link("E1", "R-CASHIER")];

        let planned = OffDayPlanner::new().plan(&window, &[employee], &links, &demand);
        assert_eq!(
            planned["E1"].iter().next().copied().unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()
        );
    }

    #[test]
    fn test_consecutive_pair_preferred_over_cheapest_singles() {
        let window = june_window();
        let mut demand = flat_demand(&window, "R-CASHIER");
        // 第1周（9..13）: 把 9 和 11 调为 0 分是不可能的（已是1）,
        // 改为把 10 调高,相邻对 (11,12) 合计分低于 (9,10)
        if let Some(lines) = demand.get_mut(&NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()) {
            lines[0].required_count = 9;
        }
        let employee = full_time_employee("E1", 3);
        let links = vec![role_link("E1", "R-CASHIER")];

        let planned = OffDayPlanner::new().plan(&window, &[employee], &links, &demand);
        let days = &planned["E1"];
        // 第1周取相邻对 11,12 而不是单日最低的 9 与 11
        assert!(days.contains(&NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()));
        assert!(days.contains(&NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()));
        assert!(!days.contains(&NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()));
    }
}
