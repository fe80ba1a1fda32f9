// ==========================================
// 餐饮门店排班系统 - 班次分配引擎
// ==========================================
// 核心贪心循环: 按日期升序遍历需求线,逐个名额构建
// 可行候选并排序,取最优者成班; 配不满则记覆盖缺口警告。
// 全程无随机性,同输入必同输出
// ==========================================

use crate::domain::assignment::ShiftAssignment;
use crate::domain::employee::{Employee, EmployeeRoleAssignment};
use crate::domain::schedule::{DemandLine, ScheduleWarning};
use crate::domain::types::{ApprovalState, CoverageReason};
use crate::engine::eligibility::{CandidateContext, EligibilityFilter, RankedCandidate};
use crate::engine::tracker::AssignmentTracker;
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, instrument};
use uuid::Uuid;

// ==========================================
// AssignmentInputs - 分配引擎输入
// ==========================================
// 一次生成运行的全部只读预构建索引
pub struct AssignmentInputs<'a> {
    pub branch_id: &'a str,
    pub days_in_month: u32,
    pub demand_index: &'a BTreeMap<NaiveDate, Vec<DemandLine>>,
    pub employees: &'a BTreeMap<String, Employee>, // 员工ID -> 员工（仅在职）
    pub role_holders: &'a BTreeMap<String, Vec<String>>, // 岗位 -> 持岗员工ID（升序）
    pub role_links: &'a HashMap<(String, String), EmployeeRoleAssignment>, // (员工, 岗位) -> 关联
    pub exceptions: &'a HashMap<String, BTreeSet<NaiveDate>>,
    pub planned_off: &'a HashMap<String, BTreeSet<NaiveDate>>,
    pub area_names: &'a HashMap<String, String>,
    pub role_names: &'a HashMap<String, String>,
}

// ==========================================
// AssignmentOutcome - 分配结果
// ==========================================
pub struct AssignmentOutcome {
    pub assignments: Vec<ShiftAssignment>,
    pub warnings: Vec<ScheduleWarning>,
    pub total_not_covered: i32, // Σ(required - assigned),仅覆盖缺口
}

// ==========================================
// AssignmentEngine - 班次分配引擎
// ==========================================

pub struct AssignmentEngine {
    filter: EligibilityFilter,
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentEngine {
    pub fn new() -> Self {
        Self {
            filter: EligibilityFilter::new(),
        }
    }

    /// 执行贪心分配
    ///
    /// # 参数
    /// - inputs: 预构建只读索引
    /// - tracker: 已用窗口前历史班次预热的跟踪器（就地更新）
    ///
    /// # 返回
    /// - AssignmentOutcome: 新班次 + 覆盖缺口警告 + 未覆盖名额数
    #[instrument(skip_all, fields(branch_id = inputs.branch_id))]
    pub fn generate(
        &self,
        inputs: &AssignmentInputs,
        tracker: &mut AssignmentTracker,
    ) -> AssignmentOutcome {
        let mut assignments = Vec::new();
        let mut warnings = Vec::new();
        let mut total_not_covered = 0;

        for (date, lines) in inputs.demand_index {
            for line in lines {
                let assigned = self.fill_line(inputs, tracker, *date, line, &mut assignments);
                if assigned < line.required_count {
                    let reason = self.diagnose_gap(inputs, tracker, *date, line);
                    debug!(
                        date = %date,
                        role_id = %line.role_id,
                        required = line.required_count,
                        assigned,
                        ?reason,
                        "需求线未配满"
                    );
                    total_not_covered += line.required_count - assigned;
                    warnings.push(ScheduleWarning::Coverage {
                        date: *date,
                        weekday: date.format("%A").to_string(),
                        work_area_name: display_name(inputs.area_names, &line.area_id),
                        work_role_name: display_name(inputs.role_names, &line.role_id),
                        required_count: line.required_count,
                        assigned_count: assigned,
                        reason,
                        message: reason.description(),
                    });
                }
            }
        }

        AssignmentOutcome {
            assignments,
            warnings,
            total_not_covered,
        }
    }

    /// 填充单条需求线,返回实际成班名额数
    fn fill_line(
        &self,
        inputs: &AssignmentInputs,
        tracker: &mut AssignmentTracker,
        date: NaiveDate,
        line: &DemandLine,
        assignments: &mut Vec<ShiftAssignment>,
    ) -> i32 {
        let shift_hours = line.net_hours();
        let mut assigned = 0;

        for _slot in 0..line.required_count {
            let candidates = self.eligible_candidates(inputs, tracker, date, line, shift_hours);
            // 候选为空时后续名额状态不变,同样为空
            let Some(best) = self
                .filter
                .rank(candidates, tracker, inputs.days_in_month)
                .into_iter()
                .next()
            else {
                break;
            };

            let now = Utc::now();
            let assignment = ShiftAssignment {
                assignment_id: Uuid::new_v4().to_string(),
                branch_id: inputs.branch_id.to_string(),
                employee_id: best.employee.employee_id.clone(),
                date,
                area_id: line.area_id.clone(),
                role_id: line.role_id.clone(),
                start_time: line.start_time,
                end_time: line.end_time,
                break_minutes: line.break_minutes,
                lunch_minutes: line.lunch_minutes,
                worked_hours: shift_hours,
                approval_state: ApprovalState::Pending,
                notes: line.notes.clone(),
                deleted: false,
                created_at: now,
                updated_at: now,
            };
            tracker.record(&assignment.employee_id, date, shift_hours);
            assignments.push(assignment);
            assigned += 1;
        }

        assigned
    }

    /// 构建当前名额的可行候选（按 employee_id 升序进入排序）
    fn eligible_candidates<'a>(
        &self,
        inputs: &AssignmentInputs<'a>,
        tracker: &AssignmentTracker,
        date: NaiveDate,
        line: &DemandLine,
        shift_hours: f64,
    ) -> Vec<RankedCandidate<'a>> {
        let ctx = CandidateContext {
            tracker,
            exceptions: inputs.exceptions,
            planned_off: inputs.planned_off,
            days_in_month: inputs.days_in_month,
        };

        let Some(holders) = inputs.role_holders.get(&line.role_id) else {
            return Vec::new();
        };

        holders
            .iter()
            .filter_map(|employee_id| {
                let employee = inputs.employees.get(employee_id)?;
                if self.filter.check(employee, date, shift_hours, &ctx).is_some() {
                    return None;
                }
                let link = inputs
                    .role_links
                    .get(&(employee_id.clone(), line.role_id.clone()))?;
                Some(RankedCandidate {
                    employee,
                    is_primary: link.is_primary,
                    priority_rank: link.priority_rank,
                })
            })
            .collect()
    }

    /// 对未配满的需求线,针对岗位的原始未过滤候选池定位首因
    ///
    /// 判定顺序:
    /// 1. 岗位无任何持岗员工
    /// 2. 全员不可用或当日已有班次
    /// 3. 工时/出勤配额限制
    fn diagnose_gap(
        &self,
        inputs: &AssignmentInputs,
        tracker: &AssignmentTracker,
        date: NaiveDate,
        line: &DemandLine,
    ) -> CoverageReason {
        let holders = inputs
            .role_holders
            .get(&line.role_id)
            .map(|h| h.as_slice())
            .unwrap_or(&[]);
        if holders.is_empty() {
            return CoverageReason::NoEmployeesWithRole;
        }

        let all_unavailable = holders.iter().all(|employee_id| {
            let has_exception = inputs
                .exceptions
                .get(employee_id)
                .map(|dates| dates.contains(&date))
                .unwrap_or(false);
            has_exception || tracker.has_assignment_on(employee_id, date)
        });
        if all_unavailable {
            return CoverageReason::EmployeesUnavailable;
        }

        CoverageReason::LimitsReached
    }
}

fn display_name(names: &HashMap<String, String>, id: &str) -> String {
    names.get(id).cloned().unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ContractType, DemandSource};
    use chrono::NaiveTime;

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

    fn line(date: NaiveDate, role: &str, count: i32, hours: u32) -> DemandLine {
        DemandLine {
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
        }
    }

    struct Fixture {
        days_in_month: u32,
        demand_index: BTreeMap<NaiveDate, Vec<DemandLine>>,
        employees: BTreeMap<String, Employee>,
        role_holders: BTreeMap<String, Vec<String>>,
        role_links: HashMap<(String, String), EmployeeRoleAssignment>,
        exceptions: HashMap<String, BTreeSet<NaiveDate>>,
        planned_off: HashMap<String, BTreeSet<NaiveDate>>,
        area_names: HashMap<String, String>,
        role_names: HashMap<String, String>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                days_in_month: 30,
                demand_index: BTreeMap::new(),
                employees: BTreeMap::new(),
                role_holders: BTreeMap::new(),
                role_links: HashMap::new(),
                exceptions: HashMap::new(),
                planned_off: HashMap::new(),
                area_names: HashMap::new(),
                role_names: HashMap::new(),
            }
        }

        fn with_employee(&mut self, emp: Employee, role: &str, is_primary: bool, rank: i32) {
            let id = emp.employee_id.clone();
            self.employees.insert(id.clone(), emp);
            self.role_holders
                .entry(role.to_string())
                .or_default()
                .push(id.clone());
            self.role_links.insert(
                (id.clone(), role.to_string()),
                EmployeeRoleAssignment {
                    employee_id: id,
                    role_id: role.to_string(),
                    is_primary,
                    priority_rank: rank,
                },
            );
        }

        fn inputs(&self) -> AssignmentInputs<'_> {
            AssignmentInputs {
                branch_id: "B1",
                days_in_month: self.days_in_month,
                demand_index: &self.demand_index,
                employees: &self.employees,
                role_holders: &self.role_holders,
                role_links: &self.role_links,
                exceptions: &self.exceptions,
                planned_off: &self.planned_off,
                area_names: &self.area_names,
                role_names: &self.role_names,
            }
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_single_slot_assigned_to_only_candidate() {
        let mut fx = Fixture::new();
        fx.with_employee(employee("E1", ContractType::PartTime, 0, 40.0), "R1", true, 1);
        fx.demand_index.insert(date(2), vec![line(date(2), "R1", 1, 5)]);

        let mut tracker = AssignmentTracker::new(date(1));
        let outcome = AssignmentEngine::new().generate(&fx.inputs(), &mut tracker);

        assert_eq!(outcome.assignments.len(), 1);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.total_not_covered, 0);
        let a = &outcome.assignments[0];
        assert_eq!(a.employee_id, "E1");
        assert_eq!(a.worked_hours, 5.0);
        assert_eq!(a.approval_state, ApprovalState::Pending);
        assert!(!a.deleted);
        assert!(tracker.has_assignment_on("E1", date(2)));
    }

    #[test]
    fn test_no_role_holders_yields_reason() {
        let mut fx = Fixture::new();
        fx.role_names.insert("R1".to_string(), "收银".to_string());
        fx.demand_index.insert(date(2), vec![line(date(2), "R1", 2, 5)]);

        let mut tracker = AssignmentTracker::new(date(1));
        let outcome = AssignmentEngine::new().generate(&fx.inputs(), &mut tracker);

        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.total_not_covered, 2);
        assert_eq!(outcome.warnings.len(), 1);
        match &outcome.warnings[0] {
            ScheduleWarning::Coverage {
                reason,
                required_count,
                assigned_count,
                work_role_name,
                weekday,
                ..
            } => {
                assert_eq!(*reason, CoverageReason::NoEmployeesWithRole);
                assert_eq!(*required_count, 2);
                assert_eq!(*assigned_count, 0);
                assert_eq!(work_role_name, "收银");
                assert_eq!(weekday, "Monday");
            }
            other => panic!("意外警告: {other:?}"),
        }
    }

    #[test]
    fn test_same_day_second_slot_picks_other_employee() {
        let mut fx = Fixture::new();
        fx.with_employee(employee("E1", ContractType::PartTime, 0, 40.0), "R1", true, 1);
        fx.with_employee(employee("E2", ContractType::PartTime, 0, 40.0), "R1", false, 2);
        fx.demand_index.insert(date(2), vec![line(date(2), "R1", 2, 5)]);

        let mut tracker = AssignmentTracker::new(date(1));
        let outcome = AssignmentEngine::new().generate(&fx.inputs(), &mut tracker);

        assert_eq!(outcome.assignments.len(), 2);
        let ids: BTreeSet<&str> = outcome
            .assignments
            .iter()
            .map(|a| a.employee_id.as_str())
            .collect();
        // 同日不重复分配: 两个名额必须两人
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_all_unavailable_reason() {
        let mut fx = Fixture::new();
        fx.with_employee(employee("E1", ContractType::PartTime, 0, 40.0), "R1", true, 1);
        fx.exceptions
            .entry("E1".to_string())
            .or_default()
            .insert(date(2));
        fx.demand_index.insert(date(2), vec![line(date(2), "R1", 1, 5)]);

        let mut tracker = AssignmentTracker::new(date(1));
        let outcome = AssignmentEngine::new().generate(&fx.inputs(), &mut tracker);

        assert!(outcome.assignments.is_empty());
        match &outcome.warnings[0] {
            ScheduleWarning::Coverage { reason, .. } => {
                assert_eq!(*reason, CoverageReason::EmployeesUnavailable);
            }
            other => panic!("意外警告: {other:?}"),
        }
    }

    #[test]
    fn test_weekly_cap_reason_is_limits_reached() {
        let mut fx = Fixture::new();
        // 周上限10小时,单班8小时: 第二天同周即超限
        fx.with_employee(employee("E1", ContractType::PartTime, 0, 10.0), "R1", true, 1);
        fx.demand_index.insert(date(2), vec![line(date(2), "R1", 1, 8)]);
        fx.demand_index.insert(date(3), vec![line(date(3), "R1", 1, 8)]);

        let mut tracker = AssignmentTracker::new(date(1));
        let outcome = AssignmentEngine::new().generate(&fx.inputs(), &mut tracker);

        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].date, date(2));
        assert_eq!(outcome.total_not_covered, 1);
        match &outcome.warnings[0] {
            ScheduleWarning::Coverage { date: d, reason, .. } => {
                assert_eq!(*d, date(3));
                assert_eq!(*reason, CoverageReason::LimitsReached);
            }
            other => panic!("意外警告: {other:?}"),
        }
    }

    #[test]
    fn test_deterministic_rerun() {
        let mut fx = Fixture::new();
        fx.with_employee(employee("E1", ContractType::PartTime, 0, 40.0), "R1", false, 2);
        fx.with_employee(employee("E2", ContractType::PartTime, 0, 40.0), "R1", true, 1);
        for d in 2..=6 {
            fx.demand_index.insert(date(d), vec![line(date(d), "R1", 1, 5)]);
        }

        let run = || {
            let mut tracker = AssignmentTracker::new(date(1));
            AssignmentEngine::new()
                .generate(&fx.inputs(), &mut tracker)
                .assignments
                .iter()
                .map(|a| (a.date, a.employee_id.clone()))
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }
}
