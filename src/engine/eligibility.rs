// ==========================================
// 餐饮门店排班系统 - 可行性过滤引擎
// ==========================================
// 判定 (员工, 岗位, 日期) 三元组是否可分配,并对可行候选
// 做确定性全序排序。检查带原因返回,供覆盖缺口诊断使用
// ==========================================

use crate::domain::employee::Employee;
use crate::engine::tracker::AssignmentTracker;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// 工时比较浮点容差
const HOURS_EPSILON: f64 = 1e-9;

// ==========================================
// IneligibleReason - 不可分配原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    Unavailable,          // 当日存在不可用例外
    AlreadyAssigned,      // 当日已有班次（本轮或历史保留）
    FreeDayQuotaReached,  // 全职应出勤天数已满
    PlannedOffDay,        // 当日为计划休息日（仅全职）
    WeeklyHoursExceeded,  // 周工时上限不足以容纳本班次
}

// ==========================================
// CandidateContext - 候选评估上下文
// ==========================================
// 一次生成运行内的只读约束快照
pub struct CandidateContext<'a> {
    pub tracker: &'a AssignmentTracker,
    pub exceptions: &'a HashMap<String, BTreeSet<NaiveDate>>,  // 员工 -> 不可用日期
    pub planned_off: &'a HashMap<String, BTreeSet<NaiveDate>>, // 员工 -> 计划休息日
    pub days_in_month: u32,
}

impl CandidateContext<'_> {
    fn has_exception(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.exceptions
            .get(employee_id)
            .map(|dates| dates.contains(&date))
            .unwrap_or(false)
    }

    fn is_planned_off(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.planned_off
            .get(employee_id)
            .map(|dates| dates.contains(&date))
            .unwrap_or(false)
    }
}

// ==========================================
// RankedCandidate - 参与排序的候选
// ==========================================
// 岗位关联属性（主岗/优先级）随候选携带,排序时使用
#[derive(Debug, Clone)]
pub struct RankedCandidate<'a> {
    pub employee: &'a Employee,
    pub is_primary: bool,
    pub priority_rank: i32,
}

// ==========================================
// EligibilityFilter - 可行性过滤引擎
// ==========================================

pub struct EligibilityFilter;

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl EligibilityFilter {
    pub fn new() -> Self {
        Self
    }

    /// 检查候选是否可分配
    ///
    /// 检查顺序（首个命中即返回）:
    /// 1. 不可用例外
    /// 2. 当日已有班次
    /// 3. 全职应出勤天数已满
    /// 4. 计划休息日（仅全职,软约束的事前引导）
    /// 5. 周工时上限
    ///
    /// # 返回
    /// - None: 可分配
    /// - Some(reason): 不可分配及原因
    pub fn check(
        &self,
        employee: &Employee,
        date: NaiveDate,
        shift_hours: f64,
        ctx: &CandidateContext,
    ) -> Option<IneligibleReason> {
        if ctx.has_exception(&employee.employee_id, date) {
            return Some(IneligibleReason::Unavailable);
        }
        if ctx.tracker.has_assignment_on(&employee.employee_id, date) {
            return Some(IneligibleReason::AlreadyAssigned);
        }
        if employee.contract_type.is_full_time() {
            let required = employee.required_working_days(ctx.days_in_month);
            if ctx.tracker.assigned_days(&employee.employee_id) >= required {
                return Some(IneligibleReason::FreeDayQuotaReached);
            }
            if ctx.is_planned_off(&employee.employee_id, date) {
                return Some(IneligibleReason::PlannedOffDay);
            }
        }
        let week_hours = ctx.tracker.week_hours(&employee.employee_id, date);
        if week_hours + shift_hours > employee.weekly_max_hours + HOURS_EPSILON {
            return Some(IneligibleReason::WeeklyHoursExceeded);
        }
        None
    }

    /// 员工尚欠的出勤天数
    ///
    /// 全职: max(0, 应出勤天数 - 已分配天数)
    /// 非全职: max(0, 当月天数 - 已分配天数)
    fn remaining_owed_days(
        &self,
        employee: &Employee,
        tracker: &AssignmentTracker,
        days_in_month: u32,
    ) -> i64 {
        let assigned = tracker.assigned_days(&employee.employee_id);
        let target = if employee.contract_type.is_full_time() {
            employee.required_working_days(days_in_month)
        } else {
            days_in_month as i64
        };
        (target - assigned).max(0)
    }

    /// 对可行候选做确定性排序
    ///
    /// 五级排序键（依次比较）:
    /// 1. 尚欠出勤天数 降序
    /// 2. 主岗标志 降序
    /// 3. 岗位优先级 升序（1 = 最高）
    /// 4. 月累计工时 升序
    /// 5. 月累计天数 升序
    ///
    /// 入参按 employee_id 升序传入,稳定排序保证全序确定
    pub fn rank<'a>(
        &self,
        mut candidates: Vec<RankedCandidate<'a>>,
        tracker: &AssignmentTracker,
        days_in_month: u32,
    ) -> Vec<RankedCandidate<'a>> {
        candidates.sort_by(|a, b| {
            let owed_a = self.remaining_owed_days(a.employee, tracker, days_in_month);
            let owed_b = self.remaining_owed_days(b.employee, tracker, days_in_month);
            owed_b
                .cmp(&owed_a)
                .then_with(|| b.is_primary.cmp(&a.is_primary))
                .then_with(|| a.priority_rank.cmp(&b.priority_rank))
                .then_with(|| {
                    let hours_a = tracker.total_hours(&a.employee.employee_id);
                    let hours_b = tracker.total_hours(&b.employee.employee_id);
                    hours_a.partial_cmp(&hours_b).unwrap_or(Ordering::Equal)
                })
                .then_with(|| {
                    tracker
                        .assigned_days(&a.employee.employee_id)
                        .cmp(&tracker.assigned_days(&b.employee.employee_id))
                })
        });
        candidates
    }
}
