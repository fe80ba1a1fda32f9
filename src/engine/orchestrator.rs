// ==========================================
// 餐饮门店排班系统 - 引擎编排器
// ==========================================
// 用途: 协调需求解析、休息日规划、容量预检、贪心分配
// 与后审的执行顺序,一次请求产出一份完整月度排班
// ==========================================

use crate::config::ScheduleConfigReader;
use crate::domain::assignment::ShiftAssignment;
use crate::domain::employee::{Employee, EmployeeRoleAssignment};
use crate::domain::role::{WorkArea, WorkRole};
use crate::domain::schedule::ScheduleWarning;
use crate::engine::assignment::{AssignmentEngine, AssignmentInputs};
use crate::engine::capacity_audit::CapacityAuditor;
use crate::engine::demand::{DemandResolver, GenerationWindow};
use crate::engine::error::ScheduleError;
use crate::engine::off_day::OffDayPlanner;
use crate::engine::post_audit::PostAuditor;
use crate::engine::repositories::ScheduleRepositories;
use crate::engine::tracker::AssignmentTracker;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// ScheduleResult - 排班结果
// ==========================================

#[derive(Debug, Clone)]
pub struct ScheduleResult {
    /// 生成窗口
    pub window: GenerationWindow,
    /// 新生成的班次（已持久化）
    pub assignments: Vec<ShiftAssignment>,
    /// 全部警告: 容量预检 + 覆盖缺口 + 后审,按产生顺序
    pub warnings: Vec<ScheduleWarning>,
    /// 新生成班次总数
    pub total_shifts_generated: i32,
    /// 未覆盖名额总数（仅覆盖缺口口径）
    pub total_shifts_not_covered: i32,

    // ===== 展示用目录快照（API 层组装 DTO 使用）=====
    pub employee_names: HashMap<String, String>,
    pub area_catalog: HashMap<String, WorkArea>,
    pub role_catalog: HashMap<String, WorkRole>,
}

// ==========================================
// ScheduleOrchestrator - 引擎编排器
// ==========================================

pub struct ScheduleOrchestrator<C>
where
    C: ScheduleConfigReader,
{
    repos: ScheduleRepositories,
    config: Arc<C>,
    resolver: DemandResolver,
    planner: OffDayPlanner,
    auditor: CapacityAuditor,
    engine: AssignmentEngine,
    post_auditor: PostAuditor,
}

impl<C> ScheduleOrchestrator<C>
where
    C: ScheduleConfigReader,
{
    /// 创建新的编排器实例
    pub fn new(repos: ScheduleRepositories, config: Arc<C>) -> Self {
        Self {
            repos,
            config,
            resolver: DemandResolver::new(),
            planner: OffDayPlanner::new(),
            auditor: CapacityAuditor::new(),
            engine: AssignmentEngine::new(),
            post_auditor: PostAuditor::new(),
        }
    }

    /// 执行完整月度排班生成流程
    ///
    /// 请求级粒度: 致命错误在任何写入前返回,写入为单事务全量提交。
    /// 本编排器不对同一 (门店, 月份) 的并发请求做互斥,丢失更新的
    /// 防护由调用方负责（如请求层按门店加锁）
    ///
    /// # 参数
    /// - branch_id: 门店ID
    /// - year / month: 目标年月
    /// - today: 当前日期（调用方注入,保证可测）
    ///
    /// # 返回
    /// 排班结果（班次 + 警告）
    #[instrument(skip(self))]
    pub async fn generate_monthly_schedule(
        &self,
        branch_id: &str,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<ScheduleResult, ScheduleError> {
        info!(branch_id, year, month, today = %today, "开始执行月度排班生成");

        // ==========================================
        // 步骤1: 生成窗口与致命前置校验
        // ==========================================
        debug!("步骤1: 计算生成窗口");
        let window = self.resolver.resolve_window(year, month, today)?;

        let templates = self.repos.template_repo.list_by_branch(branch_id)?;
        if templates.is_empty() {
            return Err(ScheduleError::NoTemplates {
                branch_id: branch_id.to_string(),
            });
        }

        let employees = self.repos.employee_repo.list_active_by_branch(branch_id)?;
        let role_links = self
            .repos
            .employee_repo
            .list_role_assignments_by_branch(branch_id)?;
        let employee_ids: BTreeSet<&str> =
            employees.iter().map(|e| e.employee_id.as_str()).collect();
        let employees_with_roles: BTreeSet<String> = role_links
            .iter()
            .filter(|link| employee_ids.contains(link.employee_id.as_str()))
            .map(|link| link.employee_id.clone())
            .collect();
        if employees_with_roles.is_empty() {
            return Err(ScheduleError::NoEligibleEmployees {
                branch_id: branch_id.to_string(),
            });
        }

        // ==========================================
        // 步骤2: 加载参考数据并构建内存索引
        // ==========================================
        debug!("步骤2: 加载参考数据");
        let special_dates = self
            .repos
            .special_date_repo
            .list_by_branch_range(branch_id, window.start, window.end)?;
        let special_templates = self
            .repos
            .special_date_repo
            .list_templates_by_branch_range(branch_id, window.start, window.end)?;
        let exceptions_rows = self.repos.employee_repo.list_availability_exceptions(
            branch_id,
            window.start,
            window.end,
        )?;
        let areas = self.repos.area_repo.list_all()?;
        let roles = self.repos.role_repo.list_all()?;

        // 遗留配置仅记录,不参与计算
        match self.config.get_hours_per_day(branch_id).await {
            Ok(Some(hours)) => debug!(hours_per_day = hours, "门店参考每日工时（仅记录）"),
            Ok(None) => debug!("门店未配置参考每日工时"),
            Err(e) => warn!(error = %e, "读取门店配置失败,继续生成"),
        }

        let employee_map: BTreeMap<String, Employee> = employees
            .iter()
            .map(|e| (e.employee_id.clone(), e.clone()))
            .collect();
        let mut role_holders: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut role_link_index: HashMap<(String, String), EmployeeRoleAssignment> =
            HashMap::new();
        for link in &role_links {
            if !employee_map.contains_key(&link.employee_id) {
                continue;
            }
            let holders = role_holders.entry(link.role_id.clone()).or_default();
            if !holders.contains(&link.employee_id) {
                holders.push(link.employee_id.clone());
            }
            role_link_index.insert((link.employee_id.clone(), link.role_id.clone()), link.clone());
        }
        for holders in role_holders.values_mut() {
            holders.sort();
        }

        let mut exceptions: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
        for row in &exceptions_rows {
            exceptions
                .entry(row.employee_id.clone())
                .or_default()
                .insert(row.date);
        }

        let area_names: HashMap<String, String> = areas
            .iter()
            .map(|a| (a.area_id.clone(), a.name.clone()))
            .collect();
        let role_names: HashMap<String, String> = roles
            .iter()
            .map(|r| (r.role_id.clone(), r.name.clone()))
            .collect();

        // ==========================================
        // 步骤3: 需求解析
        // ==========================================
        debug!("步骤3: 构建逐日需求索引");
        let demand_index = self.resolver.build_demand_index(
            &window,
            &templates,
            &special_dates,
            &special_templates,
        );

        // ==========================================
        // 步骤4: 历史班次预热跟踪器
        // ==========================================
        // 当月窗口前的班次不重排,但计入配额与周工时
        debug!("步骤4: 加载当月已有班次");
        let month_end = window.end;
        let existing = self.repos.assignment_repo.list_active_by_branch_range(
            branch_id,
            window.month_start,
            month_end,
        )?;
        let past: Vec<ShiftAssignment> = existing
            .into_iter()
            .filter(|a| a.date < window.start)
            .collect();
        let mut tracker = AssignmentTracker::new(window.month_start);
        tracker.seed_from_existing(&past);
        debug!(past_assignments = past.len(), "窗口前历史班次已计入");

        // ==========================================
        // 步骤5: 休息日规划（全职,建议性）
        // ==========================================
        debug!("步骤5: 规划计划休息日");
        let planned_off = self
            .planner
            .plan(&window, &employees, &role_links, &demand_index);

        // ==========================================
        // 步骤6: 容量预检（建议性,不阻断）
        // ==========================================
        debug!("步骤6: 执行容量预检");
        let mut warnings = self.auditor.audit(
            &window,
            &demand_index,
            &employee_map,
            &role_holders,
            &exceptions,
            &tracker,
            &role_names,
        );

        // ==========================================
        // 步骤7: 贪心分配
        // ==========================================
        debug!("步骤7: 执行班次分配");
        let inputs = AssignmentInputs {
            branch_id,
            days_in_month: window.days_in_month,
            demand_index: &demand_index,
            employees: &employee_map,
            role_holders: &role_holders,
            role_links: &role_link_index,
            exceptions: &exceptions,
            planned_off: &planned_off,
            area_names: &area_names,
            role_names: &role_names,
        };
        let outcome = self.engine.generate(&inputs, &mut tracker);
        warnings.extend(outcome.warnings);

        // ==========================================
        // 步骤8: 单事务持久化（软删窗口旧班次 + 批量写入）
        // ==========================================
        debug!(
            new_assignments = outcome.assignments.len(),
            "步骤8: 持久化生成结果"
        );
        self.repos.assignment_repo.replace_window(
            branch_id,
            window.start,
            window.end,
            &outcome.assignments,
        )?;

        // ==========================================
        // 步骤9: 后审（仅警告,不回滚）
        // ==========================================
        debug!("步骤9: 执行排班后审");
        let post_warnings = self.post_auditor.audit(
            &employee_map,
            &employees_with_roles,
            &planned_off,
            &tracker,
            window.days_in_month,
        );
        warnings.extend(post_warnings);

        let total_shifts_generated = outcome.assignments.len() as i32;
        info!(
            total_shifts_generated,
            total_shifts_not_covered = outcome.total_not_covered,
            warnings = warnings.len(),
            "月度排班生成完成"
        );

        Ok(ScheduleResult {
            window,
            assignments: outcome.assignments,
            warnings,
            total_shifts_generated,
            total_shifts_not_covered: outcome.total_not_covered,
            employee_names: employees
                .iter()
                .map(|e| (e.employee_id.clone(), e.name.clone()))
                .collect(),
            area_catalog: areas.into_iter().map(|a| (a.area_id.clone(), a)).collect(),
            role_catalog: roles.into_iter().map(|r| (r.role_id.clone(), r)).collect(),
        })
    }
}
