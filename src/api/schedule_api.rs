// ==========================================
// 餐饮门店排班系统 - 排班生成 API
// ==========================================
// 职责: 对外暴露月度排班生成接口,组装展示用 DTO
// ==========================================

use crate::api::error::ApiResult;
use crate::config::ScheduleConfigReader;
use crate::domain::assignment::ShiftAssignment;
use crate::domain::schedule::ScheduleWarning;
use crate::engine::{ScheduleOrchestrator, ScheduleResult};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;

// ==========================================
// 请求 / 响应 DTO
// ==========================================

/// 月度排班生成请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleRequest {
    pub branch_id: String,
    pub year: i32,
    pub month: u32,
}

/// 班次展示 DTO（目录名称与颜色已展开）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<i64>, // 分钟,无休息为 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lunch_duration: Option<i64>, // 分钟,无用餐为 None
    pub work_area_id: String,
    pub work_area_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_area_color: Option<String>,
    pub work_role_id: String,
    pub work_role_name: String,
    pub worked_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub approval_state: crate::domain::types::ApprovalState,
}

/// 月度排班生成响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleResponse {
    pub assignments: Vec<AssignmentDto>,
    pub warnings: Vec<ScheduleWarning>,
    pub total_shifts_generated: i32,
    pub total_shifts_not_covered: i32,
}

// ==========================================
// ScheduleApi - 排班生成 API
// ==========================================

pub struct ScheduleApi<C>
where
    C: ScheduleConfigReader,
{
    orchestrator: ScheduleOrchestrator<C>,
}

impl<C> ScheduleApi<C>
where
    C: ScheduleConfigReader,
{
    /// 创建新的 ScheduleApi 实例
    pub fn new(orchestrator: ScheduleOrchestrator<C>) -> Self {
        Self { orchestrator }
    }

    /// 生成月度排班（以本地当前日期为"今天"）
    pub async fn generate_schedule(
        &self,
        request: GenerateScheduleRequest,
    ) -> ApiResult<GenerateScheduleResponse> {
        self.generate_schedule_at(request, Local::now().date_naive())
            .await
    }

    /// 生成月度排班（注入"今天",供测试与回放使用）
    pub async fn generate_schedule_at(
        &self,
        request: GenerateScheduleRequest,
        today: NaiveDate,
    ) -> ApiResult<GenerateScheduleResponse> {
        info!(
            branch_id = %request.branch_id,
            year = request.year,
            month = request.month,
            "收到排班生成请求"
        );

        let result = self
            .orchestrator
            .generate_monthly_schedule(&request.branch_id, request.year, request.month, today)
            .await?;

        Ok(Self::build_response(result))
    }

    fn build_response(result: ScheduleResult) -> GenerateScheduleResponse {
        let assignments = result
            .assignments
            .iter()
            .map(|a| Self::build_dto(a, &result))
            .collect();

        GenerateScheduleResponse {
            assignments,
            warnings: result.warnings,
            total_shifts_generated: result.total_shifts_generated,
            total_shifts_not_covered: result.total_shifts_not_covered,
        }
    }

    fn build_dto(a: &ShiftAssignment, result: &ScheduleResult) -> AssignmentDto {
        let area = result.area_catalog.get(&a.area_id);
        let role = result.role_catalog.get(&a.role_id);
        AssignmentDto {
            employee_id: a.employee_id.clone(),
            employee_name: result
                .employee_names
                .get(&a.employee_id)
                .cloned()
                .unwrap_or_else(|| a.employee_id.clone()),
            date: a.date,
            start_time: a.start_time,
            end_time: a.end_time,
            break_duration: (a.break_minutes > 0).then_some(a.break_minutes),
            lunch_duration: (a.lunch_minutes > 0).then_some(a.lunch_minutes),
            work_area_id: a.area_id.clone(),
            work_area_name: area
                .map(|x| x.name.clone())
                .unwrap_or_else(|| a.area_id.clone()),
            work_area_color: area.and_then(|x| x.color.clone()),
            work_role_id: a.role_id.clone(),
            work_role_name: role
                .map(|x| x.name.clone())
                .unwrap_or_else(|| a.role_id.clone()),
            worked_hours: a.worked_hours,
            notes: a.notes.clone(),
            approval_state: a.approval_state,
        }
    }
}
