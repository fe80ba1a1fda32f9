// ==========================================
// 餐饮门店排班系统 - 引擎层错误类型
// ==========================================
// 错误分级（与警告严格区分）:
// - ScheduleError: 致命校验错误,在任何写入前中止
// - ScheduleWarning: 建议性诊断,随结果一并返回,从不回滚
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 排班生成致命错误
///
/// 粒度为整个请求: 要么在触库前失败,要么全量提交
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("无效的年月: year={year}, month={month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("门店没有任何排班模板: branch_id={branch_id}")]
    NoTemplates { branch_id: String },

    #[error("门店没有任何持有岗位的在职员工: branch_id={branch_id}")]
    NoEligibleEmployees { branch_id: String },

    #[error("目标月份已无可生成日期: year={year}, month={month}")]
    NoFutureDays { year: i32, month: u32 },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
