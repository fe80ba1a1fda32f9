// ==========================================
// 餐饮门店排班系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 CLI 与上层服务调用
// ==========================================

pub mod error;
pub mod schedule_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use schedule_api::{
    AssignmentDto, GenerateScheduleRequest, GenerateScheduleResponse, ScheduleApi,
};
