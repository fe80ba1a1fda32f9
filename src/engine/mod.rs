// ==========================================
// 餐饮门店排班系统 - 引擎层
// ==========================================
// 核心引擎:
// - DemandResolver: 生成窗口与逐日需求索引
// - OffDayPlanner: 全职计划休息日（建议性）
// - EligibilityFilter: 候选可行性与确定性排序
// - CapacityAuditor: 容量预检（建议性）
// - AssignmentEngine: 贪心班次分配
// - PostAuditor: 排班后审
// - ScheduleOrchestrator: 流程编排
// ==========================================

pub mod assignment;
pub mod capacity_audit;
pub mod demand;
pub mod eligibility;
pub mod error;
pub mod off_day;
pub mod orchestrator;
pub mod post_audit;
pub mod repositories;
pub mod tracker;

pub use assignment::{AssignmentEngine, AssignmentInputs, AssignmentOutcome};
pub use capacity_audit::CapacityAuditor;
pub use demand::{days_in_month, DemandResolver, GenerationWindow};
pub use eligibility::{CandidateContext, EligibilityFilter, IneligibleReason, RankedCandidate};
pub use error::ScheduleError;
pub use off_day::OffDayPlanner;
pub use orchestrator::{ScheduleOrchestrator, ScheduleResult};
pub use post_audit::PostAuditor;
pub use repositories::ScheduleRepositories;
pub use tracker::AssignmentTracker;
