// ==========================================
// 餐饮门店排班系统 - 配置模块
// ==========================================

pub mod schedule_config_trait;

pub use schedule_config_trait::ScheduleConfigReader;
