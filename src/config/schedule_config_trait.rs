// ==========================================
// 餐饮门店排班系统 - 排班配置读取 Trait
// ==========================================
// 职责: 定义编排器所需的门店配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::repository::ScheduleConfigRepository;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ScheduleConfigReader Trait
// ==========================================
// 实现者: ScheduleConfigRepository（从 schedule_config 表读取）
#[async_trait]
pub trait ScheduleConfigReader: Send + Sync {
    /// 获取门店参考每日工时
    ///
    /// 遗留配置: 仅用于运行日志展示,算法不消费
    ///
    /// # 返回
    /// - Ok(Some(f64)): 门店已配置
    /// - Ok(None): 门店未配置
    async fn get_hours_per_day(&self, branch_id: &str) -> Result<Option<f64>, Box<dyn Error>>;

    /// 获取门店日历颜色提示（UI 专用）
    async fn get_calendar_color(&self, branch_id: &str) -> Result<Option<String>, Box<dyn Error>>;
}

#[async_trait]
impl ScheduleConfigReader for ScheduleConfigRepository {
    async fn get_hours_per_day(&self, branch_id: &str) -> Result<Option<f64>, Box<dyn Error>> {
        let config = self.find_by_branch(branch_id)?;
        Ok(config.map(|c| c.hours_per_day))
    }

    async fn get_calendar_color(&self, branch_id: &str) -> Result<Option<String>, Box<dyn Error>> {
        let config = self.find_by_branch(branch_id)?;
        Ok(config.and_then(|c| c.calendar_color))
    }
}
