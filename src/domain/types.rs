// ==========================================
// 餐饮门店排班系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 合同类型 (Contract Type)
// ==========================================
// 红线: 仅全职员工参与休息日配额与计划休逻辑
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    FullTime,  // 全职
    PartTime,  // 兼职
    Temporary, // 临时工
    Seasonal,  // 季节工
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractType::FullTime => write!(f, "FULL_TIME"),
            ContractType::PartTime => write!(f, "PART_TIME"),
            ContractType::Temporary => write!(f, "TEMPORARY"),
            ContractType::Seasonal => write!(f, "SEASONAL"),
        }
    }
}

impl ContractType {
    /// 从字符串解析合同类型
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "FULL_TIME" => ContractType::FullTime,
            "PART_TIME" => ContractType::PartTime,
            "TEMPORARY" => ContractType::Temporary,
            "SEASONAL" => ContractType::Seasonal,
            _ => ContractType::PartTime, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ContractType::FullTime => "FULL_TIME",
            ContractType::PartTime => "PART_TIME",
            ContractType::Temporary => "TEMPORARY",
            ContractType::Seasonal => "SEASONAL",
        }
    }

    /// 是否为全职（休息日配额与计划休逻辑仅对全职生效）
    pub fn is_full_time(&self) -> bool {
        matches!(self, ContractType::FullTime)
    }
}

// ==========================================
// 审批状态 (Approval State)
// ==========================================
// 引擎生成的班次统一为 PENDING
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalState {
    Pending,  // 待审批
    Approved, // 已审批
    Rejected, // 已驳回
}

impl fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalState::Pending => write!(f, "PENDING"),
            ApprovalState::Approved => write!(f, "APPROVED"),
            ApprovalState::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl ApprovalState {
    /// 从字符串解析审批状态
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "PENDING" => ApprovalState::Pending,
            "APPROVED" => ApprovalState::Approved,
            "REJECTED" => ApprovalState::Rejected,
            _ => ApprovalState::Pending, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ApprovalState::Pending => "PENDING",
            ApprovalState::Approved => "APPROVED",
            ApprovalState::Rejected => "REJECTED",
        }
    }
}

// ==========================================
// 需求来源 (Demand Source)
// ==========================================
// 特殊日期模板整体替换当日周模板,不做合并
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandSource {
    WeeklyTemplate, // 周循环模板
    SpecialDate,    // 特殊日期模板
}

impl fmt::Display for DemandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandSource::WeeklyTemplate => write!(f, "WEEKLY_TEMPLATE"),
            DemandSource::SpecialDate => write!(f, "SPECIAL_DATE"),
        }
    }
}

// ==========================================
// 覆盖缺口原因 (Coverage Reason)
// ==========================================
// 按顺序对未过滤候选池判定,取第一个成立的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageReason {
    NoEmployeesWithRole,  // 该岗位没有任何员工
    EmployeesUnavailable, // 员工不可用或已被排班
    LimitsReached,        // 工时/休息日限制
}

impl fmt::Display for CoverageReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageReason::NoEmployeesWithRole => write!(f, "NO_EMPLOYEES_WITH_ROLE"),
            CoverageReason::EmployeesUnavailable => write!(f, "EMPLOYEES_UNAVAILABLE"),
            CoverageReason::LimitsReached => write!(f, "LIMITS_REACHED"),
        }
    }
}

impl CoverageReason {
    /// 本地化描述（供 API 响应与 CLI 输出）
    pub fn description(&self) -> String {
        match self {
            CoverageReason::NoEmployeesWithRole => {
                crate::i18n::t("schedule.reason.no_employees_with_role")
            }
            CoverageReason::EmployeesUnavailable => {
                crate::i18n::t("schedule.reason.employees_unavailable")
            }
            CoverageReason::LimitsReached => crate::i18n::t("schedule.reason.limits_reached"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_type_roundtrip() {
        assert_eq!(ContractType::from_str("FULL_TIME"), ContractType::FullTime);
        assert_eq!(ContractType::FullTime.to_db_str(), "FULL_TIME");
        assert!(ContractType::FullTime.is_full_time());
        assert!(!ContractType::PartTime.is_full_time());
    }

    #[test]
    fn test_approval_state_default() {
        // 未知字符串回退为 PENDING
        assert_eq!(ApprovalState::from_str("???"), ApprovalState::Pending);
    }

    #[test]
    fn test_coverage_reason_display() {
        assert_eq!(
            CoverageReason::NoEmployeesWithRole.to_string(),
            "NO_EMPLOYEES_WITH_ROLE"
        );
    }
}
