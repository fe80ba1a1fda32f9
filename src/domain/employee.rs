// ==========================================
// 餐饮门店排班系统 - 员工领域模型
// ==========================================
// 员工主数据由外部协作方（人事 CRUD）维护,本引擎只读
// ==========================================

use crate::domain::types::ContractType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Employee - 员工
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    // ===== 主键 =====
    pub employee_id: String, // 员工ID
    pub branch_id: String,   // 所属门店

    // ===== 基础信息 =====
    pub name: String,                // 姓名
    pub contract_type: ContractType, // 合同类型

    // ===== 工时约束 =====
    pub weekly_min_hours: f64, // 周最小工时（两位小数）
    pub weekly_max_hours: f64, // 周最大工时（两位小数）

    // ===== 休息日配额 =====
    pub free_days_per_month: i32, // 每月休息日配额（仅全职参与精确配额）

    // ===== 状态 =====
    pub active: bool, // 在职标志

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// 全职员工的月度应出勤天数 = 当月天数 - 休息日配额
    ///
    /// # 参数
    /// - days_in_month: 当月天数
    ///
    /// # 返回
    /// 应出勤天数（不为负）
    pub fn required_working_days(&self, days_in_month: u32) -> i64 {
        (days_in_month as i64 - self.free_days_per_month as i64).max(0)
    }
}

// ==========================================
// EmployeeRoleAssignment - 员工岗位关联
// ==========================================
// 多对多关联,每名员工至多3个岗位（由上游维护,本核心不校验）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRoleAssignment {
    pub employee_id: String, // 员工ID
    pub role_id: String,     // 岗位ID
    pub is_primary: bool,    // 主岗标志
    pub priority_rank: i32,  // 优先级（1 = 最高）
}

// ==========================================
// AvailabilityException - 不可用日期
// ==========================================
// (员工, 日期) 上的分类性不可用,原因可选
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityException {
    pub employee_id: String,    // 员工ID
    pub date: NaiveDate,        // 不可用日期
    pub reason: Option<String>, // 原因（请假/病假等,仅记录）
}
