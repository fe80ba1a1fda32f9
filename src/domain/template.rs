// ==========================================
// 餐饮门店排班系统 - 排班需求模板领域模型
// ==========================================
// 周循环模板 + 特殊日期模板
// 红线: 带模板的特殊日期整体替换当日周模板,不做合并
// ==========================================

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

// ==========================================
// ShiftTemplate - 周循环需求模板
// ==========================================
// 一条记录 = 某区域某岗位在某星期几的一条需求线
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub template_id: String, // 模板ID
    pub branch_id: String,   // 所属门店

    // ===== 需求定义 =====
    pub area_id: String,        // 工作区域
    pub role_id: String,        // 岗位
    pub weekday: u8,            // ISO 星期（1=周一 .. 7=周日）
    pub start_time: NaiveTime,  // 班次开始
    pub end_time: NaiveTime,    // 班次结束
    pub break_minutes: i64,     // 休息时长（分钟,0 表示无）
    pub lunch_minutes: i64,     // 用餐时长（分钟,0 表示无）
    pub required_count: i32,    // 需求人数
    pub notes: Option<String>,  // 备注
}

impl ShiftTemplate {
    /// 判断模板是否匹配指定星期
    pub fn matches_weekday(&self, weekday: Weekday) -> bool {
        self.weekday == weekday.number_from_monday() as u8
    }
}

// ==========================================
// SpecialDate - 特殊日期
// ==========================================
// 节假日/店庆等,其模板集合整体替换当日周模板
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialDate {
    pub special_date_id: String, // 特殊日期ID
    pub branch_id: String,       // 所属门店
    pub date: NaiveDate,         // 日期
    pub name: Option<String>,    // 名称（如 "情人节"）
}

// ==========================================
// SpecialDateTemplate - 特殊日期需求模板
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialDateTemplate {
    pub id: String,              // 模板ID
    pub special_date_id: String, // 所属特殊日期

    // ===== 需求定义（与周模板同构,但不含 weekday）=====
    pub area_id: String,       // 工作区域
    pub role_id: String,       // 岗位
    pub start_time: NaiveTime, // 班次开始
    pub end_time: NaiveTime,   // 班次结束
    pub break_minutes: i64,    // 休息时长（分钟）
    pub lunch_minutes: i64,    // 用餐时长（分钟）
    pub required_count: i32,   // 需求人数
    pub notes: Option<String>, // 备注
}
