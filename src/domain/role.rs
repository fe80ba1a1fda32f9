// ==========================================
// 餐饮门店排班系统 - 岗位领域模型
// ==========================================
// 岗位目录按工作区域分组,由外部协作方维护,本引擎只读
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// WorkArea - 工作区域
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkArea {
    pub area_id: String,       // 区域ID
    pub name: String,          // 区域名称（前厅/后厨/吧台等）
    pub color: Option<String>, // 前端展示颜色（UI 提示,引擎不消费）
}

// ==========================================
// WorkRole - 工作岗位
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkRole {
    pub role_id: String, // 岗位ID
    pub area_id: String, // 所属区域
    pub name: String,    // 岗位名称（收银/服务员/厨师等）
}
