// ==========================================
// 餐饮门店排班系统 - 需求解析引擎
// ==========================================
// 职责:
// 1. 计算生成窗口（当月: 明天起; 非当月: 整月）
// 2. 合并周循环模板与特殊日期模板为逐日需求索引
// 红线: 带模板的特殊日期当天整体替换周模板,不做合并
// ==========================================

use crate::domain::schedule::DemandLine;
use crate::domain::template::{ShiftTemplate, SpecialDate, SpecialDateTemplate};
use crate::domain::types::DemandSource;
use crate::engine::error::ScheduleError;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// 计算某年某月的天数
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };
    (next_first - first).num_days() as u32
}

// ==========================================
// GenerationWindow - 生成窗口
// ==========================================
// 窗口终点恒为月末; 起点在目标月为当前月时被钳制到明天
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationWindow {
    pub month_start: NaiveDate, // 目标月1号（周索引锚点）
    pub start: NaiveDate,       // 窗口起点（含）
    pub end: NaiveDate,         // 窗口终点（含,= 月末）
    pub days_in_month: u32,     // 目标月天数
}

impl GenerationWindow {
    /// 窗口内全部日期（升序）
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut d = self.start;
        while d <= self.end {
            dates.push(d);
            d += Duration::days(1);
        }
        dates
    }

    /// 窗口天数
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// 判断日期是否落在窗口内
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

// ==========================================
// DemandResolver - 需求解析引擎
// ==========================================

pub struct DemandResolver;

impl Default for DemandResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DemandResolver {
    pub fn new() -> Self {
        Self
    }

    /// 计算生成窗口
    ///
    /// 规则:
    /// - 目标月为当前月: 起点 = max(月初, 今天+1),已过日期不重排
    /// - 目标月非当前月（过去或未来）: 起点 = 月初
    /// - 终点恒为月末
    ///
    /// # 参数
    /// - year / month: 目标年月
    /// - today: 当前日期（由调用方注入,保证可测）
    ///
    /// # 返回
    /// - Err(InvalidMonth): 年月非法
    /// - Err(NoFutureDays): 当前月已无未来日期可生成
    pub fn resolve_window(
        &self,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<GenerationWindow, ScheduleError> {
        if !(1..=12).contains(&month) || !(2000..=2100).contains(&year) {
            return Err(ScheduleError::InvalidMonth { year, month });
        }

        let month_start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(ScheduleError::InvalidMonth { year, month })?;
        let dim = days_in_month(year, month);
        let month_end = NaiveDate::from_ymd_opt(year, month, dim)
            .ok_or(ScheduleError::InvalidMonth { year, month })?;

        let start = if today.year() == year && today.month() == month {
            // 当前月: 从明天开始,已过日期保持不动
            (today + Duration::days(1)).max(month_start)
        } else {
            month_start
        };

        if start > month_end {
            return Err(ScheduleError::NoFutureDays { year, month });
        }

        debug!(
            year,
            month,
            start = %start,
            end = %month_end,
            "生成窗口已确定"
        );

        Ok(GenerationWindow {
            month_start,
            start,
            end: month_end,
            days_in_month: dim,
        })
    }

    /// 构建逐日需求索引
    ///
    /// 对窗口内每一天:
    /// - 当天存在带模板的特殊日期: 需求 = 该特殊日期的模板集合
    ///   （整体替换周模板,不合并）
    /// - 否则: 需求 = 匹配当天星期的周循环模板
    ///   （无模板的特殊日期不生效,周模板照常）
    ///
    /// # 返回
    /// - BTreeMap 保证日期升序; 每日需求线按
    ///   (start_time, area_id, role_id, source_id) 升序
    pub fn build_demand_index(
        &self,
        window: &GenerationWindow,
        templates: &[ShiftTemplate],
        special_dates: &[SpecialDate],
        special_templates: &[SpecialDateTemplate],
    ) -> BTreeMap<NaiveDate, Vec<DemandLine>> {
        // 特殊日期ID -> 日期
        let special_by_id: HashMap<&str, NaiveDate> = special_dates
            .iter()
            .map(|sd| (sd.special_date_id.as_str(), sd.date))
            .collect();

        // 日期 -> 特殊日期模板需求线
        let mut special_lines: HashMap<NaiveDate, Vec<DemandLine>> = HashMap::new();
        for st in special_templates {
            let Some(&date) = special_by_id.get(st.special_date_id.as_str()) else {
                continue;
            };
            special_lines.entry(date).or_default().push(DemandLine {
                date,
                area_id: st.area_id.clone(),
                role_id: st.role_id.clone(),
                start_time: st.start_time,
                end_time: st.end_time,
                break_minutes: st.break_minutes,
                lunch_minutes: st.lunch_minutes,
                required_count: st.required_count,
                notes: st.notes.clone(),
                source: DemandSource::SpecialDate,
                source_id: st.id.clone(),
            });
        }

        let mut index: BTreeMap<NaiveDate, Vec<DemandLine>> = BTreeMap::new();
        for date in window.dates() {
            let mut lines: Vec<DemandLine> = match special_lines.get(&date) {
                Some(lines) => lines.clone(),
                None => templates
                    .iter()
                    .filter(|t| t.matches_weekday(date.weekday()))
                    .map(|t| DemandLine {
                        date,
                        area_id: t.area_id.clone(),
                        role_id: t.role_id.clone(),
                        start_time: t.start_time,
                        end_time: t.end_time,
                        break_minutes: t.break_minutes,
                        lunch_minutes: t.lunch_minutes,
                        required_count: t.required_count,
                        notes: t.notes.clone(),
                        source: DemandSource::WeeklyTemplate,
                        source_id: t.template_id.clone(),
                    })
                    .collect(),
            };

            lines.sort_by(|a, b| {
                (a.start_time, &a.area_id, &a.role_id, &a.source_id).cmp(&(
                    b.start_time,
                    &b.area_id,
                    &b.role_id,
                    &b.source_id,
                ))
            });

            if !lines.is_empty() {
                index.insert(date, lines);
            }
        }

        debug!(demand_days = index.len(), "需求索引构建完成");
        index
    }
}
