//! Outbound message formatting
//!
//! Deployment-facing strings are Chinese, matching the form fields the
//! group actually fills in.

use crate::types::{Headcount, MealKind, QuantityLimits};
use chrono::NaiveDate;

/// Fixed-structure markdown headcount report.
pub fn md_report(
    served_date: NaiveDate,
    kind: MealKind,
    headcount: Headcount,
    limits: QuantityLimits,
) -> String {
    format!(
        "**{date} {meal} 用餐汇总**\n\
         > 成人：**{adults}** 份　儿童：**{children}** 份　合计：**{total}** 份\n\
         \n\
         （自动发送｜成人≤{adult_max}、儿童≤{child_max}〔儿童可不填〕｜餐别多选；每餐各自以最后一次为准）",
        date = served_date.format("%Y-%m-%d"),
        meal = kind.display_cn(),
        adults = headcount.adults,
        children = headcount.children,
        total = headcount.total(),
        adult_max = limits.adult_max,
        child_max = limits.child_max,
    )
}

/// Short text summary sent with @-mentions ahead of the markdown report.
pub fn mention_text(served_date: NaiveDate, kind: MealKind, headcount: Headcount) -> String {
    format!(
        "{date} {meal} 汇总：成人 {adults}，儿童 {children}，合计 {total}。",
        date = served_date.format("%Y-%m-%d"),
        meal = kind.display_cn(),
        adults = headcount.adults,
        children = headcount.children,
        total = headcount.total(),
    )
}

/// Registration-open reminder. `form_link` should already carry the
/// date-prefill parameters; `None` falls back to the group-notice line.
pub fn remind_text(
    target_date: NaiveDate,
    deadline_hhmm: &str,
    form_link: Option<&str>,
    limits: QuantityLimits,
) -> String {
    let date = target_date.format("%Y-%m-%d");
    let opening = if deadline_hhmm.is_empty() {
        format!("{date} 用餐登记开始")
    } else {
        format!("{date} 用餐登记开始（截止 {deadline_hhmm}）")
    };
    let link_line = match form_link {
        Some(link) if !link.is_empty() => format!("员工餐订餐链接➡️：{link}"),
        _ => "表单入口见群公告。".to_string(),
    };
    format!(
        "{opening}\n\
         截止登记时间：午餐：09:30、晚餐/次日早餐：15:00；（可多选）\n\
         {link_line}\n\
         福利：可额外点选家人餐（堂食/外带均可）：成人≤{adult_max}、儿童≤{child_max} 用餐杜绝浪费。",
        adult_max = limits.adult_max,
        child_max = limits.child_max,
    )
}
