//! Side menu entries per role.

use portal_model::Role;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub path: &'static str,
    pub title: &'static str,
}

const fn item(path: &'static str, title: &'static str) -> MenuItem {
    MenuItem { path, title }
}

const USER_MENU: &[MenuItem] = &[
    item("/user/info", "学生基本信息"),
    item("/user/student-basic", "学生基本功展示报名"),
    item("/user/teacher-basic", "教师基本功展示报名"),
    item("/user/student-stats", "学生基本功报名信息统计"),
    item("/user/teacher-stats", "教师基本功报名信息统计"),
];

const REVIEWER_MENU: &[MenuItem] = &[
    item("/reviewer/home", "审核首页"),
    item("/reviewer/approve", "报名审核"),
    item("/reviewer/schools", "学校管理"),
];

const ADMIN_MENU: &[MenuItem] = &[
    item("/admin/home", "管理首页"),
    item("/admin/students", "学生管理"),
    item("/admin/teachers", "教师管理"),
    item("/admin/settings", "系统设置"),
];

const LOGGER_MENU: &[MenuItem] = &[item("/logger/home", "日志记录")];

const APPROVAL_MENU: &[MenuItem] = &[
    item("/approval/home", "审批首页"),
    item("/approval/pending", "待审批项目"),
    item("/approval/history", "审批历史"),
];

const LOG_AUDIT_MENU: &[MenuItem] = &[
    item("/logaudit/home", "日志审计"),
    item("/logaudit/logs", "日志查看"),
    item("/logaudit/audit", "审计记录"),
];

pub fn menu_for(role: Role) -> &'static [MenuItem] {
    match role {
        Role::User => USER_MENU,
        Role::Reviewer => REVIEWER_MENU,
        Role::Admin => ADMIN_MENU,
        Role::Logger => LOGGER_MENU,
        Role::Approval => APPROVAL_MENU,
        Role::LogAudit => LOG_AUDIT_MENU,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_lives_under_the_landing_route() {
        for role in Role::ALL {
            let landing = role.landing_route();
            assert!(!menu_for(role).is_empty());
            assert!(
                menu_for(role)
                    .iter()
                    .all(|entry| entry.path.starts_with(&format!("{landing}/")))
            );
        }
    }
}
