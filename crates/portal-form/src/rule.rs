//! Validation rules attached to form fields.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

/// Form data: field name to JSON value.
pub type FormData = Map<String, Value>;

/// Custom check run after the built-in checks of a rule.
///
/// Receives the field value and the whole form; `Err` carries the message to
/// show. An empty message falls back to the rule's message.
pub type Check = Arc<dyn Fn(&Value, &FormData) -> Result<(), String> + Send + Sync>;

/// One validation rule.
///
/// Inside a rule the checks run in a fixed order: required, minimum length,
/// maximum length, pattern, custom check. The first failure wins.
#[derive(Clone, Default)]
pub struct Rule {
    pub required: bool,
    /// Minimum length in characters (strings) or items (arrays).
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub pattern: Option<Regex>,
    pub check: Option<Check>,
    /// Replaces the default message of whichever check fails.
    pub message: Option<String>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("required", &self.required)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("check", &self.check.is_some())
            .field("message", &self.message)
            .finish()
    }
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    #[must_use]
    pub fn check(
        mut self,
        check: impl Fn(&Value, &FormData) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.check = Some(Arc::new(check));
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Runs this rule against `value`, returning the error message on failure.
    pub fn evaluate(&self, field: &str, value: &Value, data: &FormData) -> Result<(), String> {
        let missing = is_missing(value);
        if self.required && missing {
            return Err(self.message_or(|| format!("{field}不能为空")));
        }
        if missing {
            return self.run_check(field, value, data);
        }

        if let Some(len) = value_len(value) {
            if let Some(min) = self.min
                && len < min
            {
                return Err(self.message_or(|| format!("{field}长度不能少于{min}位")));
            }
            if let Some(max) = self.max
                && len > max
            {
                return Err(self.message_or(|| format!("{field}长度不能超过{max}位")));
            }
        }

        if let Some(pattern) = &self.pattern
            && let Some(text) = pattern_text(value)
            && !pattern.is_match(&text)
        {
            return Err(self.message_or(|| format!("{field}格式不正确")));
        }

        self.run_check(field, value, data)
    }

    fn run_check(&self, field: &str, value: &Value, data: &FormData) -> Result<(), String> {
        match &self.check {
            Some(check) => check(value, data).map_err(|message| {
                if message.is_empty() {
                    self.message_or(|| format!("{field}不正确"))
                } else {
                    message
                }
            }),
            None => Ok(()),
        }
    }

    fn message_or(&self, default: impl FnOnce() -> String) -> String {
        self.message.clone().unwrap_or_else(default)
    }
}

/// Null, empty text, `false`, and empty arrays or objects count as missing.
/// Numbers, including zero, never do.
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(_) => false,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn value_len(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn pattern_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(rule: &Rule, value: Value) -> Result<(), String> {
        rule.evaluate("姓名", &value, &FormData::new())
    }

    #[test]
    fn required_precedes_length() {
        let rule = Rule::new().required().min(2);
        assert_eq!(eval(&rule, json!("")), Err("姓名不能为空".to_string()));
        assert_eq!(eval(&rule, json!("王")), Err("姓名长度不能少于2位".to_string()));
        assert_eq!(eval(&rule, json!("王五")), Ok(()));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let rule = Rule::new().max(3);
        assert!(eval(&rule, json!("张三丰")).is_ok());
        assert!(eval(&rule, json!("欧阳修远")).is_err());
        assert!(eval(&rule, json!(["a", "b", "c", "d"])).is_err());
    }

    #[test]
    fn optional_empty_value_skips_checks() {
        let rule = Rule::new().min(5).pattern(Regex::new(r"^\d+$").unwrap());
        assert!(eval(&rule, json!("")).is_ok());
        assert!(eval(&rule, Value::Null).is_ok());
        assert!(eval(&rule, json!("12a45")).is_err());
        assert!(eval(&rule, json!(12345)).is_ok());
    }

    #[test]
    fn zero_is_not_missing() {
        assert!(eval(&Rule::new().required(), json!(0)).is_ok());
        assert!(eval(&Rule::new().required(), json!(false)).is_err());
    }

    #[test]
    fn custom_message_overrides_defaults() {
        let rule = Rule::new().required().message("请输入姓名");
        assert_eq!(eval(&rule, Value::Null), Err("请输入姓名".to_string()));

        let rule = Rule::new().check(|_, _| Err(String::new()));
        assert_eq!(eval(&rule, json!("x")), Err("姓名不正确".to_string()));
        let rule = Rule::new().check(|_, _| Err("重复".to_string()));
        assert_eq!(eval(&rule, json!("x")), Err("重复".to_string()));
    }
}
