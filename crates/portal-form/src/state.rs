//! Form state: working copy, saved snapshot, errors and submission.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use portal_model::{Notice, Notifier};
use serde_json::Value;

use crate::rule::{FormData, Rule};

pub const VALIDATION_FAILED_MESSAGE: &str = "请检查表单填写是否正确";
pub const SUBMIT_SUCCEEDED_MESSAGE: &str = "提交成功";
pub const SUBMIT_FAILED_MESSAGE: &str = "提交失败，请稍后再试";

/// Handle returned by [`FormState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&Value) + Send>;

struct Subscriber {
    id: Subscription,
    field: String,
    listener: Listener,
}

/// Holds the submitting flag up; lowering it on drop also covers a submit
/// future that is cancelled mid-flight.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl<'a> SubmittingGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// State of one form.
///
/// `current` is the working copy, `original` the snapshot taken at load and
/// after each successful submit, and `defaults` the values `clear_form`
/// restores. Dirty and valid are derived on demand.
pub struct FormState {
    current: FormData,
    original: FormData,
    defaults: FormData,
    rules: BTreeMap<String, Vec<Rule>>,
    errors: BTreeMap<String, String>,
    submitting: Arc<AtomicBool>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl fmt::Debug for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("current", &self.current)
            .field("original", &self.original)
            .field("errors", &self.errors)
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl FormState {
    pub fn new(initial: FormData) -> Self {
        Self {
            original: initial.clone(),
            current: initial,
            defaults: FormData::new(),
            rules: BTreeMap::new(),
            errors: BTreeMap::new(),
            submitting: Arc::new(AtomicBool::new(false)),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Form whose initial data is also its declared defaults.
    pub fn with_initial_defaults(initial: FormData) -> Self {
        let mut form = Self::new(initial.clone());
        form.defaults = initial;
        form
    }

    /// Builds from a JSON object; anything else yields an empty form.
    pub fn from_value(initial: &Value) -> Self {
        Self::new(initial.as_object().cloned().unwrap_or_default())
    }

    #[must_use]
    pub fn defaults(mut self, defaults: FormData) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn rules(mut self, field: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.rules.insert(field.into(), rules);
        self
    }

    // ---------------------------------------------------------------------
    // Data
    // ---------------------------------------------------------------------

    pub fn data(&self) -> &FormData {
        &self.current
    }

    pub fn original(&self) -> &FormData {
        &self.original
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.current.get(field)
    }

    pub fn set_field(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        let changed = self.current.get(&field) != Some(&value);
        self.current.insert(field.clone(), value);
        if changed {
            self.publish(&field);
        }
    }

    /// Merges `data` into the working copy.
    pub fn set_data(&mut self, data: FormData) {
        for (field, value) in data {
            self.set_field(field, value);
        }
    }

    /// Restores the saved snapshot and clears errors.
    pub fn reset_form(&mut self) {
        let previous = std::mem::replace(&mut self.current, self.original.clone());
        self.clear_errors();
        self.publish_changes(&previous);
    }

    /// Sets every field to its declared default; fields without one become
    /// `null`. The saved snapshot is left alone.
    pub fn clear_form(&mut self) {
        let fields: BTreeSet<String> = self
            .current
            .keys()
            .chain(self.defaults.keys())
            .cloned()
            .collect();
        let cleared: FormData = fields
            .into_iter()
            .map(|field| {
                let value = self.defaults.get(&field).cloned().unwrap_or(Value::Null);
                (field, value)
            })
            .collect();
        let previous = std::mem::replace(&mut self.current, cleared);
        self.clear_errors();
        self.publish_changes(&previous);
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.original
    }

    pub fn is_field_dirty(&self, field: &str) -> bool {
        self.current.get(field) != self.original.get(field)
    }

    // ---------------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------------

    pub fn add_rules(&mut self, field: impl Into<String>, rules: Vec<Rule>) {
        self.rules.insert(field.into(), rules);
    }

    pub fn remove_rules(&mut self, field: &str) {
        self.rules.remove(field);
    }

    /// Validates one field against its rules, updating its error entry.
    pub fn validate_field(&mut self, field: &str) -> bool {
        let Some(rules) = self.rules.get(field) else {
            self.errors.remove(field);
            return true;
        };
        let value = self.current.get(field).unwrap_or(&Value::Null);
        let failure = rules
            .iter()
            .find_map(|rule| rule.evaluate(field, value, &self.current).err());
        match failure {
            Some(message) => {
                tracing::debug!(field, %message, "field failed validation");
                self.errors.insert(field.to_string(), message);
                false
            }
            None => {
                self.errors.remove(field);
                true
            }
        }
    }

    /// Clears all errors and validates every field in the data or the rule
    /// table.
    pub fn validate_form(&mut self) -> bool {
        self.clear_errors();
        let fields: BTreeSet<String> = self
            .current
            .keys()
            .chain(self.rules.keys())
            .cloned()
            .collect();
        let mut valid = true;
        for field in fields {
            valid &= self.validate_field(&field);
        }
        valid
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn set_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    // ---------------------------------------------------------------------
    // Submission
    // ---------------------------------------------------------------------

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Shared handle on the submitting flag, readable while a submit runs.
    pub fn submitting_flag(&self) -> Arc<AtomicBool> {
        self.submitting.clone()
    }

    /// Validates, then hands a copy of the data to `submit`.
    ///
    /// `submit` is never called when validation fails. On success the saved
    /// snapshot becomes the current data. Every outcome posts a notice.
    pub async fn submit<F, Fut, E>(&mut self, notifier: &dyn Notifier, submit: F) -> bool
    where
        F: FnOnce(FormData) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        if !self.validate_form() {
            notifier.notify(Notice::error(VALIDATION_FAILED_MESSAGE));
            return false;
        }

        let result = {
            let _submitting = SubmittingGuard::raise(&self.submitting);
            submit(self.current.clone()).await
        };

        match result {
            Ok(()) => {
                self.original = self.current.clone();
                notifier.notify(Notice::success(SUBMIT_SUCCEEDED_MESSAGE));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "form submission failed");
                notifier.notify(Notice::error(SUBMIT_FAILED_MESSAGE));
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Change notification
    // ---------------------------------------------------------------------

    /// Calls `listener` with the new value whenever `field` changes.
    pub fn subscribe(
        &mut self,
        field: impl Into<String>,
        listener: impl FnMut(&Value) + Send + 'static,
    ) -> Subscription {
        let id = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            field: field.into(),
            listener: Box::new(listener),
        });
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != subscription);
        self.subscribers.len() != before
    }

    fn publish(&mut self, field: &str) {
        let value = self.current.get(field).cloned().unwrap_or(Value::Null);
        for subscriber in self.subscribers.iter_mut().filter(|s| s.field == field) {
            (subscriber.listener)(&value);
        }
    }

    fn publish_changes(&mut self, previous: &FormData) {
        let changed: Vec<String> = previous
            .keys()
            .chain(self.current.keys())
            .filter(|field| previous.get(*field) != self.current.get(*field))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        for field in changed {
            self.publish(&field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use serde_json::json;
    use std::sync::Mutex;

    fn form(value: Value) -> FormState {
        FormState::from_value(&value)
    }

    #[test]
    fn dirty_tracks_structural_inequality() {
        let mut state = form(json!({"name": "a", "tags": []}));
        assert!(!state.is_dirty());
        state.set_field("name", json!("b"));
        assert!(state.is_dirty());
        assert!(state.is_field_dirty("name"));
        assert!(!state.is_field_dirty("tags"));
        state.set_field("name", json!("a"));
        assert!(!state.is_dirty());
    }

    #[test]
    fn reset_restores_snapshot_and_clears_errors() {
        let mut state = form(json!({"name": "a"}));
        state.set_field("name", json!("b"));
        state.set_field_error("name", "bad");
        state.reset_form();
        assert_eq!(state.value("name"), Some(&json!("a")));
        assert!(state.is_valid());
    }

    #[test]
    fn clear_uses_declared_defaults() {
        let mut defaults = FormData::new();
        defaults.insert("tags".into(), json!([]));
        defaults.insert("count".into(), json!(0));
        let mut state = form(json!({"tags": ["x"], "count": 3, "note": "n"})).defaults(defaults);
        state.clear_form();
        assert_eq!(state.data().get("tags"), Some(&json!([])));
        assert_eq!(state.data().get("count"), Some(&json!(0)));
        assert_eq!(state.data().get("note"), Some(&Value::Null));
    }

    #[test]
    fn fields_only_in_rule_table_are_validated() {
        let mut state = form(json!({})).rules("account", vec![presets::required("请输入账号")]);
        assert!(!state.validate_form());
        assert_eq!(state.field_error("account"), Some("请输入账号"));
    }

    #[test]
    fn first_failing_rule_wins() {
        let mut state = form(json!({"phone": "123"})).rules(
            "phone",
            vec![presets::required("请输入手机号"), presets::phone(), Rule::new().max(1)],
        );
        assert!(!state.validate_field("phone"));
        assert_eq!(state.field_error("phone"), Some("请输入有效的手机号"));
    }

    #[test]
    fn subscribers_fire_on_change_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut state = form(json!({"name": "a"}));
        let sub = state.subscribe("name", move |v| sink.lock().unwrap().push(v.clone()));

        state.set_field("name", json!("a"));
        state.set_field("name", json!("b"));
        state.set_field("other", json!(1));
        state.reset_form();
        assert!(state.unsubscribe(sub));
        state.set_field("name", json!("c"));

        assert_eq!(*seen.lock().unwrap(), vec![json!("b"), json!("a")]);
        assert!(!state.unsubscribe(sub));
    }
}
