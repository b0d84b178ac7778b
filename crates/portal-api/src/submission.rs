//! Entry submissions, one resource family per work category.

use std::fmt;

use portal_http::{HttpClient, Method, RequestOptions};
use portal_model::Envelope;
use serde_json::Value;

use crate::types::{Category, GroupCategory};

pub const GROUP_CATEGORIES_PATH: &str = "/competition-configs/admin/group-categories/";

/// Work category; each owns a URL prefix on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionKind {
    Artwork,
    Calligraphy,
    Dance,
    Film,
    Instrumental,
    Recitation,
    Vocal,
}

impl SubmissionKind {
    pub const ALL: [SubmissionKind; 7] = [
        SubmissionKind::Artwork,
        SubmissionKind::Calligraphy,
        SubmissionKind::Dance,
        SubmissionKind::Film,
        SubmissionKind::Instrumental,
        SubmissionKind::Recitation,
        SubmissionKind::Vocal,
    ];

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Artwork => "artwork",
            Self::Calligraphy => "calligraphy",
            Self::Dance => "danceperformance",
            Self::Film => "filmwork",
            Self::Instrumental => "instrumentalperformance",
            Self::Recitation => "recitationperformance",
            Self::Vocal => "vocalperformance",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Artwork => "绘画作品",
            Self::Calligraphy => "书法篆刻作品",
            Self::Dance => "舞蹈作品",
            Self::Film => "影视作品",
            Self::Instrumental => "器乐作品",
            Self::Recitation => "朗诵作品",
            Self::Vocal => "声乐作品",
        }
    }

    /// Method used to save an existing submission. `None` means the backend
    /// only accepts creation, so saving always posts to the collection.
    pub fn update_method(self) -> Option<Method> {
        match self {
            Self::Artwork | Self::Dance | Self::Instrumental => Some(Method::PUT),
            Self::Calligraphy => Some(Method::PATCH),
            Self::Film | Self::Recitation | Self::Vocal => None,
        }
    }

    pub fn collection_path(self) -> String {
        format!("/{}/applications/", self.prefix())
    }

    pub fn item_path(self, id: impl fmt::Display) -> String {
        format!("/{}/applications/{id}/", self.prefix())
    }

    pub fn submit_path(self, id: impl fmt::Display) -> String {
        // Calligraphy entries are submitted through the craftwork route.
        let prefix = match self {
            Self::Calligraphy => "craftwork",
            other => other.prefix(),
        };
        format!("/{prefix}/applications/{id}/submit/")
    }

    /// Where the participant list lives and the key it is wrapped in.
    pub fn participants_location(self, id: impl fmt::Display) -> (String, &'static str) {
        match self {
            Self::Calligraphy => (self.item_path(id), "students"),
            other => (
                format!("/{}/participants/{id}/", other.prefix()),
                "participants",
            ),
        }
    }

    /// Path for adding a participant. Dance keeps separate teacher and
    /// student routes, chosen by the payload's `role`.
    pub fn add_participant_path(self, submission_id: impl fmt::Display, role: Option<&str>) -> String {
        let action = match self {
            Self::Artwork => "add-author",
            Self::Calligraphy => "add-student",
            Self::Dance if role == Some("teacher") => "add-teacher",
            Self::Dance => "add-student",
            _ => "add-participant",
        };
        format!("/{}/participant/{submission_id}/{action}/", self.prefix())
    }

    pub fn delete_participant_path(self, id: impl fmt::Display) -> String {
        format!("/{}/participants/{id}/delete/", self.prefix())
    }

    pub fn categories_path(self) -> String {
        let prefix = self.prefix();
        format!("/{prefix}/get-{prefix}-categories/")
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Operations on one submission family.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionApi<'a> {
    http: &'a HttpClient,
    kind: SubmissionKind,
}

impl<'a> SubmissionApi<'a> {
    pub fn new(http: &'a HttpClient, kind: SubmissionKind) -> Self {
        Self { http, kind }
    }

    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    /// Creates the submission, or updates it when `data` carries an `id`.
    pub async fn save(&self, data: &Value) -> Envelope<Value> {
        let options = RequestOptions::new().body(data.clone());
        match (existing_id(data), self.kind.update_method()) {
            (Some(id), Some(method)) => {
                tracing::debug!(kind = %self.kind, %id, "updating submission");
                self.http.request(method, &self.kind.item_path(id), options).await
            }
            _ => self.http.post(&self.kind.collection_path(), options).await,
        }
    }

    pub async fn get(&self, id: impl fmt::Display) -> Envelope<Value> {
        self.http
            .get(&self.kind.item_path(id), RequestOptions::new())
            .await
    }

    /// Lists submissions. `query` is an object of filter parameters.
    pub async fn list(&self, query: &Value) -> Envelope<Vec<Value>> {
        let options = RequestOptions::new().query_object(query);
        let envelope = self.http.get(&self.kind.collection_path(), options).await;
        unwrap_list(envelope, None)
    }

    /// Moves a draft into review.
    pub async fn submit(&self, id: impl fmt::Display) -> Envelope<Value> {
        self.http
            .post(&self.kind.submit_path(id), RequestOptions::new())
            .await
    }

    pub async fn participants(&self, id: impl fmt::Display) -> Envelope<Vec<Value>> {
        let (path, key) = self.kind.participants_location(id);
        let envelope = self.http.get(&path, RequestOptions::new()).await;
        unwrap_list(envelope, Some(key))
    }

    pub async fn add_participant(
        &self,
        submission_id: impl fmt::Display,
        participant: &Value,
    ) -> Envelope<Value> {
        let role = participant.get("role").and_then(Value::as_str);
        let path = self.kind.add_participant_path(submission_id, role);
        self.http
            .post(&path, RequestOptions::new().body(participant.clone()))
            .await
    }

    pub async fn delete_participant(&self, id: impl fmt::Display) -> Envelope<Value> {
        self.http
            .post(&self.kind.delete_participant_path(id), RequestOptions::new())
            .await
    }

    pub async fn categories(&self) -> Envelope<Vec<Category>> {
        let envelope = self
            .http
            .get(&self.kind.categories_path(), RequestOptions::new())
            .await;
        typed_list(unwrap_list(envelope, None))
    }

    pub async fn group_categories(&self) -> Envelope<Vec<GroupCategory>> {
        let envelope = self
            .http
            .get(GROUP_CATEGORIES_PATH, RequestOptions::new())
            .await;
        typed_list(unwrap_list(envelope, None))
    }
}

/// The submission id in `data`, if it is a non-empty number or string.
fn existing_id(data: &Value) -> Option<String> {
    match data.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Extracts a list from the shapes backends wrap lists in: a bare array,
/// `{key: [...]}`, `{data: [...]}` or a paginated `{results: [...]}`.
/// Anything else yields an empty list with the envelope's code and message.
pub fn unwrap_list(envelope: Envelope<Value>, key: Option<&str>) -> Envelope<Vec<Value>> {
    envelope.map(|data| {
        let nested = |name: &str| data.get(name).and_then(Value::as_array).cloned();
        match &data {
            Value::Array(items) => items.clone(),
            Value::Object(_) => key
                .and_then(nested)
                .or_else(|| nested("data"))
                .or_else(|| nested("results"))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    })
}

/// Drops list items that do not match `T`.
fn typed_list<T: serde::de::DeserializeOwned>(envelope: Envelope<Vec<Value>>) -> Envelope<Vec<T>> {
    envelope.map(|items| {
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths() {
        assert_eq!(
            SubmissionKind::Calligraphy.submit_path(4),
            "/craftwork/applications/4/submit/"
        );
        assert_eq!(
            SubmissionKind::Dance.add_participant_path(2, Some("teacher")),
            "/danceperformance/participant/2/add-teacher/"
        );
        assert_eq!(
            SubmissionKind::Film.categories_path(),
            "/filmwork/get-filmwork-categories/"
        );
        assert_eq!(
            SubmissionKind::Calligraphy.participants_location(7),
            ("/calligraphy/applications/7/".to_string(), "students")
        );
    }

    #[test]
    fn list_shapes() {
        let items = |data: Value, key| unwrap_list(Envelope::new(200, "ok", data), key).data;
        assert_eq!(items(json!([1, 2]), None).len(), 2);
        assert_eq!(items(json!({"data": [1]}), None).len(), 1);
        assert_eq!(items(json!({"count": 3, "results": [1, 2, 3]}), None).len(), 3);
        assert_eq!(items(json!({"participants": [1]}), Some("participants")).len(), 1);
        assert!(items(json!({"participants": null}), Some("participants")).is_empty());
        assert!(items(json!("nope"), None).is_empty());
    }

    #[test]
    fn existing_ids() {
        assert_eq!(existing_id(&json!({"id": 12})), Some("12".to_string()));
        assert_eq!(existing_id(&json!({"id": " "})), None);
        assert_eq!(existing_id(&json!({"title": "x"})), None);
    }
}
