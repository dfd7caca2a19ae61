//! Row Actions
//!
//! Declarative per-row actions (delete, detail, edit, custom HTTP calls) and
//! the executor that runs them: confirmation gate, request, toast, cache
//! invalidation.

use std::sync::Arc;

use serde_json::Value;

use super::client::QueryClient;
use crate::api::{ApiRequest, Method};
use crate::error::ApiError;
use crate::models::Resource;
use crate::notify::Notifier;

type RowFn<T, R> = Arc<dyn Fn(&T) -> R + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Delete,
    Detail,
    Edit,
    Custom,
}

/// Whether the UI must show a confirm step before running the action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPolicy {
    Required,
    Immediate,
}

pub enum ActionTarget<T> {
    /// Call the backend; `endpoint` builds the path from the row
    Http {
        method: Method,
        endpoint: RowFn<T, String>,
        body: Option<RowFn<T, Value>>,
    },
    /// Client-side navigation, no request
    Navigate(RowFn<T, String>),
}

impl<T> Clone for ActionTarget<T> {
    fn clone(&self) -> Self {
        match self {
            ActionTarget::Http { method, endpoint, body } => ActionTarget::Http {
                method: *method,
                endpoint: endpoint.clone(),
                body: body.clone(),
            },
            ActionTarget::Navigate(to) => ActionTarget::Navigate(to.clone()),
        }
    }
}

pub struct ActionDescriptor<T> {
    pub key: &'static str,
    pub label: String,
    pub kind: ActionKind,
    pub target: ActionTarget<T>,
    pub confirm: ConfirmPolicy,
    pub success_message: String,
    /// Shown when the server gives no message of its own
    pub error_message: String,
    pub on_success: Option<RowFn<T, ()>>,
}

impl<T> Clone for ActionDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            label: self.label.clone(),
            kind: self.kind,
            target: self.target.clone(),
            confirm: self.confirm,
            success_message: self.success_message.clone(),
            error_message: self.error_message.clone(),
            on_success: self.on_success.clone(),
        }
    }
}

impl<T: Resource> ActionDescriptor<T> {
    /// `DELETE /api/{controller}/{id}`, confirmed first
    pub fn delete() -> Self {
        Self {
            key: "delete",
            label: "Delete".to_string(),
            kind: ActionKind::Delete,
            target: ActionTarget::Http {
                method: Method::Delete,
                endpoint: Arc::new(|row: &T| T::KIND.delete_path(row.id())),
                body: None,
            },
            confirm: ConfirmPolicy::Required,
            success_message: "Deleted successfully".to_string(),
            error_message: "Delete failed".to_string(),
            on_success: None,
        }
    }

    pub fn detail() -> Self {
        Self::navigate("detail", "View", ActionKind::Detail, |row: &T| {
            format!("/admin/{}/{}", T::KIND.slug(), row.id())
        })
    }

    pub fn edit() -> Self {
        Self::navigate("edit", "Edit", ActionKind::Edit, |row: &T| {
            format!("/admin/{}/{}/edit", T::KIND.slug(), row.id())
        })
    }

    fn navigate(
        key: &'static str,
        label: &str,
        kind: ActionKind,
        to: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            label: label.to_string(),
            kind,
            target: ActionTarget::Navigate(Arc::new(to)),
            confirm: ConfirmPolicy::Immediate,
            success_message: String::new(),
            error_message: String::new(),
            on_success: None,
        }
    }

    /// Arbitrary backend call against one row
    pub fn custom(
        key: &'static str,
        label: &str,
        method: Method,
        endpoint: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            label: label.to_string(),
            kind: ActionKind::Custom,
            target: ActionTarget::Http {
                method,
                endpoint: Arc::new(endpoint),
                body: None,
            },
            confirm: ConfirmPolicy::Immediate,
            success_message: format!("{} done", label),
            error_message: format!("{} failed", label),
            on_success: None,
        }
    }

    pub fn with_body(mut self, body: impl Fn(&T) -> Value + Send + Sync + 'static) -> Self {
        if let ActionTarget::Http { body: slot, .. } = &mut self.target {
            *slot = Some(Arc::new(body));
        }
        self
    }

    pub fn with_confirm(mut self, confirm: ConfirmPolicy) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn with_messages(mut self, success: &str, error: &str) -> Self {
        self.success_message = success.to_string();
        self.error_message = error.to_string();
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Request succeeded; the resource's cached pages were invalidated
    Completed,
    /// Nothing sent; the caller must confirm and call again
    NeedsConfirmation,
    Failed(ApiError),
    Navigate(String),
}

impl ActionOutcome {
    /// The list showing this row should refetch
    pub fn needs_refresh(&self) -> bool {
        matches!(self, ActionOutcome::Completed)
    }
}

/// Run `action` against `row`.
///
/// Actions with [`ConfirmPolicy::Required`] are only sent when `confirmed`.
/// On failure the row is left as it was and the error toast carries the
/// server's message when it sent one.
pub async fn execute_action<T: Resource>(
    client: &QueryClient,
    notifier: &dyn Notifier,
    action: &ActionDescriptor<T>,
    row: &T,
    confirmed: bool,
) -> ActionOutcome {
    if action.confirm == ConfirmPolicy::Required && !confirmed {
        return ActionOutcome::NeedsConfirmation;
    }

    let (method, endpoint, body) = match &action.target {
        ActionTarget::Navigate(to) => return ActionOutcome::Navigate(to(row)),
        ActionTarget::Http { method, endpoint, body } => (*method, endpoint, body),
    };

    let mut request = ApiRequest::new(method, endpoint(row));
    if let Some(body) = body {
        request = request.with_body(body(row));
    }

    log::info!("[ACTION] {} {:?} #{}", action.key, T::KIND, row.id());
    match client.send(request).await {
        Ok(_) => {
            notifier.success(&action.success_message);
            if let Some(callback) = &action.on_success {
                callback(row);
            }
            client.invalidate(T::KIND);
            ActionOutcome::Completed
        }
        Err(ApiError::Cancelled) => ActionOutcome::Failed(ApiError::Cancelled),
        Err(e) => {
            log::warn!("[ACTION] {} {:?} #{} failed: {}", action.key, T::KIND, row.id(), e);
            notifier.error(&e.user_message(&action.error_message));
            ActionOutcome::Failed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use crate::api::ResourceKind;
    use crate::credentials::MemoryCredentials;
    use crate::models::Problem;
    use crate::notify::testing::RecordingNotifier;
    use crate::notify::ToastKind;
    use crate::query::cache::testing::ManualClock;
    use crate::query::key::ListQuery;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn problem(id: i64) -> Value {
        json!({
            "problemID": id,
            "problemName": format!("Problem {}", id),
            "problemCode": format!("P{}", id),
            "status": true
        })
    }

    fn row(id: i64) -> Problem {
        serde_json::from_value(problem(id)).unwrap()
    }

    /// Backend holding problems in memory; DELETE removes them
    fn problem_backend() -> (Rc<MockTransport>, Rc<RefCell<Vec<Value>>>) {
        let rows = Rc::new(RefCell::new((1..=5).map(problem).collect::<Vec<_>>()));
        let store = rows.clone();
        let transport = MockTransport::new(move |request| match request.method {
            Method::Get => respond(200, page_of(&store.borrow(), request)),
            Method::Delete => {
                let id: i64 = request.path.rsplit('/').next().and_then(|s| s.parse().ok()).unwrap();
                store.borrow_mut().retain(|r| ResourceKind::Problem.row_id(r) != Some(id));
                respond(204, Value::Null)
            }
            _ => respond(405, json!({})),
        });
        (transport, rows)
    }

    fn client(transport: Rc<MockTransport>) -> QueryClient {
        let h = harness(transport, MemoryCredentials::with_token("tok"));
        QueryClient::new(h.client, Rc::new(ManualClock::default()), 30_000.0)
    }

    #[tokio::test]
    async fn test_deleted_row_is_gone_after_refetch() {
        let (transport, _) = problem_backend();
        let client = client(transport.clone());
        let notifier = RecordingNotifier::default();
        let q = ListQuery::new(ResourceKind::Problem);

        let before = client.fetch_list(&q, None).await.unwrap();
        assert!(before.contains_id(ResourceKind::Problem, 3));

        let outcome = execute_action(&client, &notifier, &ActionDescriptor::delete(), &row(3), true).await;
        assert_eq!(outcome, ActionOutcome::Completed);
        assert!(outcome.needs_refresh());

        let after = client.fetch_list(&q, None).await.unwrap();
        assert!(!after.contains_id(ResourceKind::Problem, 3));
        assert_eq!(after.total_count, 4);
        assert_eq!(notifier.count(ToastKind::Success), 1);
        assert!(transport.calls().contains(&"DELETE http://api.test/api/Problem/3".to_string()));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (transport, rows) = problem_backend();
        let client = client(transport.clone());
        let notifier = RecordingNotifier::default();

        let outcome = execute_action(&client, &notifier, &ActionDescriptor::delete(), &row(2), false).await;
        assert_eq!(outcome, ActionOutcome::NeedsConfirmation);
        assert_eq!(transport.call_count(), 0);
        assert_eq!(rows.borrow().len(), 5);
    }

    #[tokio::test]
    async fn test_failure_toast_prefers_server_message() {
        let transport = MockTransport::new(|_| respond(409, json!({ "message": "Problem has submissions" })));
        let client = client(transport);
        let notifier = RecordingNotifier::default();

        let outcome = execute_action(&client, &notifier, &ActionDescriptor::delete(), &row(1), true).await;
        assert!(matches!(outcome, ActionOutcome::Failed(ApiError::Status { status: 409, .. })));
        assert_eq!(notifier.last(), Some((ToastKind::Error, "Problem has submissions".to_string())));
    }

    #[tokio::test]
    async fn test_failure_toast_falls_back_to_generic_message() {
        let transport = MockTransport::new(|_| respond(500, Value::Null));
        let client = client(transport);
        let notifier = RecordingNotifier::default();

        let action = ActionDescriptor::<Problem>::delete().with_messages("Gone", "Delete failed");
        execute_action(&client, &notifier, &action, &row(1), true).await;
        assert_eq!(notifier.last(), Some((ToastKind::Error, "Delete failed".to_string())));
    }

    #[tokio::test]
    async fn test_navigation_actions_send_nothing() {
        let transport = MockTransport::new(|_| respond(200, json!({})));
        let client = client(transport.clone());
        let notifier = RecordingNotifier::default();

        let outcome = execute_action(&client, &notifier, &ActionDescriptor::edit(), &row(7), false).await;
        assert_eq!(outcome, ActionOutcome::Navigate("/admin/problems/7/edit".to_string()));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_custom_action_sends_body_and_runs_callback() {
        let transport = MockTransport::new(|request| {
            assert_eq!(request.body, Some(json!({ "problemID": 4 })));
            respond(200, json!({}))
        });
        let client = client(transport.clone());
        let notifier = RecordingNotifier::default();
        let called = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = called.clone();

        let action = ActionDescriptor::<Problem>::custom("rejudge", "Rejudge", Method::Post, |row| {
            format!("/api/Problem/{}/rejudge", row.problem_id)
        })
        .with_body(|row| json!({ "problemID": row.problem_id }))
        .on_success(move |_| flag.store(true, std::sync::atomic::Ordering::SeqCst));

        let outcome = execute_action(&client, &notifier, &action, &row(4), false).await;
        assert_eq!(outcome, ActionOutcome::Completed);
        assert!(called.load(std::sync::atomic::Ordering::SeqCst));
        assert_eq!(transport.calls(), vec!["POST http://api.test/api/Problem/4/rejudge"]);
    }
}
