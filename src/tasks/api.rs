use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use crate::auth::TokenSource;
use crate::error::MoverError;
use super::models::{Task, TaskList};

pub const TASKS_API: &str = "https://tasks.googleapis.com/tasks/v1";

/// Page size when listing task lists
pub const TASK_LIST_PAGE_SIZE: u32 = 10;

/// Page size when listing tasks; only the first page is read
pub const TASK_PAGE_SIZE: u32 = 100;

/// Operations the migration needs from the remote task service
pub trait TasksApi {
    fn list_task_lists(&self, max_results: u32) -> Result<Vec<TaskList>, MoverError>;
    fn list_tasks(&self, list_id: &str) -> Result<Vec<Task>, MoverError>;
    fn update_task(&self, list_id: &str, task: &Task) -> Result<Task, MoverError>;
}

#[derive(Deserialize)]
struct ItemsResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Google Tasks REST client
pub struct GoogleTasksClient {
    http: Client,
    tokens: TokenSource,
    base_url: String,
}

impl GoogleTasksClient {
    pub fn new(http: Client, tokens: TokenSource) -> Self {
        Self::with_base_url(http, tokens, TASKS_API)
    }

    pub fn with_base_url(http: Client, tokens: TokenSource, base_url: impl Into<String>) -> Self {
        Self {
            http,
            tokens,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder, context: &str) -> Result<T, MoverError> {
        let token = self.tokens.access_token()?;
        let resp = request
            .bearer_auth(token)
            .send()
            .map_err(|source| MoverError::Http {
                context: context.to_string(),
                source,
            })?;
        decode(resp, context)
    }
}

fn decode<T: DeserializeOwned>(resp: Response, context: &str) -> Result<T, MoverError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(MoverError::ApiStatus {
            context: context.to_string(),
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }
    resp.json().map_err(|source| MoverError::Http {
        context: context.to_string(),
        source,
    })
}

impl TasksApi for GoogleTasksClient {
    fn list_task_lists(&self, max_results: u32) -> Result<Vec<TaskList>, MoverError> {
        log::debug!("Listing task lists (maxResults={})", max_results);
        let request = self
            .http
            .get(format!("{}/users/@me/lists", self.base_url))
            .query(&[("maxResults", max_results.to_string())]);
        let body: ItemsResponse<TaskList> = self.send(request, "Unable to retrieve task lists")?;
        Ok(body.items)
    }

    fn list_tasks(&self, list_id: &str) -> Result<Vec<Task>, MoverError> {
        log::debug!("Listing tasks in {}", list_id);
        let request = self
            .http
            .get(format!("{}/lists/{}/tasks", self.base_url, list_id))
            .query(&[
                ("maxResults", TASK_PAGE_SIZE.to_string()),
                ("showCompleted", "true".to_string()),
            ]);
        let body: ItemsResponse<Task> = self.send(request, "Unable to get tasks from list")?;
        Ok(body.items)
    }

    fn update_task(&self, list_id: &str, task: &Task) -> Result<Task, MoverError> {
        log::debug!("Updating task {} in {}", task.id, list_id);
        let request = self
            .http
            .put(format!("{}/lists/{}/tasks/{}", self.base_url, list_id, task.id))
            .json(task);
        self.send(request, "Unable to update task")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credential, OAuthClientConfig};
    use crate::tasks::models::TaskStatus;
    use crate::test_support::StubServer;
    use chrono::{Duration, Utc};

    fn live_tokens() -> TokenSource {
        let oauth = OAuthClientConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            auth_uri: "http://127.0.0.1:9/auth".to_string(),
            token_uri: "http://127.0.0.1:9/token".to_string(),
            redirect_uri: String::new(),
            scopes: vec![],
        };
        let credential = Credential {
            access_token: "live-token".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: None,
            expiry: Some(Utc::now() + Duration::hours(1)),
            scope: None,
        };
        TokenSource::new(oauth, credential, Client::new())
    }

    #[test]
    fn test_requests_against_stub_service() {
        let stub = StubServer::serve(vec![
            (200, r#"{"items":[{"id":"L","title":"My Tasks"}]}"#),
            (200, r#"{"items":[{"id":"t1","title":"Pay rent","status":"needsAction","due":"2022-04-05T00:00:00.000Z","notes":"portal"}]}"#),
            (200, r#"{"id":"t1","title":"Pay rent","status":"needsAction","due":"2022-04-06T00:00:00.000Z","notes":"portal"}"#),
        ]);
        let client = GoogleTasksClient::with_base_url(Client::new(), live_tokens(), format!("{}/", stub.url()));

        let lists = client.list_task_lists(TASK_LIST_PAGE_SIZE).unwrap();
        assert_eq!(lists, vec![TaskList { id: "L".to_string(), title: "My Tasks".to_string() }]);

        let mut tasks = client.list_tasks("L").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::NeedsAction);

        let mut task = tasks.remove(0);
        task.set_due(chrono::NaiveDate::from_ymd_opt(2022, 4, 6).unwrap());
        let updated = client.update_task("L", &task).unwrap();
        assert_eq!(updated.due.as_deref(), Some("2022-04-06T00:00:00.000Z"));

        let requests = stub.requests();
        assert_eq!(requests.len(), 3);
        for request in &requests {
            assert_eq!(request.header("authorization"), Some("Bearer live-token"));
        }

        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].target, "/users/@me/lists?maxResults=10");

        assert_eq!(requests[1].method, "GET");
        assert_eq!(requests[1].target, "/lists/L/tasks?maxResults=100&showCompleted=true");

        assert_eq!(requests[2].method, "PUT");
        assert_eq!(requests[2].target, "/lists/L/tasks/t1");
        let sent: serde_json::Value = serde_json::from_str(&requests[2].body).unwrap();
        assert_eq!(sent["due"], "2022-04-06T00:00:00.000Z");
        assert_eq!(sent["status"], "needsAction");
        assert_eq!(sent["notes"], "portal");
    }

    #[test]
    fn test_error_status_keeps_body() {
        let stub = StubServer::serve(vec![(403, r#"{"error":{"message":"insufficient scope"}}"#)]);
        let client = GoogleTasksClient::with_base_url(Client::new(), live_tokens(), stub.url());

        let err = client.list_task_lists(TASK_LIST_PAGE_SIZE).unwrap_err();
        match err {
            MoverError::ApiStatus { status, body, .. } => {
                assert_eq!(status, 403);
                assert!(body.contains("insufficient scope"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        stub.requests();
    }

    #[test]
    fn test_items_default_to_empty() {
        let body: ItemsResponse<TaskList> = serde_json::from_str(r#"{"kind":"tasks#taskLists"}"#).unwrap();
        assert!(body.items.is_empty());
    }

    #[test]
    fn test_task_list_response() {
        let body: ItemsResponse<TaskList> = serde_json::from_str(
            r#"{"items":[{"kind":"tasks#taskList","id":"L1","title":"My Tasks","updated":"2022-04-01T00:00:00.000Z"}]}"#,
        )
        .unwrap();
        assert_eq!(body.items, vec![TaskList { id: "L1".to_string(), title: "My Tasks".to_string() }]);
    }
}
