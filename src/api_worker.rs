use crate::api::{QuizApi, execute};
use crate::models::{ApiRequest, ApiResponse};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Spawns the task that performs network calls off the UI loop.
///
/// Requests are served one at a time in arrival order. The worker exits when
/// either side of the channel pair is dropped.
pub fn spawn_api_worker(
    api: Arc<dyn QuizApi>,
) -> (
    UnboundedSender<ApiRequest>,
    UnboundedReceiver<ApiResponse>,
    JoinHandle<()>,
) {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ApiRequest>();
    let (response_tx, response_rx) = mpsc::unbounded_channel::<ApiResponse>();

    let handle = tokio::spawn(async move {
        while let Some(request) = request_rx.recv().await {
            debug!(?request, "worker received request");
            let response = execute(api.as_ref(), request).await;
            if response_tx.send(response).is_err() {
                break;
            }
        }
        info!("api worker stopped");
    });

    (request_tx, response_rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::{
        CheckUserOutcome, CheckUserRequest, Course, FinalizeRequest, FinalizeResult,
        RetakeOutcome, RetakeRequest,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl QuizApi for RecordingApi {
        async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
            self.calls.lock().unwrap().push("courses".to_string());
            Ok(vec![])
        }

        async fn check_user(
            &self,
            course: Option<&str>,
            request: &CheckUserRequest,
        ) -> Result<CheckUserOutcome, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("check_user {:?} {}", course, request.identity));
            Ok(CheckUserOutcome::Rejected {
                message: "no".to_string(),
            })
        }

        async fn finalize(
            &self,
            _course: Option<&str>,
            _request: &FinalizeRequest,
        ) -> Result<FinalizeResult, ApiError> {
            Err(ApiError::Rejected("offline".to_string()))
        }

        async fn retake(&self, _request: &RetakeRequest) -> Result<RetakeOutcome, ApiError> {
            unreachable!("not used")
        }
    }

    #[tokio::test]
    async fn test_worker_answers_in_order() {
        let api = Arc::new(RecordingApi::default());
        let (tx, mut rx, handle) = spawn_api_worker(api.clone());

        tx.send(ApiRequest::FetchCourses).unwrap();
        tx.send(ApiRequest::CheckUser {
            course: Some("db".to_string()),
            request: CheckUserRequest {
                identity: "alice".to_string(),
                full_name: String::new(),
            },
        })
        .unwrap();

        assert!(matches!(rx.recv().await, Some(ApiResponse::Courses(Ok(c))) if c.is_empty()));
        assert!(matches!(
            rx.recv().await,
            Some(ApiResponse::CheckUser(Ok(CheckUserOutcome::Rejected { .. })))
        ));
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec!["courses".to_string(), "check_user Some(\"db\") alice".to_string()]
        );

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_passes_errors_through() {
        let (tx, mut rx, _handle) = spawn_api_worker(Arc::new(RecordingApi::default()));
        tx.send(ApiRequest::Finalize {
            course: None,
            request: FinalizeRequest {
                identity: "alice".to_string(),
                answers: vec![],
            },
        })
        .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(ApiResponse::Finalize(Err(ApiError::Rejected(_))))
        ));
    }
}
