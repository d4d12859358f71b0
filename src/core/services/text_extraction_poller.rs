use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::core::errors::VisionError;
use crate::core::interfaces::adapters::VisionService;
use crate::core::models::{ExtractedText, ImageBuffer, OperationHandle, ReadStatus, VisionSettings};

/// How long and how often to wait on a read operation.
///
/// `None` bounds mean unbounded; neither bound changes what a successful run returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub poll_interval: Duration,
    pub max_attempts: Option<u32>,
    pub max_wait: Option<Duration>,
}

impl PollPolicy {
    pub fn from_settings(settings: &VisionSettings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            max_attempts: settings.max_poll_attempts(),
            max_wait: settings.max_poll_wait(),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_settings(&VisionSettings::default())
    }
}

/// Sender half of a cancellation pair. Dropping it does not cancel.
#[derive(Debug)]
pub struct CancellationHandle(watch::Sender<bool>);

impl CancellationHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct CancellationSignal(watch::Receiver<bool>);

impl CancellationSignal {
    pub fn pair() -> (CancellationHandle, CancellationSignal) {
        let (sender, receiver) = watch::channel(false);
        (CancellationHandle(sender), CancellationSignal(receiver))
    }

    /// A signal that never fires.
    #[cfg(test)]
    pub fn never() -> CancellationSignal {
        let (_, signal) = Self::pair();
        signal
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancellation is requested; pends forever if the handle is dropped first.
    async fn cancelled(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Drives `future` to completion unless cancellation is requested first.
    pub async fn run_until_cancelled<T, F>(mut self, future: F) -> Result<T, VisionError>
    where
        F: Future<Output = Result<T, VisionError>>,
    {
        if self.is_cancelled() {
            return Err(VisionError::Cancelled);
        }

        tokio::select! {
            result = future => result,
            _ = self.cancelled() => Err(VisionError::Cancelled),
        }
    }
}

pub struct TextExtractionPoller {
    vision_service: Arc<dyn VisionService>,
    policy: PollPolicy,
}

impl TextExtractionPoller {
    pub fn new(vision_service: Arc<dyn VisionService>, policy: PollPolicy) -> Self {
        Self {
            vision_service,
            policy,
        }
    }

    pub async fn extract_text(
        &self,
        image: &ImageBuffer,
        cancellation: CancellationSignal,
    ) -> Result<ExtractedText, VisionError> {
        let handle = cancellation
            .clone()
            .run_until_cancelled(self.vision_service.submit_text_extraction(image))
            .await?;
        log::info!(
            "[READ_POLLER] Submitted {} for text extraction, operation {}",
            image.file_name,
            handle
        );

        self.wait_for_completion(&handle, cancellation).await
    }

    /// Queries the operation until it leaves `notStarted`/`running`, sleeping between queries.
    pub async fn wait_for_completion(
        &self,
        handle: &OperationHandle,
        mut cancellation: CancellationSignal,
    ) -> Result<ExtractedText, VisionError> {
        let started_at = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            if cancellation.is_cancelled() {
                log::info!("[READ_POLLER] Operation {} cancelled", handle);
                return Err(VisionError::Cancelled);
            }

            attempts += 1;
            let operation = cancellation
                .clone()
                .run_until_cancelled(self.vision_service.get_text_extraction_status(handle))
                .await?;

            log::debug!(
                "[READ_POLLER] Operation {} status {} (attempt {})",
                handle,
                operation.status,
                attempts
            );

            match operation.status {
                ReadStatus::Succeeded => {
                    let lines = operation.line_texts();
                    log::info!(
                        "[READ_POLLER] Operation {} succeeded with {} lines after {} checks",
                        handle,
                        lines.len(),
                        attempts
                    );
                    return Ok(ExtractedText { lines });
                }
                status if status.is_in_progress() => {}
                status => {
                    log::error!("[READ_POLLER] Operation {} ended with {}", handle, status);
                    return Err(VisionError::ExtractionFailed { status });
                }
            }

            if self
                .policy
                .max_attempts
                .is_some_and(|max_attempts| attempts >= max_attempts)
            {
                log::warn!(
                    "[READ_POLLER] Giving up on {} after {} status checks",
                    handle,
                    attempts
                );
                return Err(VisionError::PollBudgetExhausted { attempts });
            }

            if self
                .policy
                .max_wait
                .is_some_and(|max_wait| started_at.elapsed() + self.policy.poll_interval > max_wait)
            {
                log::warn!(
                    "[READ_POLLER] Wait budget for {} spent after {} status checks",
                    handle,
                    attempts
                );
                return Err(VisionError::PollBudgetExhausted { attempts });
            }

            tokio::select! {
                _ = tokio::time::sleep(self.policy.poll_interval) => {}
                _ = cancellation.cancelled() => {
                    log::info!("[READ_POLLER] Operation {} cancelled while waiting", handle);
                    return Err(VisionError::Cancelled);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interfaces::adapters::ThumbnailRequest;
    use crate::core::models::{
        AnalysisResult, ReadAnalyzeResult, ReadLine, ReadOperationResult, ReadPage, VisualFeature,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedReadService {
        in_progress_responses: u32,
        final_status: ReadStatus,
        final_lines: Vec<Vec<&'static str>>,
        status_queries: AtomicU32,
        submissions: AtomicU32,
    }

    impl ScriptedReadService {
        fn new(
            in_progress_responses: u32,
            final_status: ReadStatus,
            final_lines: Vec<Vec<&'static str>>,
        ) -> Self {
            Self {
                in_progress_responses,
                final_status,
                final_lines,
                status_queries: AtomicU32::new(0),
                submissions: AtomicU32::new(0),
            }
        }

        fn status_query_count(&self) -> u32 {
            self.status_queries.load(Ordering::SeqCst)
        }

        fn final_response(&self) -> ReadOperationResult {
            let read_results = self
                .final_lines
                .iter()
                .enumerate()
                .map(|(page_index, lines)| ReadPage {
                    page: page_index as u32 + 1,
                    lines: lines
                        .iter()
                        .map(|text| ReadLine {
                            text: text.to_string(),
                            bounding_box: vec![],
                        })
                        .collect(),
                    ..ReadPage::default()
                })
                .collect();

            ReadOperationResult {
                status: self.final_status.clone(),
                analyze_result: Some(ReadAnalyzeResult {
                    version: Some("3.2.0".to_string()),
                    read_results,
                }),
            }
        }
    }

    #[async_trait]
    impl VisionService for ScriptedReadService {
        async fn analyze_image(
            &self,
            _image: &ImageBuffer,
            _features: &[VisualFeature],
        ) -> Result<AnalysisResult, VisionError> {
            unreachable!("poller never analyzes")
        }

        async fn generate_thumbnail(
            &self,
            _image: &ImageBuffer,
            _request: ThumbnailRequest,
        ) -> Result<Vec<u8>, VisionError> {
            unreachable!("poller never requests thumbnails")
        }

        async fn submit_text_extraction(
            &self,
            _image: &ImageBuffer,
        ) -> Result<OperationHandle, VisionError> {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            Ok(OperationHandle::new("op-1"))
        }

        async fn get_text_extraction_status(
            &self,
            handle: &OperationHandle,
        ) -> Result<ReadOperationResult, VisionError> {
            assert_eq!(handle.as_str(), "op-1");
            let query_index = self.status_queries.fetch_add(1, Ordering::SeqCst);

            if query_index == 0 && self.in_progress_responses > 0 {
                return Ok(ReadOperationResult::with_status(ReadStatus::NotStarted));
            }
            if query_index < self.in_progress_responses {
                return Ok(ReadOperationResult::with_status(ReadStatus::Running));
            }
            Ok(self.final_response())
        }
    }

    /// Hangs on submit or on the first status query, like a request stuck on the network.
    struct StalledReadService {
        stall_submit: bool,
    }

    #[async_trait]
    impl VisionService for StalledReadService {
        async fn analyze_image(
            &self,
            _image: &ImageBuffer,
            _features: &[VisualFeature],
        ) -> Result<AnalysisResult, VisionError> {
            unreachable!("poller never analyzes")
        }

        async fn generate_thumbnail(
            &self,
            _image: &ImageBuffer,
            _request: ThumbnailRequest,
        ) -> Result<Vec<u8>, VisionError> {
            unreachable!("poller never requests thumbnails")
        }

        async fn submit_text_extraction(
            &self,
            _image: &ImageBuffer,
        ) -> Result<OperationHandle, VisionError> {
            if self.stall_submit {
                std::future::pending::<()>().await;
            }
            Ok(OperationHandle::new("op-stalled"))
        }

        async fn get_text_extraction_status(
            &self,
            _handle: &OperationHandle,
        ) -> Result<ReadOperationResult, VisionError> {
            std::future::pending::<()>().await;
            Ok(ReadOperationResult::with_status(ReadStatus::Running))
        }
    }

    fn test_image() -> ImageBuffer {
        let mut encoded = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(2, 2))
            .write_to(
                &mut std::io::Cursor::new(&mut encoded),
                image::ImageFormat::Png,
            )
            .unwrap();
        ImageBuffer::build_from_encoded_bytes("text.png", encoded).unwrap()
    }

    fn fast_policy() -> PollPolicy {
        PollPolicy {
            poll_interval: Duration::from_millis(1),
            max_attempts: None,
            max_wait: None,
        }
    }

    #[tokio::test]
    async fn test_running_n_times_then_succeeded_queries_n_plus_one_times() {
        let service = Arc::new(ScriptedReadService::new(
            4,
            ReadStatus::Succeeded,
            vec![vec!["Hello", "World"]],
        ));
        let poller = TextExtractionPoller::new(service.clone(), fast_policy());

        let extracted = poller
            .extract_text(&test_image(), CancellationSignal::never())
            .await
            .unwrap();

        assert_eq!(service.status_query_count(), 5);
        assert_eq!(service.submissions.load(Ordering::SeqCst), 1);
        assert_eq!(extracted.lines, vec!["Hello", "World"]);
    }

    #[tokio::test]
    async fn test_lines_come_back_in_page_then_line_order() {
        let service = Arc::new(ScriptedReadService::new(
            0,
            ReadStatus::Succeeded,
            vec![vec!["b", "a"], vec!["a", "c"]],
        ));
        let poller = TextExtractionPoller::new(service.clone(), fast_policy());

        let extracted = poller
            .extract_text(&test_image(), CancellationSignal::never())
            .await
            .unwrap();

        assert_eq!(service.status_query_count(), 1);
        assert_eq!(extracted.lines, vec!["b", "a", "a", "c"]);
    }

    #[tokio::test]
    async fn test_repeated_queries_of_succeeded_operation_return_same_lines() {
        let service = Arc::new(ScriptedReadService::new(
            0,
            ReadStatus::Succeeded,
            vec![vec!["Total", "42.00"]],
        ));
        let poller = TextExtractionPoller::new(service.clone(), fast_policy());
        let handle = OperationHandle::new("op-1");

        let first = poller
            .wait_for_completion(&handle, CancellationSignal::never())
            .await
            .unwrap();
        let second = poller
            .wait_for_completion(&handle, CancellationSignal::never())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(service.status_query_count(), 2);
    }

    #[tokio::test]
    async fn test_succeeded_with_no_lines_is_an_empty_success() {
        let service = Arc::new(ScriptedReadService::new(1, ReadStatus::Succeeded, vec![]));
        let poller = TextExtractionPoller::new(service, fast_policy());

        let extracted = poller
            .extract_text(&test_image(), CancellationSignal::never())
            .await
            .unwrap();

        assert!(extracted.is_empty());
    }

    #[tokio::test]
    async fn test_failed_operation_is_reported_as_extraction_failure() {
        let service = Arc::new(ScriptedReadService::new(
            2,
            ReadStatus::Failed,
            vec![vec!["ignored"]],
        ));
        let poller = TextExtractionPoller::new(service.clone(), fast_policy());

        let result = poller
            .extract_text(&test_image(), CancellationSignal::never())
            .await;

        assert!(matches!(
            result,
            Err(VisionError::ExtractionFailed {
                status: ReadStatus::Failed
            })
        ));
        assert_eq!(service.status_query_count(), 3);
    }

    #[tokio::test]
    async fn test_unknown_terminal_status_is_a_failure() {
        let service = Arc::new(ScriptedReadService::new(
            0,
            ReadStatus::Unknown("cancelled".to_string()),
            vec![],
        ));
        let poller = TextExtractionPoller::new(service, fast_policy());

        let result = poller
            .extract_text(&test_image(), CancellationSignal::never())
            .await;

        assert!(matches!(
            result,
            Err(VisionError::ExtractionFailed {
                status: ReadStatus::Unknown(_)
            })
        ));
    }

    #[tokio::test]
    async fn test_attempt_budget_stops_polling() {
        let service = Arc::new(ScriptedReadService::new(
            100,
            ReadStatus::Succeeded,
            vec![vec!["never seen"]],
        ));
        let policy = PollPolicy {
            max_attempts: Some(3),
            ..fast_policy()
        };
        let poller = TextExtractionPoller::new(service.clone(), policy);

        let result = poller
            .extract_text(&test_image(), CancellationSignal::never())
            .await;

        assert!(matches!(
            result,
            Err(VisionError::PollBudgetExhausted { attempts: 3 })
        ));
        assert_eq!(service.status_query_count(), 3);
    }

    #[tokio::test]
    async fn test_attempt_budget_does_not_change_success_path() {
        let service = Arc::new(ScriptedReadService::new(
            2,
            ReadStatus::Succeeded,
            vec![vec!["made it"]],
        ));
        let policy = PollPolicy {
            max_attempts: Some(3),
            ..fast_policy()
        };
        let poller = TextExtractionPoller::new(service.clone(), policy);

        let extracted = poller
            .extract_text(&test_image(), CancellationSignal::never())
            .await
            .unwrap();

        assert_eq!(extracted.lines, vec!["made it"]);
        assert_eq!(service.status_query_count(), 3);
    }

    #[tokio::test]
    async fn test_wait_budget_stops_polling() {
        let service = Arc::new(ScriptedReadService::new(
            100,
            ReadStatus::Succeeded,
            vec![],
        ));
        let policy = PollPolicy {
            poll_interval: Duration::from_millis(50),
            max_attempts: None,
            max_wait: Some(Duration::from_millis(10)),
        };
        let poller = TextExtractionPoller::new(service.clone(), policy);

        let result = poller
            .extract_text(&test_image(), CancellationSignal::never())
            .await;

        assert!(matches!(
            result,
            Err(VisionError::PollBudgetExhausted { attempts: 1 })
        ));
    }

    #[tokio::test]
    async fn test_cancel_before_submit_skips_the_service() {
        let service = Arc::new(ScriptedReadService::new(0, ReadStatus::Succeeded, vec![]));
        let poller = TextExtractionPoller::new(service.clone(), fast_policy());
        let (handle, signal) = CancellationSignal::pair();
        handle.cancel();

        let result = poller.extract_text(&test_image(), signal).await;

        assert!(matches!(result, Err(VisionError::Cancelled)));
        assert_eq!(service.submissions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_the_wait() {
        let service = Arc::new(ScriptedReadService::new(
            1_000,
            ReadStatus::Succeeded,
            vec![],
        ));
        let policy = PollPolicy {
            poll_interval: Duration::from_secs(60),
            max_attempts: None,
            max_wait: None,
        };
        let poller = TextExtractionPoller::new(service.clone(), policy);
        let (handle, signal) = CancellationSignal::pair();

        let cancel_later = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        };
        let image = test_image();
        let (result, _) = tokio::join!(poller.extract_text(&image, signal), cancel_later);

        assert!(matches!(result, Err(VisionError::Cancelled)));
        assert_eq!(service.status_query_count(), 1);
    }

    #[tokio::test]
    async fn test_cancel_abandons_a_submit_that_never_answers() {
        let service = Arc::new(StalledReadService {
            stall_submit: true,
        });
        let poller = TextExtractionPoller::new(service, fast_policy());
        let (handle, signal) = CancellationSignal::pair();

        let cancel_later = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        };
        let image = test_image();
        let (result, _) = tokio::join!(poller.extract_text(&image, signal), cancel_later);

        assert!(matches!(result, Err(VisionError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_abandons_a_status_query_that_never_answers() {
        let service = Arc::new(StalledReadService {
            stall_submit: false,
        });
        let poller = TextExtractionPoller::new(service, fast_policy());
        let (handle, signal) = CancellationSignal::pair();

        let cancel_later = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        };
        let image = test_image();
        let (result, _) = tokio::join!(poller.extract_text(&image, signal), cancel_later);

        assert!(matches!(result, Err(VisionError::Cancelled)));
    }

    #[tokio::test]
    async fn test_run_until_cancelled_passes_through_result() {
        let result = CancellationSignal::never()
            .run_until_cancelled(async { Ok::<_, VisionError>(7) })
            .await;

        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_run_until_cancelled_abandons_pending_future() {
        let (handle, signal) = CancellationSignal::pair();

        let cancel_later = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        };
        let slow_request = signal.run_until_cancelled(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, VisionError>(())
        });
        let (result, _) = tokio::join!(slow_request, cancel_later);

        assert!(matches!(result, Err(VisionError::Cancelled)));
    }

    #[test]
    fn test_default_policy_polls_every_second_with_bounds() {
        let policy = PollPolicy::default();

        assert_eq!(policy.poll_interval, Duration::from_secs(1));
        assert!(policy.max_attempts.is_some());
        assert!(policy.max_wait.is_some());
    }
}
