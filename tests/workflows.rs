use std::sync::{Arc, Mutex};
use std::time::Duration;

use recruit_client::workflow::{
    Phase, ScreenWorkflow, SearchWorkflow, StateSink, TailorWorkflow, UploadWorkflow,
    WorkflowEvent,
};
use recruit_client::{Endpoint, ResumeFile, ResumeSource, ServiceClient};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingSink {
    events: Arc<Mutex<Vec<WorkflowEvent>>>,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn take(&self) -> Vec<WorkflowEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    fn phases(&self) -> Vec<Phase> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                WorkflowEvent::Phase(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }

    fn failures(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                WorkflowEvent::Failure(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl StateSink for RecordingSink {
    fn emit(&self, event: WorkflowEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn client_for(server: &MockServer) -> Arc<ServiceClient> {
    Arc::new(ServiceClient::new(Endpoint::new(&server.uri())).expect("client"))
}

fn pdf_file(name: &str) -> ResumeFile {
    ResumeFile::new(name, b"%PDF-1.4 stub".to_vec())
}

fn upload_response() -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({
        "filename": "jane.pdf",
        "chunks_processed": 4,
        "message": "Successfully processed jane.pdf"
    }))
}

#[tokio::test]
async fn upload_workflow_walks_through_the_phases() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(upload_response())
        .mount(&server)
        .await;

    let workflow = UploadWorkflow::new(client_for(&server));
    let sink = RecordingSink::new();
    workflow.subscribe(sink.clone());

    workflow.submit(pdf_file("jane.pdf")).await;

    assert_eq!(
        sink.phases(),
        vec![Phase::Validating, Phase::InFlight, Phase::Succeeded]
    );
    let state = workflow.snapshot();
    assert_eq!(state.phase, Phase::Succeeded);
    assert_eq!(state.result.unwrap().chunks_processed, 4);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn upload_workflow_blocks_wrong_file_type_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = UploadWorkflow::new(client_for(&server));
    let sink = RecordingSink::new();
    workflow.subscribe(sink.clone());

    workflow.submit(ResumeFile::new("notes.txt", vec![1])).await;

    let state = workflow.snapshot();
    assert_eq!(state.phase, Phase::Failed);
    assert!(state.result.is_none());
    assert!(state.error.unwrap().contains("Only PDF files are supported"));
    assert_eq!(sink.failures().len(), 1);
    assert!(!sink.phases().contains(&Phase::InFlight));
    server.verify().await;
}

#[tokio::test]
async fn upload_workflow_can_retry_after_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(upload_response())
        .expect(1)
        .mount(&server)
        .await;

    let workflow = UploadWorkflow::new(client_for(&server));
    workflow.submit(ResumeFile::new("notes.txt", vec![1])).await;
    assert_eq!(workflow.snapshot().phase, Phase::Failed);

    workflow.submit(pdf_file("jane.pdf")).await;
    assert_eq!(workflow.snapshot().phase, Phase::Succeeded);
    server.verify().await;
}

#[tokio::test]
async fn upload_workflow_ignores_a_submission_while_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(upload_response().set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;

    let workflow = Arc::new(UploadWorkflow::new(client_for(&server)));
    let background = workflow.clone();
    let handle = tokio::spawn(async move { background.submit(pdf_file("jane.pdf")).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    workflow.submit(pdf_file("other.pdf")).await;

    handle.await.expect("join");
    assert_eq!(workflow.snapshot().phase, Phase::Succeeded);
    server.verify().await;
}

#[tokio::test]
async fn upload_workflow_reset_discards_a_pending_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(upload_response().set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let workflow = Arc::new(UploadWorkflow::new(client_for(&server)));
    let background = workflow.clone();
    let handle = tokio::spawn(async move { background.submit(pdf_file("jane.pdf")).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    workflow.reset();
    handle.await.expect("join");

    let state = workflow.snapshot();
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.result.is_none());
    assert!(state.error.is_none());
}

#[tokio::test]
async fn search_workflow_treats_an_empty_result_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search_candidates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "count": 0,
            "message": "No resumes found in the database"
        })))
        .mount(&server)
        .await;

    let workflow = SearchWorkflow::new(client_for(&server));
    let sink = RecordingSink::new();
    workflow.subscribe(sink.clone());

    workflow.submit("any role").await;

    let state = workflow.snapshot();
    assert_eq!(state.phase, Phase::Succeeded);
    assert!(state.outcome.unwrap().is_empty());
    assert!(sink.failures().is_empty());
    let notices: Vec<_> = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            WorkflowEvent::Notice(message) => Some(message),
            _ => None,
        })
        .collect();
    assert_eq!(notices, vec!["No resumes found in the database"]);
}

#[tokio::test]
async fn search_workflow_candidate_preview_is_a_local_transition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search_candidates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "rank": 1, "score": 90, "filename": "a.pdf", "reasoning": "fit" },
                { "rank": 2, "score": 80, "filename": "b.pdf", "reasoning": "ok" }
            ],
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let workflow = SearchWorkflow::new(client_for(&server));
    workflow.submit("any role").await;

    let selected = workflow.select_candidate(2).expect("candidate exists");
    assert_eq!(selected.filename, "b.pdf");
    assert_eq!(workflow.snapshot().preview.unwrap().rank, 2);

    workflow.close_preview();
    let state = workflow.snapshot();
    assert!(state.preview.is_none());
    assert_eq!(state.outcome.unwrap().count, 2);

    assert!(workflow.select_candidate(9).is_none());
    server.verify().await;
}

#[tokio::test]
async fn search_workflow_blocks_empty_input_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = SearchWorkflow::new(client_for(&server));
    let sink = RecordingSink::new();
    workflow.subscribe(sink.clone());

    workflow.submit("  ").await;

    assert_eq!(workflow.snapshot().phase, Phase::Failed);
    assert_eq!(sink.failures(), vec!["Please enter a job description"]);
    server.verify().await;
}

#[tokio::test]
async fn screen_workflow_requires_both_inputs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = ScreenWorkflow::new(client_for(&server));
    let sink = RecordingSink::new();
    workflow.subscribe(sink.clone());

    workflow.submit("a job description", "").await;

    assert_eq!(workflow.snapshot().phase, Phase::Failed);
    assert_eq!(
        sink.failures(),
        vec!["Please select a resume from your library"]
    );
    server.verify().await;
}

#[tokio::test]
async fn screen_workflow_holds_the_result_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/screen_candidate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "score": 67,
            "match_status": "Moderate Match",
            "missing_skills": ["GraphQL"],
            "reasoning": "Partial overlap with the requirements.",
            "resume_filename": "jane.pdf"
        })))
        .mount(&server)
        .await;

    let workflow = ScreenWorkflow::new(client_for(&server));
    workflow.submit("a job description", "jane.pdf").await;

    let state = workflow.snapshot();
    assert_eq!(state.phase, Phase::Succeeded);
    let result = state.result.unwrap();
    assert_eq!(result.score, 67);
    assert_eq!(result.tier, recruit_client::MatchTier::Moderate);
}

#[tokio::test]
async fn tailor_workflow_previews_then_exports() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tailor_resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tailored_text": "Jane Doe, tailored"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate_pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let workflow = TailorWorkflow::new(client_for(&server));
    workflow.set_job_description("Senior Python Developer");
    workflow.set_source(Some(ResumeSource::Library("jane.pdf".into())));

    workflow.generate_preview().await;
    let state = workflow.snapshot();
    assert!(state.preview_ready());
    assert_eq!(state.draft.as_ref().unwrap().tailored_text, "Jane Doe, tailored");

    let bytes = workflow.export_pdf().await.expect("pdf bytes");
    assert_eq!(bytes, b"%PDF-1.7");
    assert_eq!(workflow.snapshot().phase, Phase::Succeeded);
    server.verify().await;
}

#[tokio::test]
async fn tailor_workflow_export_requires_a_preview() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = TailorWorkflow::new(client_for(&server));
    let sink = RecordingSink::new();
    workflow.subscribe(sink.clone());

    assert!(workflow.export_pdf().await.is_none());
    assert_eq!(workflow.snapshot().phase, Phase::Failed);
    assert_eq!(sink.failures(), vec!["No preview to download"]);
    server.verify().await;
}

#[tokio::test]
async fn tailor_workflow_editing_inputs_discards_the_preview() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tailor_resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tailored_text": "tailored"
        })))
        .mount(&server)
        .await;

    let workflow = TailorWorkflow::new(client_for(&server));
    workflow.set_job_description("a role");
    workflow.set_source(Some(ResumeSource::Library("jane.pdf".into())));
    workflow.generate_preview().await;
    assert!(workflow.snapshot().preview_ready());

    workflow.set_job_description("a different role");
    let state = workflow.snapshot();
    assert!(!state.preview_ready());
    assert_eq!(state.phase, Phase::Idle);
}

#[tokio::test]
async fn tailor_workflow_switching_source_discards_the_preview() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tailor_resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tailored_text": "tailored"
        })))
        .mount(&server)
        .await;

    let workflow = TailorWorkflow::new(client_for(&server));
    workflow.set_job_description("a role");
    workflow.set_source(Some(ResumeSource::Library("jane.pdf".into())));
    workflow.generate_preview().await;
    assert!(workflow.snapshot().preview_ready());

    workflow.set_source(Some(ResumeSource::Upload(pdf_file("local.pdf"))));
    assert!(!workflow.snapshot().preview_ready());
    assert_eq!(workflow.snapshot().phase, Phase::Idle);
}

#[tokio::test]
async fn tailor_workflow_requires_a_resume_source() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = TailorWorkflow::new(client_for(&server));
    let sink = RecordingSink::new();
    workflow.subscribe(sink.clone());
    workflow.set_job_description("a role");

    workflow.generate_preview().await;

    assert_eq!(workflow.snapshot().phase, Phase::Failed);
    assert_eq!(sink.failures().len(), 1);
    server.verify().await;
}
