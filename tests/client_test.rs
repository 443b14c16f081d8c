mod common;

use std::sync::Arc;

use tokio::net::TcpListener;

use common::{complete_form, test_config, SUPER_EMAIL, SUPER_PASSWORD};
use teacher_recruitment::client::session::{FileSessionStorage, MemorySessionStorage};
use teacher_recruitment::client::{
    AdminSessionStore, ApiClient, ClientError, ReviewClient, SubmissionClient,
};
use teacher_recruitment::dashboard::{Dashboard, StatusFilter};
use teacher_recruitment::models::admin::AdminRole;
use teacher_recruitment::models::application::ApplicationStatus;
use teacher_recruitment::{routes, AppState};

struct Server {
    base_url: String,
    state: AppState,
    _uploads: tempfile::TempDir,
}

async fn spawn_server() -> Server {
    let uploads = tempfile::tempdir().expect("tempdir");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let base_url = format!("http://{}", addr);

    let mut config = test_config(uploads.path(), 100);
    config.public_base_url = base_url.clone();
    let state = AppState::in_memory(config).expect("state");
    state
        .admin_service
        .ensure_bootstrap(SUPER_EMAIL, SUPER_PASSWORD)
        .await
        .expect("bootstrap admin");

    let app = routes::router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });

    Server {
        base_url,
        state,
        _uploads: uploads,
    }
}

#[tokio::test]
async fn applicant_submits_and_admin_reviews_over_http() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.base_url).unwrap();
    let schema = Arc::new(server.state.application_service.schema().clone());

    let submitter = SubmissionClient::new(api.clone(), schema.clone());
    let resp = submitter.submit(&complete_form(&schema)).await.unwrap();
    assert_eq!(resp.status, "success");

    let stored = server.state.application_service.get(resp.id).await.unwrap();
    let video_url = stored.video_url.clone().unwrap();
    assert!(video_url.starts_with(&server.base_url));
    let video = reqwest::get(&video_url).await.unwrap().bytes().await.unwrap();
    assert_eq!(video.as_ref(), common::webm_bytes().as_slice());

    let sessions = tempfile::tempdir().unwrap();
    let mut store = AdminSessionStore::init(FileSessionStorage::new(sessions.path()));
    assert!(!store.login(&api, SUPER_EMAIL, "wrong-password").await.unwrap());
    assert!(!store.is_authenticated());
    assert!(store.login(&api, SUPER_EMAIL, SUPER_PASSWORD).await.unwrap());

    let review = ReviewClient::new(api.clone());
    let mut dashboard = Dashboard::open(review.clone(), &store).await.unwrap();
    assert!(dashboard.can_create_admin());
    assert_eq!(dashboard.counts().pending, 1);
    assert_eq!(dashboard.records()[0].id, resp.id);

    assert!(dashboard.approve(resp.id).await);
    assert_eq!(dashboard.counts().approved, 1);
    dashboard.filter = StatusFilter::Only(ApplicationStatus::Pending);
    assert!(dashboard.visible().is_empty());

    // already reviewed: refused locally and by the server
    assert!(!dashboard.reject(resp.id).await);
    let session = store.require_session().unwrap();
    assert!(
        !review
            .set_status(session, resp.id, ApplicationStatus::Rejected)
            .await
    );
    let record = review.get_application(session, resp.id).await.unwrap();
    assert_eq!(record.status, ApplicationStatus::Approved);
    assert_eq!(record.reviewed_by.as_deref(), Some(SUPER_EMAIL));

    let stats = review.stats(session).await.unwrap();
    assert_eq!(stats.counts.total, 1);
    assert_eq!(stats.counts.approved, 1);

    // a restarted dashboard picks up the stored session
    let reopened = AdminSessionStore::init(FileSessionStorage::new(sessions.path()));
    assert_eq!(reopened.current(), store.current());
}

#[tokio::test]
async fn super_admin_manages_admins() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.base_url).unwrap();
    let review = ReviewClient::new(api.clone());

    let mut store = AdminSessionStore::init(MemorySessionStorage::new());
    assert!(store.login(&api, SUPER_EMAIL, SUPER_PASSWORD).await.unwrap());
    let dashboard = Dashboard::open(review.clone(), &store).await.unwrap();

    assert!(
        dashboard
            .create_admin("reviewer@whaot.example", "reviewer-pass", AdminRole::Admin)
            .await
    );
    assert!(
        !dashboard
            .create_admin("reviewer@whaot.example", "reviewer-pass", AdminRole::Admin)
            .await
    );
    let admins = review.list_admins(store.require_session().unwrap()).await.unwrap();
    assert_eq!(admins.len(), 2);

    let mut reviewer_store = AdminSessionStore::init(MemorySessionStorage::new());
    assert!(reviewer_store
        .login(&api, "reviewer@whaot.example", "reviewer-pass")
        .await
        .unwrap());
    let reviewer_dashboard = Dashboard::open(review.clone(), &reviewer_store).await.unwrap();
    assert!(!reviewer_dashboard.can_create_admin());
    assert!(
        !reviewer_dashboard
            .create_admin("x@whaot.example", "password1", AdminRole::Admin)
            .await
    );

    let forbidden = review
        .list_admins(reviewer_store.require_session().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(forbidden, ClientError::Server { status: 403, .. }));
}

#[tokio::test]
async fn dashboard_requires_a_session() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.base_url).unwrap();
    let store = AdminSessionStore::init(MemorySessionStorage::new());

    let err = Dashboard::open(ReviewClient::new(api), &store)
        .await
        .err()
        .expect("no session");
    assert!(matches!(err, ClientError::NotAuthenticated));
}

#[tokio::test]
async fn server_side_validation_surfaces_as_server_error() {
    let server = spawn_server().await;
    let api = ApiClient::new(&server.base_url).unwrap();
    let schema = Arc::new(server.state.application_service.schema().clone());
    let client = SubmissionClient::new(api, schema.clone());

    let mut form = complete_form(&schema);
    form.set_list("subjects", ["Underwater Basket Weaving"]);

    match client.send(&form).await {
        Err(ClientError::Server { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("subjects"));
        }
        other => panic!("expected server error, got {:?}", other),
    }
}
