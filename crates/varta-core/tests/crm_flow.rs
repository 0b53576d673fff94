//! End-to-end operator flow against a mock backend: login, dashboard,
//! contact lifecycle, campaign creation, forced logout.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use varta_core::{
    filter_contacts, CampaignStatus, CampaignUpload, ContactRequest, CrmClient, SessionStore,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "e2e-token";

fn contact_json(name: &str) -> Value {
    json!({"id": "c-100", "name": name, "phone": "1234567890", "tags": [], "metadata": {}})
}

async fn mount_contact_list(server: &MockServer, contacts: Value) {
    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(contacts))
        .mount(server)
        .await;
}

async fn logged_in(server: &MockServer, store: SessionStore) -> CrmClient {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": TOKEN,
            "user": {"id": "u-1", "username": "admin", "role": "ADMIN", "clientId": "tenant-1"}
        })))
        .mount(server)
        .await;

    let client = CrmClient::new(server.uri(), store).unwrap();
    client.login("admin", "password").await.unwrap();
    client
}

#[tokio::test]
async fn login_then_dashboard_stats() {
    let server = MockServer::start().await;
    let client = logged_in(&server, SessionStore::in_memory()).await;

    Mock::given(method("GET"))
        .and(path("/dashboard/stats"))
        .and(header("X-Client-Id", "tenant-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalContacts": 3,
            "activeCampaigns": 1,
            "messagesSent": 10,
            "failedMessages": 0,
            "recentCampaigns": []
        })))
        .mount(&server)
        .await;

    let stats = client.dashboard_stats().await.unwrap();
    let titles: Vec<_> = stats.cards().iter().map(|(title, _)| *title).collect();
    assert_eq!(
        titles,
        vec!["Total Contacts", "Active Campaigns", "Messages Sent", "Failed Messages"]
    );
}

#[tokio::test]
async fn contact_create_update_delete() {
    let server = MockServer::start().await;
    let client = logged_in(&server, SessionStore::in_memory()).await;

    Mock::given(method("POST"))
        .and(path("/contacts"))
        .and(body_json(json!({"name": "Cypress Test User", "phone": "1234567890", "metadata": {}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(contact_json("Cypress Test User")))
        .expect(1)
        .mount(&server)
        .await;
    mount_contact_list(&server, json!([contact_json("Cypress Test User")])).await;

    let req = ContactRequest::from_form("Cypress Test User", "1234567890", None).unwrap();
    let created = client.create_contact(&req).await.unwrap();
    let list = client.list_contacts().await.unwrap();
    assert_eq!(filter_contacts(&list, "cypress test").len(), 1);

    server.reset().await;
    Mock::given(method("PUT"))
        .and(path("/contacts/c-100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(contact_json("Cypress Updated")))
        .expect(1)
        .mount(&server)
        .await;
    mount_contact_list(&server, json!([contact_json("Cypress Updated")])).await;

    let req = ContactRequest::from_form("Cypress Updated", "1234567890", None).unwrap();
    client.update_contact(&created.id, &req).await.unwrap();
    let names: Vec<_> = client
        .list_contacts()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Cypress Updated"]);

    server.reset().await;
    Mock::given(method("DELETE"))
        .and(path("/contacts/c-100"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    mount_contact_list(&server, json!([])).await;

    client.delete_contact(&created.id).await.unwrap();
    let list = client.list_contacts().await.unwrap();
    assert!(filter_contacts(&list, "Cypress").is_empty());
}

#[tokio::test]
async fn campaign_creation_appears_in_history() {
    let server = MockServer::start().await;
    let client = logged_in(&server, SessionStore::in_memory()).await;

    Mock::given(method("POST"))
        .and(path("/campaigns/upload-csv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "k-1",
            "name": "Cypress Campaign",
            "status": "PENDING"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "k-1",
            "name": "Cypress Campaign",
            "status": "RUNNING",
            "createdAt": "2025-03-01T09:00:00Z",
            "totalContacts": 2,
            "processedContacts": 1
        }])))
        .mount(&server)
        .await;

    let upload = CampaignUpload::new(
        "Cypress Campaign",
        "t-1",
        "contacts.csv",
        b"name,phone\nA,1234567890\nB,1234567891\n".to_vec(),
    )
    .unwrap()
    .uploaded_by_user(client.session().user().map(|u| u.id));

    let created = client.create_campaign(upload).await.unwrap();
    assert_eq!(created.id, "k-1");

    let history = client.list_campaigns().await.unwrap();
    let campaign = history.iter().find(|c| c.id == created.id).unwrap();
    assert!(matches!(
        campaign.status,
        CampaignStatus::Pending | CampaignStatus::Running | CampaignStatus::Completed
    ));
    assert_eq!(campaign.schedule_label(), "Immediate");
    assert!((campaign.progress_percent() - 50.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn expired_token_logs_out_persisted_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    let client = logged_in(&server, SessionStore::at(&session_path)).await;
    assert!(session_path.exists());

    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut rx = client.session().subscribe();
    rx.borrow_and_update();

    let err = client.list_templates().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!session_path.exists());
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow().is_none());
    assert!(SessionStore::open(&session_path).current().is_none());
}
