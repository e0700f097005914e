//! Integration tests for redfish-client
//!
//! Vendor dialects are driven through the recording `MockTransport`, so the
//! tests can assert exactly which requests went out. The generic flow runs
//! against `MockBmc` over real HTTP.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use redfish_client::redfish_core::{AccountRequest, Manager};
use redfish_client::testing::MockBmc;
use redfish_client::transport::{HttpResponse, MockTransport};
use redfish_client::{ClientConfig, ErrorKind, Flavor, RedfishClient, RedfishClientError};
use reqwest::Method;
use serde_json::{json, Value};

const SESSIONS: &str = "/redfish/v1/SessionService/Sessions";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Fixtures
// =============================================================================

fn service_root() -> Value {
    json!({
        "@odata.id": "/redfish/v1/",
        "RedfishVersion": "1.6.0",
        "AccountService": {"@odata.id": "/redfish/v1/AccountService"},
        "Chassis": {"@odata.id": "/redfish/v1/Chassis"},
        "Managers": {"@odata.id": "/redfish/v1/Managers"},
        "SessionService": {"@odata.id": "/redfish/v1/SessionService"},
        "Systems": {"@odata.id": "/redfish/v1/Systems"},
        "Links": {"Sessions": {"@odata.id": SESSIONS}}
    })
}

fn session_created() -> HttpResponse {
    HttpResponse::new(201)
        .with_header("X-Auth-Token", "token-1")
        .with_header("Location", "/redfish/v1/SessionService/Sessions/1")
}

/// A service processor whose only system is `system`
fn bmc_with_system(system: Value) -> Arc<MockTransport> {
    let mock = Arc::new(MockTransport::new());
    mock.on_get_json("/redfish/v1/", service_root())
        .on(Method::POST, SESSIONS, session_created())
        .on(
            Method::DELETE,
            "/redfish/v1/SessionService/Sessions/1",
            HttpResponse::new(204),
        )
        .on_get_json(
            "/redfish/v1/Systems",
            json!({"Members": [{"@odata.id": "/redfish/v1/Systems/1"}]}),
        )
        .on_get_json("/redfish/v1/Systems/1", system)
        .on_get_json(
            "/redfish/v1/Managers",
            json!({"Members": [{"@odata.id": "/redfish/v1/Managers/1"}]}),
        );
    mock
}

fn config() -> ClientConfig {
    ClientConfig::builder("bmc01")
        .credentials("admin", "secret")
        .build()
}

async fn connected(mock: &Arc<MockTransport>) -> RedfishClient {
    let mut client = RedfishClient::with_transport(config(), mock.clone());
    client.connect().await.unwrap();
    client
}

fn pem() -> &'static str {
    "-----BEGIN CERTIFICATE-----\nMIIC2jCCAcKgAwIBAgIJAN\n-----END CERTIFICATE-----\n"
}

// =============================================================================
// Flavor resolution and the capability gate
// =============================================================================

#[tokio::test]
async fn test_flavor_resolution_is_memoized() {
    init_tracing();
    let mock = bmc_with_system(json!({"Id": "1", "Manufacturer": "Contoso"}));
    let mut client = connected(&mock).await;

    assert_eq!(client.resolve_flavor().await.unwrap(), Flavor::Generic);
    let after_first = mock.request_count();

    assert_eq!(client.resolve_flavor().await.unwrap(), Flavor::Generic);
    assert_eq!(client.flavor(), Flavor::Generic);
    assert_eq!(mock.request_count(), after_first);
}

#[tokio::test]
async fn test_hp_hpe_disambiguated_by_oem_key() {
    let mock = bmc_with_system(json!({"Manufacturer": "HPE", "Oem": {"Hp": {"PostState": "FinishedPost"}}}));
    let mut client = connected(&mock).await;
    assert_eq!(client.resolve_flavor().await.unwrap(), Flavor::Hp);

    let mock = bmc_with_system(json!({"Manufacturer": "HP", "Oem": {"Hpe": {}}}));
    let mut client = connected(&mock).await;
    assert_eq!(client.resolve_flavor().await.unwrap(), Flavor::Hpe);
}

#[tokio::test]
async fn test_hp_ambiguous_oem_is_integrity_error() {
    let mock = bmc_with_system(json!({"Manufacturer": "HPE", "Oem": {"Hp": {}, "Hpe": {}}}));
    let mut client = connected(&mock).await;
    let err = client.resolve_flavor().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
    assert!(err.to_string().starts_with("BUG: "));
    assert_eq!(client.flavor(), Flavor::Uninitialized);

    let mock = bmc_with_system(json!({"Manufacturer": "HPE"}));
    let mut client = connected(&mock).await;
    let err = client.resolve_flavor().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[tokio::test]
async fn test_account_operations_gated_without_requests() {
    for manufacturer in ["Inspur", "Lenovo"] {
        let mock = bmc_with_system(json!({"Manufacturer": manufacturer}));
        let mut client = connected(&mock).await;
        let flavor = client.resolve_flavor().await.unwrap();
        mock.clear_requests();

        let err = client
            .create_account(&AccountRequest::new("ops", "s3cret").with_role("Operator"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, RedfishClientError::Unsupported { flavor: f, .. } if f == flavor),
            "{}: {}",
            manufacturer,
            err
        );

        let err = client.delete_account("ops").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
        let err = client.change_password("ops", "n3w").await.unwrap_err();
        assert!(matches!(err, RedfishClientError::Unsupported { .. }));

        assert_eq!(mock.request_count(), 0, "{} sent requests", manufacturer);
    }
}

#[tokio::test]
async fn test_license_gated_for_lenovo() {
    let mock = bmc_with_system(json!({"Manufacturer": "Lenovo"}));
    let mut client = connected(&mock).await;
    client.set_flavor(Flavor::Lenovo);
    mock.clear_requests();

    let err = client
        .install_license(&Manager::default(), "35DPH-SVSXJ-HGBJN-C7N5R-2SS4W")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "License management is not supported for vendor flavor lenovo"
    );
    assert!(client.get_license(&Manager::default()).await.is_err());
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_roles_gated_for_privilege_map_flavors() {
    let mock = bmc_with_system(json!({"Manufacturer": "HPE", "Oem": {"Hpe": {}}}));
    let mut client = connected(&mock).await;
    assert_eq!(client.resolve_flavor().await.unwrap(), Flavor::Hpe);
    mock.clear_requests();

    let err = client.list_roles().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Role listing is not supported for vendor flavor hpe"
    );
    assert!(client.map_roles_by_name().await.is_err());
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_operations_need_session() {
    let mock = bmc_with_system(json!({"Manufacturer": "Contoso"}));
    let mut client = RedfishClient::with_transport(config(), mock.clone());
    client.discover().await.unwrap();

    let err = client.list_systems().await.unwrap_err();
    assert!(matches!(err, RedfishClientError::NotAuthenticated));
    let err = client
        .create_account(&AccountRequest::new("ops", "pw").with_role("Operator"))
        .await
        .unwrap_err();
    assert!(matches!(err, RedfishClientError::NotAuthenticated));
    assert_eq!(client.flavor(), Flavor::Uninitialized);
}

// =============================================================================
// Dell account slots
// =============================================================================

/// iDRAC with one account slot per entry of `users`, "" marking an unused slot
fn dell_bmc(users: &[&str]) -> Arc<MockTransport> {
    let mock = bmc_with_system(json!({"Manufacturer": "Dell Inc."}));
    mock.on_get_json(
        "/redfish/v1/AccountService",
        json!({
            "Accounts": {"@odata.id": "/redfish/v1/AccountService/Accounts"},
            "Roles": {"@odata.id": "/redfish/v1/AccountService/Roles"}
        }),
    )
    .on_get_json(
        "/redfish/v1/AccountService/Roles",
        json!({"Members": [
            {"@odata.id": "/redfish/v1/AccountService/Roles/Administrator"},
            {"@odata.id": "/redfish/v1/AccountService/Roles/Operator"}
        ]}),
    )
    .on_get_json(
        "/redfish/v1/AccountService/Roles/Administrator",
        json!({"Id": "Administrator", "Name": "Administrator"}),
    )
    .on_get_json(
        "/redfish/v1/AccountService/Roles/Operator",
        json!({"Id": "Operator", "Name": "Operator"}),
    );

    let mut members = Vec::new();
    for (index, user) in users.iter().enumerate() {
        let id = (index + 1).to_string();
        let path = format!("/redfish/v1/AccountService/Accounts/{}", id);
        let (role, enabled) = if user.is_empty() {
            ("None", false)
        } else {
            ("Administrator", true)
        };
        mock.on_get_json(
            path.clone(),
            json!({"Id": id, "UserName": user, "RoleId": role, "Enabled": enabled}),
        )
        .on(Method::PATCH, path.clone(), HttpResponse::new(200));
        members.push(json!({"@odata.id": path}));
    }
    mock.on_get_json(
        "/redfish/v1/AccountService/Accounts",
        json!({"Members": members}),
    );
    mock
}

fn patches_to_slots(mock: &MockTransport) -> Vec<(String, Value)> {
    mock.requests()
        .into_iter()
        .filter(|r| r.method == Method::PATCH)
        .map(|r| {
            let body = r.json_body().unwrap();
            (r.url, body)
        })
        .collect()
}

#[tokio::test]
async fn test_dell_create_skips_reserved_slot() {
    let mock = dell_bmc(&["Administrator", "", "", ""]);
    let mut client = connected(&mock).await;

    client
        .create_account(&AccountRequest::new("ops", "s3cret").with_role("Operator"))
        .await
        .unwrap();

    assert_eq!(client.flavor(), Flavor::Dell);
    assert!(mock
        .requests_to(Method::POST, "/redfish/v1/AccountService/Accounts")
        .is_empty());
    assert_eq!(
        patches_to_slots(&mock),
        vec![(
            "https://bmc01:443/redfish/v1/AccountService/Accounts/2".to_string(),
            json!({"UserName": "ops", "Password": "s3cret", "RoleId": "Operator", "Enabled": true})
        )]
    );
}

#[tokio::test]
async fn test_dell_create_never_uses_empty_slot_zero() {
    let mock = dell_bmc(&["", "root", "", ""]);
    let mut client = connected(&mock).await;

    client
        .create_account(&AccountRequest::new("ops", "s3cret").with_role("Administrator"))
        .await
        .unwrap();

    let patches = patches_to_slots(&mock);
    assert_eq!(patches.len(), 1);
    assert!(patches[0].0.ends_with("/Accounts/3"));
}

#[tokio::test]
async fn test_dell_rejects_duplicate_and_unknown_role() {
    let mock = dell_bmc(&["Administrator", "root", "", ""]);
    let mut client = connected(&mock).await;

    let err = client
        .create_account(&AccountRequest::new("root", "s3cret").with_role("Operator"))
        .await
        .unwrap_err();
    assert!(matches!(err, RedfishClientError::InvalidRequest(_)));

    let err = client
        .create_account(&AccountRequest::new("ops", "s3cret").with_role("Auditor"))
        .await
        .unwrap_err();
    assert!(matches!(err, RedfishClientError::NotFound(_)));

    let err = client
        .create_account(&AccountRequest::new("ops", "s3cret"))
        .await
        .unwrap_err();
    assert!(matches!(err, RedfishClientError::InvalidRequest(_)));

    assert!(patches_to_slots(&mock).is_empty());
}

#[tokio::test]
async fn test_dell_delete_blanks_slot() {
    let mock = dell_bmc(&["Administrator", "", "ops", ""]);
    let mut client = connected(&mock).await;

    client.delete_account("ops").await.unwrap();

    let patches = mock.requests_to(Method::PATCH, "/redfish/v1/AccountService/Accounts/3");
    assert_eq!(
        patches[0].json_body().unwrap(),
        json!({"UserName": "", "RoleId": "None", "Enabled": false})
    );
    assert!(mock
        .requests_to(Method::DELETE, "/redfish/v1/AccountService/Accounts/3")
        .is_empty());

    // slot 0 is never touched
    let err = client.delete_account("Administrator").await.unwrap_err();
    assert!(matches!(err, RedfishClientError::InvalidRequest(_)));
    assert_eq!(patches_to_slots(&mock).len(), 1);
}

#[tokio::test]
async fn test_dell_password_change_respects_reserved_slot() {
    let mock = dell_bmc(&["Administrator", "", "", ""]);
    let mut client = connected(&mock).await;

    let err = client
        .change_password("Administrator", "n3w")
        .await
        .unwrap_err();
    assert!(matches!(err, RedfishClientError::InvalidRequest(_)), "{}", err);
    assert!(patches_to_slots(&mock).is_empty());
}

#[tokio::test]
async fn test_dell_password_change_patches_slot() {
    let mock = dell_bmc(&["Administrator", "ops", "", ""]);
    let mut client = connected(&mock).await;

    client.change_password("ops", "n3w").await.unwrap();

    assert_eq!(
        patches_to_slots(&mock),
        vec![(
            "https://bmc01:443/redfish/v1/AccountService/Accounts/2".to_string(),
            json!({"Password": "n3w"})
        )]
    );
}

#[tokio::test]
async fn test_dell_rejects_rename_to_empty() {
    let mock = dell_bmc(&["Administrator", "ops", "", ""]);
    let mut client = connected(&mock).await;

    let request = AccountRequest {
        user_name: Some(String::new()),
        ..AccountRequest::default()
    };
    let err = client.modify_account("ops", &request).await.unwrap_err();
    assert!(matches!(err, RedfishClientError::InvalidRequest(_)), "{}", err);
    assert!(patches_to_slots(&mock).is_empty());
}

#[tokio::test]
async fn test_dell_map_by_name_skips_empty_slots() {
    let mock = dell_bmc(&["Administrator", "", "", ""]);
    let mut client = connected(&mock).await;

    let accounts = client.map_accounts_by_name().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(
        accounts["Administrator"].self_endpoint.as_deref(),
        Some("/redfish/v1/AccountService/Accounts/1")
    );

    let by_id = client.map_accounts_by_id().await.unwrap();
    assert_eq!(by_id.len(), 4);
}

// =============================================================================
// Error decoding
// =============================================================================

async fn login_error(status: u16, body: Value) -> RedfishClientError {
    let mock = Arc::new(MockTransport::new());
    mock.on_get_json("/redfish/v1/", service_root()).on(
        Method::POST,
        SESSIONS,
        HttpResponse::new(status).with_json(&body),
    );
    let mut client = RedfishClient::with_transport(config(), mock);
    let err = client.connect().await.unwrap_err();
    assert!(!client.is_authenticated());
    err
}

#[tokio::test]
async fn test_error_messages_from_extended_info() {
    let err = login_error(
        400,
        json!({"error": {
            "code": "Base.1.4.GeneralError",
            "Message": "A general error has occurred.",
            "@Message.ExtendedInfo": [
                {"MessageId": "Base.1.4.PropertyMissing"},
                {"MessageId": "Base.1.4.PropertyValueFormatError", "Message": "UserName has a bad format."}
            ]
        }}),
    )
    .await;
    assert_eq!(
        err.to_string(),
        "Request rejected (400): Base.1.4.PropertyMissing; UserName has a bad format."
    );
    assert_eq!(err.kind(), ErrorKind::Rejected);
}

#[tokio::test]
async fn test_error_message_falls_back_to_top_level() {
    let err = login_error(
        403,
        json!({"error": {"code": "Base.1.0.GeneralError", "Message": "Session limit reached"}}),
    )
    .await;
    assert_eq!(err.to_string(), "Request rejected (403): Session limit reached");
}

#[tokio::test]
async fn test_error_without_message_reports_status_line() {
    let err = login_error(400, json!({"error": {"code": "Base.1.0.GeneralError"}})).await;
    assert_eq!(
        err.to_string(),
        "HTTP POST for https://bmc01:443/redfish/v1/SessionService/Sessions returned \"400 Bad Request\""
    );
    assert_eq!(err.kind(), ErrorKind::Transport);
}

// =============================================================================
// Session lifecycle and discovery
// =============================================================================

#[tokio::test]
async fn test_login_logout_and_clone() {
    let mock = bmc_with_system(json!({"Manufacturer": "Contoso"}));
    let mut client = connected(&mock).await;
    client.resolve_flavor().await.unwrap();

    assert!(client.is_authenticated());
    assert!(client.raw_service_root().is_some());

    let login = &mock.requests_to(Method::POST, SESSIONS)[0];
    assert_eq!(login.header_value("OData-Version"), Some("4.0"));
    assert_eq!(login.header_value("X-Auth-Token"), None);

    let systems = mock.requests_to(Method::GET, "/redfish/v1/Systems");
    assert_eq!(systems[0].header_value("X-Auth-Token"), Some("token-1"));

    let copy = client.clone();
    assert!(!copy.is_authenticated());
    assert!(copy.is_initialised());
    assert_eq!(copy.flavor(), Flavor::Generic);
    assert!(matches!(
        copy.list_systems().await.unwrap_err(),
        RedfishClientError::NotAuthenticated
    ));

    client.logout().await.unwrap();
    assert!(!client.is_authenticated());
    assert_eq!(client.session_location(), None);
    assert_eq!(
        mock.requests_to(Method::DELETE, "/redfish/v1/SessionService/Sessions/1").len(),
        1
    );

    // a second logout has nothing to close
    client.logout().await.unwrap();
    assert_eq!(
        mock.requests_to(Method::DELETE, "/redfish/v1/SessionService/Sessions/1").len(),
        1
    );
}

#[tokio::test]
async fn test_redirect_changes_port_and_retries() {
    let mock = Arc::new(MockTransport::new());
    mock.on(
        Method::GET,
        "/redfish/v1/",
        HttpResponse::new(301).with_header("Location", "https://bmc01:8443/redfish/v1/"),
    )
    .on_get_json("/redfish/v1/", service_root());

    let mut client = RedfishClient::with_transport(config(), mock.clone());
    client.discover().await.unwrap();

    assert_eq!(client.base_url(), "https://bmc01:8443");
    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, "https://bmc01:443/redfish/v1/");
    assert_eq!(requests[1].url, "https://bmc01:8443/redfish/v1/");
    assert_eq!(
        client.endpoints().unwrap().systems,
        "/redfish/v1/Systems".to_string()
    );
}

#[tokio::test]
async fn test_redirect_without_location_is_integrity_error() {
    let mock = Arc::new(MockTransport::new());
    mock.on(Method::GET, "/redfish/v1/", HttpResponse::new(302));

    let mut client = RedfishClient::with_transport(config(), mock.clone());
    let err = client.discover().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Integrity);
    assert!(!client.is_initialised());
    assert_eq!(mock.request_count(), 1);
}

// =============================================================================
// Certificates and licensing
// =============================================================================

const ILO_CERT: &str = "/redfish/v1/Managers/1/SecurityService/HttpsCert";

fn ilo_bmc(https_cert: Value) -> Arc<MockTransport> {
    let mock = bmc_with_system(json!({"Manufacturer": "HPE", "Oem": {"Hp": {}}}));
    mock.on_get_json(
        "/redfish/v1/Managers/1",
        json!({
            "Id": "1",
            "Oem": {"Hp": {
                "Type": "HpiLOManager.1.0.0",
                "License": {
                    "LicenseKey": "XXXXX-XXXXX-XXXXX-XXXXX-2SS4W",
                    "LicenseType": "Perpetual",
                    "LicenseString": "iLO 4 Advanced"
                },
                "Links": {
                    "SecurityService": {"@odata.id": "/redfish/v1/Managers/1/SecurityService"},
                    "LicenseService": {"@odata.id": "/redfish/v1/Managers/1/LicenseService"}
                }
            }}
        }),
    )
    .on_get_json(
        "/redfish/v1/Managers/1/SecurityService",
        json!({"Links": {"HttpsCert": {"@odata.id": ILO_CERT}}}),
    )
    .on_get_json(ILO_CERT, https_cert);
    mock
}

fn ilo_cert_actions() -> Value {
    json!({
        "#HpHttpsCert.GenerateCSR": {
            "target": "/redfish/v1/Managers/1/SecurityService/HttpsCert/Actions/HpHttpsCert.GenerateCSR/"
        },
        "#HpHttpsCert.ImportCertificate": {
            "target": "/redfish/v1/Managers/1/SecurityService/HttpsCert/Actions/HpHttpsCert.ImportCertificate/"
        }
    })
}

#[tokio::test]
async fn test_csr_not_available() {
    let mock = ilo_bmc(json!({"Actions": ilo_cert_actions()}));
    let mut client = connected(&mock).await;

    let err = client.fetch_csr().await.unwrap_err();
    assert!(matches!(err, RedfishClientError::CsrNotAvailable));

    let mock = ilo_bmc(json!({"Actions": ilo_cert_actions(), "CertificateSigningRequest": ""}));
    let mut client = connected(&mock).await;
    assert!(matches!(
        client.fetch_csr().await.unwrap_err(),
        RedfishClientError::CsrNotAvailable
    ));
}

#[tokio::test]
async fn test_csr_newlines_restored() {
    let mock = ilo_bmc(json!({
        "Actions": ilo_cert_actions(),
        "CertificateSigningRequest":
            "-----BEGIN CERTIFICATE REQUEST-----\\nMIIC0zCCAbsCAQAw\\n-----END CERTIFICATE REQUEST-----\\n"
    }));
    let mut client = connected(&mock).await;

    assert_eq!(
        client.fetch_csr().await.unwrap(),
        "-----BEGIN CERTIFICATE REQUEST-----\nMIIC0zCCAbsCAQAw\n-----END CERTIFICATE REQUEST-----\n"
    );
}

#[tokio::test]
async fn test_ilo_csr_requires_complete_subject() {
    let target = "/redfish/v1/Managers/1/SecurityService/HttpsCert/Actions/HpHttpsCert.GenerateCSR/";
    let mock = ilo_bmc(json!({"Actions": ilo_cert_actions()}));
    mock.on(Method::POST, target, HttpResponse::new(200));
    let mut client = connected(&mock).await;

    let mut subject = redfish_client::redfish_core::CsrSubject {
        country: "DE".into(),
        state: "Berlin".into(),
        locality: "Berlin".into(),
        organization: "Example Org".into(),
        organizational_unit: String::new(),
        common_name: "ilo01.example.org".into(),
    };
    let err = client.generate_csr(&subject).await.unwrap_err();
    assert!(matches!(err, RedfishClientError::InvalidRequest(_)), "{}", err);
    assert!(mock.requests_to(Method::POST, target).is_empty());

    subject.organizational_unit = "Ops".into();
    client.generate_csr(&subject).await.unwrap();
    let posts = mock.requests_to(Method::POST, target);
    assert_eq!(
        posts[0].json_body().unwrap(),
        json!({
            "Country": "DE",
            "State": "Berlin",
            "City": "Berlin",
            "OrgName": "Example Org",
            "OrgUnit": "Ops",
            "CommonName": "ilo01.example.org"
        })
    );
}

#[tokio::test]
async fn test_ilo_import_certificate() {
    let target = "/redfish/v1/Managers/1/SecurityService/HttpsCert/Actions/HpHttpsCert.ImportCertificate/";
    let mock = ilo_bmc(json!({"Actions": ilo_cert_actions()}));
    mock.on(Method::POST, target, HttpResponse::new(200));
    let mut client = connected(&mock).await;

    client.import_certificate(pem()).await.unwrap();

    let posts = mock.requests_to(Method::POST, target);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].json_body().unwrap(), json!({"Certificate": pem()}));
    // iLO activates the certificate on its own
    assert!(mock
        .requests_to(Method::POST, "/redfish/v1/Managers/1/Actions/Manager.Reset")
        .is_empty());
}

#[tokio::test]
async fn test_ilo_license() {
    let mock = ilo_bmc(json!({"Actions": ilo_cert_actions()}));
    mock.on(
        Method::POST,
        "/redfish/v1/Managers/1/LicenseService",
        HttpResponse::new(201),
    );
    let mut client = connected(&mock).await;
    let manager = client.get_manager("/redfish/v1/Managers/1").await.unwrap();

    let license = client.get_license(&manager).await.unwrap().unwrap();
    assert_eq!(license.name, "HP iLO license");
    assert_eq!(license.license_type, "Perpetual");
    assert_eq!(license.key, "XXXXX-XXXXX-XXXXX-XXXXX-2SS4W");

    client
        .install_license(&manager, "35DPH-SVSXJ-HGBJN-C7N5R-2SS4W")
        .await
        .unwrap();
    let posts = mock.requests_to(Method::POST, "/redfish/v1/Managers/1/LicenseService");
    assert_eq!(
        posts[0].json_body().unwrap(),
        json!({"LicenseKey": "35DPH-SVSXJ-HGBJN-C7N5R-2SS4W"})
    );
}

#[tokio::test]
async fn test_huawei_import_then_reset() {
    let import = "/redfish/v1/Managers/1/SecurityService/HttpsCert/Actions/HttpsCert.ImportServerCertificate";
    let reset = "/redfish/v1/Managers/1/Actions/Manager.Reset";

    let mock = bmc_with_system(json!({"Manufacturer": "Huawei"}));
    mock.on_get_json(
        "/redfish/v1/Managers/1",
        json!({
            "Id": "1",
            "Oem": {"Huawei": {
                "SecurityService": {"@odata.id": "/redfish/v1/Managers/1/SecurityService"}
            }},
            "Actions": {"#Manager.Reset": {"target": reset}}
        }),
    )
    .on_get_json(
        "/redfish/v1/Managers/1/SecurityService",
        json!({"Links": {"HttpsCert": {"@odata.id": "/redfish/v1/Managers/1/SecurityService/HttpsCert"}}}),
    )
    .on_get_json(
        "/redfish/v1/Managers/1/SecurityService/HttpsCert",
        json!({"Actions": {"#HttpsCert.ImportServerCertificate": {"target": import}}}),
    )
    .on(Method::POST, import, HttpResponse::new(202))
    .on(Method::POST, reset, HttpResponse::new(204));

    let mut client = connected(&mock).await;
    client.import_certificate(pem()).await.unwrap();

    let posts: Vec<_> = mock
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::POST && !r.url.ends_with(SESSIONS))
        .collect();
    assert_eq!(posts.len(), 2);
    assert!(posts[0].url.ends_with(import));
    assert!(posts[1].url.ends_with(reset));
    assert_eq!(posts[1].json_body().unwrap(), json!({"ResetType": "ForceRestart"}));
}

#[tokio::test]
async fn test_huawei_csr_rejects_slash_before_sending() {
    let mock = bmc_with_system(json!({"Manufacturer": "Huawei"}));
    mock.on_get_json("/redfish/v1/Managers/1", json!({"Id": "1"}));
    let mut client = connected(&mock).await;

    let subject = redfish_client::redfish_core::CsrSubject {
        common_name: "bmc01/mgmt".into(),
        ..Default::default()
    };
    let err = client.generate_csr(&subject).await.unwrap_err();
    assert!(matches!(err, RedfishClientError::InvalidRequest(_)));
    assert!(mock.requests().iter().all(|r| r.method != Method::POST || r.url.ends_with(SESSIONS)));
}

// =============================================================================
// End to end over HTTP
// =============================================================================

#[tokio::test]
async fn test_mock_bmc_account_lifecycle() {
    init_tracing();
    let bmc = MockBmc::start("Contoso").await.unwrap();
    let mut client = RedfishClient::new(bmc.config()).unwrap();

    client.connect().await.unwrap();
    assert_eq!(bmc.session_count(), 1);
    assert_eq!(client.resolve_flavor().await.unwrap(), Flavor::Generic);

    let systems = client.map_systems_by_serial_number().await.unwrap();
    assert!(systems.contains_key("SN0001"));

    client
        .create_account(&AccountRequest::new("ops", "s3cret-pw").with_role("Operator"))
        .await
        .unwrap();
    let accounts = client.map_accounts_by_name().await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts["ops"].role_id.as_deref(), Some("Operator"));

    client.change_password("ops", "n3w-s3cret").await.unwrap();
    let endpoint = accounts["ops"].self_endpoint.clone().unwrap();
    assert_eq!(bmc.resource(&endpoint).unwrap()["Password"], "n3w-s3cret");

    client.delete_account("ops").await.unwrap();
    assert!(bmc.resource(&endpoint).is_none());
    assert_eq!(client.map_accounts_by_name().await.unwrap().len(), 1);

    client.logout().await.unwrap();
    assert_eq!(bmc.session_count(), 0);

    bmc.shutdown().await;
}

#[tokio::test]
async fn test_mock_bmc_rejects_bad_credentials() {
    let bmc = MockBmc::start("Contoso").await.unwrap();
    let mut client = RedfishClient::new(bmc.config()).unwrap();

    let err = client.login("admin", "wrong").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Request rejected (401): Invalid username or password."
    );
    assert_eq!(bmc.session_count(), 0);
}

#[tokio::test]
async fn test_mock_bmc_power_and_manager_reset() {
    let bmc = MockBmc::start("Contoso").await.unwrap();
    let mut client = RedfishClient::new(bmc.config()).unwrap();
    client.connect().await.unwrap();

    let system = client.get_system("/redfish/v1/Systems/1").await.unwrap();
    let allowed = client.allowed_reset_types(&system).await.unwrap();
    assert_eq!(allowed.lookup("forceoff"), Some("ForceOff"));

    client.set_system_power_state(&system, "forceoff").await.unwrap();
    let err = client
        .set_system_power_state(&system, "Hibernate")
        .await
        .unwrap_err();
    assert!(matches!(err, RedfishClientError::InvalidRequest(_)));

    client.reset_manager().await.unwrap();

    assert_eq!(
        bmc.actions(),
        vec![
            (
                "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset".to_string(),
                json!({"ResetType": "ForceOff"})
            ),
            (
                "/redfish/v1/Managers/1/Actions/Manager.Reset".to_string(),
                json!({"ResetType": "ForceRestart"})
            ),
        ]
    );
}
