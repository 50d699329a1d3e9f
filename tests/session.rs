//! Login handshake, account information and authorization probing.

mod common;

use std::sync::Arc;

use common::{EMAIL, FakeCloud, SECRET, TOKEN};
use mailrulib::{CloudClient, CloudConfig, CloudError, SessionHandle};

async fn login_as(fake: &Arc<FakeCloud>, identity: &str, secret: &str) -> mailrulib::Result<SessionHandle> {
    SessionHandle::login_with_transport(identity, secret, fake.clone(), Arc::new(CloudConfig::default()))
        .await
}

#[tokio::test]
async fn test_login_obtains_token_and_tariffs() {
    common::init_tracing();
    let fake = FakeCloud::with_tariffs(&[("ZERO", true), ("W1TB", true), ("W2TB", false)]);
    let session = login_as(&fake, EMAIL, SECRET).await.unwrap();

    assert_eq!(session.identity(), EMAIL);
    assert_eq!(session.token(), Some(TOKEN));
    let ids: Vec<&str> = session.activated_tariffs().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["ZERO", "W1TB"]);
    assert!(!session.has_size_limit());

    assert_eq!(fake.calls("/cgi-bin/auth"), 1);
    assert_eq!(fake.calls("/sdc"), 1);
    assert_eq!(fake.calls("/api/v2/tokens/csrf"), 1);
}

#[tokio::test]
async fn test_free_account_is_capacity_limited() {
    let fake = FakeCloud::new();
    let session = login_as(&fake, EMAIL, SECRET).await.unwrap();
    assert!(session.has_size_limit());
}

#[tokio::test]
async fn test_wrong_password_is_not_authorized() {
    let fake = FakeCloud::new();
    let err = login_as(&fake, EMAIL, "wrong").await.unwrap_err();
    assert!(err.is_not_authorized());
    assert_eq!(err.argument(), Some("login"));
    assert_eq!(fake.calls("/api/v2/tokens/csrf"), 0);
}

#[tokio::test]
async fn test_empty_credentials_fail_before_any_request() {
    let fake = FakeCloud::new();

    let err = login_as(&fake, "", SECRET).await.unwrap_err();
    assert!(err.is_not_authorized());
    assert_eq!(err.argument(), Some("login"));

    let err = login_as(&fake, EMAIL, "").await.unwrap_err();
    assert!(err.is_not_authorized());
    assert_eq!(err.argument(), Some("password"));

    assert_eq!(fake.calls("/cgi-bin/auth"), 0);
}

#[tokio::test]
async fn test_disk_usage_and_rates() {
    let fake = FakeCloud::with_tariffs(&[("ZERO", true), ("W1TB", false)]);
    let client = common::login(&fake).await;

    let usage = client.session().disk_usage().await.unwrap();
    assert_eq!(usage.total.bytes(), 8192 * 1024 * 1024);
    assert_eq!(usage.used.bytes(), 100 * 1024 * 1024);
    assert_eq!(usage.free.bytes(), usage.total.bytes() - usage.used.bytes());

    let rates = client.session().rates().await.unwrap();
    assert_eq!(rates.len(), 2);
    assert!(rates[0].is_active);
    assert!(!rates[1].is_active);
    assert_eq!(rates[1].name, "Tariff W1TB");
}

#[tokio::test]
async fn test_expired_session_rejects_operations() {
    let fake = FakeCloud::new();
    let client = common::login(&fake).await;
    fake.expire_session();

    let err = client.create_folder("/a").await.unwrap_err();
    assert!(err.is_not_authorized());
    assert!(!fake.exists("/a"));

    let err = client.session().check_authorization().await.unwrap_err();
    assert!(err.is_not_authorized());
}

#[tokio::test]
async fn test_client_rejects_session_the_server_refuses() {
    let fake = FakeCloud::new();
    let session = login_as(&fake, EMAIL, SECRET).await.unwrap();
    fake.expire_session();

    let err = CloudClient::new(session).await.unwrap_err();
    assert!(matches!(err, CloudError::NotAuthorized { .. }));
}

#[tokio::test]
async fn test_entries_outliving_client_fail_cleanly() {
    let fake = FakeCloud::new();
    fake.seed_file("/a.txt", b"hello");
    let client = common::login(&fake).await;
    let mut root = client.get_folder("/").await.unwrap().unwrap();
    let file = root.files().await.pop().unwrap();
    drop(root);
    drop(client);

    let err = file.remove().await.unwrap_err();
    assert!(err.is_not_authorized());
    assert!(fake.exists("/a.txt"));
}
