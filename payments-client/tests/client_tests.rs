//! HTTP-level tests of the client against a mock server.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use payments_client::{ClientError, ClientOptions, Environment, PaymentsClient, TokenCacheMode};
use payments_types::domain::payment::{BankTransfer, ExternalAccount, UserSelected};
use payments_types::{
    AccountIdentifier, Beneficiary, CreatePaymentRequest, Currency, HttpRequest, PaymentMethod,
    PaymentStatus, PaymentUser, PayoutStatus, ProviderSelection, RequestSigner, SigningError,
};

fn options(server: &MockServer) -> ClientOptions {
    ClientOptions::new("c1", "s1").with_environment(Environment::custom(server.uri()))
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .and(body_json(json!({
            "grant_type": "client_credentials",
            "client_id": "c1",
            "client_secret": "s1",
            "scope": "payments"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "t1",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "payments"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn merchant_account_json() -> serde_json::Value {
    json!({
        "id": "ma-1",
        "currency": "GBP",
        "account_identifiers": [
            { "type": "sort_code_account_number", "sort_code": "040668", "account_number": "00000871" }
        ],
        "available_balance_in_minor": 1000,
        "current_balance_in_minor": 1500,
        "account_holder_name": "Merchant Ltd"
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_token_is_reused_across_calls() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v3/merchant-accounts"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [merchant_account_json()] })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = PaymentsClient::builder(options(&server)).build().unwrap();

    let accounts = client.merchant_accounts().list().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(
        accounts[0].account_identifiers[0],
        AccountIdentifier::sort_code_account_number("040668", "00000871")
    );
    client.merchant_accounts().list().await.unwrap();
}

#[tokio::test]
async fn test_disabled_cache_fetches_token_every_call() {
    let server = MockServer::start().await;
    mount_token(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/v3/merchant-accounts/ma-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(merchant_account_json()))
        .mount(&server)
        .await;

    let client = PaymentsClient::builder(options(&server).with_token_cache(TokenCacheMode::None))
        .build()
        .unwrap();

    client.merchant_accounts().get("ma-1").await.unwrap();
    client.merchant_accounts().get("ma-1").await.unwrap();
}

#[tokio::test]
async fn test_auth_rejection_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("tl-trace-id", "trace-auth")
                .set_body_json(json!({ "error": "invalid_client" })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = PaymentsClient::builder(options(&server)).build().unwrap();

    for _ in 0..2 {
        let err = client.merchant_accounts().list().await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)), "{:?}", err);
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.trace_id(), Some("trace-auth"));
    }
}

#[tokio::test]
async fn test_cancellable_token_fetch() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let client = PaymentsClient::builder(options(&server)).build().unwrap();
    let cancel = tokio_util::sync::CancellationToken::new();

    let token = client
        .auth()
        .get_token_cancellable("payments", &cancel)
        .await
        .unwrap();
    assert_eq!(token.access_token, "t1");
    assert_eq!(token.expires_in, 3600);
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

fn create_payment_request() -> CreatePaymentRequest {
    CreatePaymentRequest {
        amount_in_minor: 100,
        currency: Currency::GBP,
        payment_method: PaymentMethod::BankTransfer(BankTransfer {
            provider_selection: ProviderSelection::UserSelected(UserSelected::default()),
            beneficiary: Beneficiary::ExternalAccount(ExternalAccount {
                account_holder_name: "Bene Ficiary".into(),
                account_identifier: AccountIdentifier::iban("GB33BUKB20201555555555"),
                reference: "ref-1".into(),
            }),
        }),
        user: PaymentUser {
            name: Some("Remi Terr".into()),
            email: Some("remi@example.com".into()),
            ..Default::default()
        },
        metadata: None,
    }
}

#[tokio::test]
async fn test_create_payment_sends_tagged_body_and_idempotency_key() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/v3/payments"))
        .and(header("Authorization", "Bearer t1"))
        .and(header_exists("Idempotency-Key"))
        .and(body_json(json!({
            "amount_in_minor": 100,
            "currency": "GBP",
            "payment_method": {
                "type": "bank_transfer",
                "provider_selection": { "type": "user_selected" },
                "beneficiary": {
                    "type": "external_account",
                    "account_holder_name": "Bene Ficiary",
                    "account_identifier": { "type": "iban", "iban": "GB33BUKB20201555555555" },
                    "reference": "ref-1"
                }
            },
            "user": { "name": "Remi Terr", "email": "remi@example.com" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pay-1",
            "user": { "id": "user-1" },
            "resource_token": "rt-1",
            "status": "authorization_required"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = PaymentsClient::builder(options(&server)).build().unwrap();
    let created = client
        .payments()
        .create(&create_payment_request())
        .await
        .unwrap();

    assert_eq!(created.id, "pay-1");
    assert_eq!(created.resource_token, "rt-1");
    assert_eq!(created.status, "authorization_required");
}

#[tokio::test]
async fn test_get_payment_decodes_status_union() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v3/payments/pay-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pay-1",
            "amount_in_minor": 100,
            "currency": "GBP",
            "user": { "id": "user-1" },
            "payment_method": {
                "type": "bank_transfer",
                "provider_selection": { "type": "preselected", "provider_id": "mock-gb" },
                "beneficiary": { "type": "merchant_account", "merchant_account_id": "ma-1" }
            },
            "created_at": "2024-01-01T10:00:00Z",
            "status": "executed",
            "executed_at": "2024-01-01T10:01:00Z"
        })))
        .mount(&server)
        .await;

    let client = PaymentsClient::builder(options(&server)).build().unwrap();
    let payment = client.payments().get("pay-1").await.unwrap();

    match payment.status {
        PaymentStatus::Executed(executed) => {
            assert_eq!(executed.executed_at.to_rfc3339(), "2024-01-01T10:01:00+00:00");
        }
        other => panic!("unexpected status {:?}", other),
    }
    assert!(matches!(
        payment.payment_method,
        PaymentMethod::BankTransfer(BankTransfer {
            provider_selection: ProviderSelection::Preselected(_),
            ..
        })
    ));
}

#[tokio::test]
async fn test_unknown_status_is_a_codec_error() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v3/payments/pay-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pay-2",
            "amount_in_minor": 100,
            "currency": "GBP",
            "user": { "id": "user-1" },
            "payment_method": { "type": "mandate", "mandate_id": "m-1" },
            "created_at": "2024-01-01T10:00:00Z",
            "status": "teleported"
        })))
        .mount(&server)
        .await;

    let client = PaymentsClient::builder(options(&server)).build().unwrap();
    let err = client.payments().get("pay-2").await.unwrap_err();

    let ClientError::Codec(codec) = &err else {
        panic!("expected a codec error, got {:?}", err);
    };
    let unknown = codec.as_unknown_variant().expect("unknown variant");
    assert_eq!(unknown.union, "PaymentStatus");
    assert_eq!(unknown.field, "status");
    assert_eq!(unknown.discriminator.as_str(), Some("teleported"));
}

#[tokio::test]
async fn test_api_error_carries_problem_details() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/v3/payments"))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("tl-trace-id", "trace-header")
                .set_body_json(json!({
                    "type": "https://docs.example.com/errors#400",
                    "title": "Invalid Parameters",
                    "status": 400,
                    "detail": "Some fields are invalid.",
                    "errors": { "amount_in_minor": ["must be positive"] }
                })),
        )
        .mount(&server)
        .await;

    let client = PaymentsClient::builder(options(&server)).build().unwrap();
    let err = client
        .payments()
        .create(&create_payment_request())
        .await
        .unwrap_err();

    match err {
        ClientError::Api {
            status,
            trace_id,
            problem,
        } => {
            assert_eq!(status, 400);
            assert_eq!(trace_id.as_deref(), Some("trace-header"));
            assert_eq!(problem.title.as_deref(), Some("Invalid Parameters"));
            assert!(problem.errors.is_some());
        }
        other => panic!("unexpected error {:?}", other),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Signing
// ─────────────────────────────────────────────────────────────────────────────

struct FixedSigner;

impl RequestSigner for FixedSigner {
    fn sign(&self, request: &HttpRequest) -> Result<String, SigningError> {
        Ok(format!("sig:{}:{}", request.method, request.path()))
    }
}

struct FailingSigner;

impl RequestSigner for FailingSigner {
    fn sign(&self, _request: &HttpRequest) -> Result<String, SigningError> {
        Err(SigningError("no key loaded".into()))
    }
}

#[tokio::test]
async fn test_signer_signs_posts_only() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/v3/payouts"))
        .and(header("Tl-Signature", "sig:POST:/v3/payouts"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "id": "po-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/payouts/po-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "po-1",
            "merchant_account_id": "ma-1",
            "amount_in_minor": 500,
            "currency": "GBP",
            "beneficiary": {
                "type": "payment_source",
                "payment_source_id": "ps-1",
                "user_id": "user-1",
                "reference": "refund"
            },
            "created_at": "2024-01-01T10:00:00Z",
            "status": "pending"
        })))
        .mount(&server)
        .await;

    let client = PaymentsClient::builder(options(&server))
        .with_signer(Arc::new(FixedSigner))
        .build()
        .unwrap();

    let request = payments_types::CreatePayoutRequest {
        merchant_account_id: "ma-1".into(),
        amount_in_minor: 500,
        currency: Currency::GBP,
        beneficiary: payments_types::PayoutBeneficiary::BusinessAccount(
            payments_types::domain::payout::BusinessAccount {
                reference: "sweep".into(),
            },
        ),
        metadata: None,
    };
    let created = client.payouts().create(&request).await.unwrap();
    assert_eq!(created.id, "po-1");

    let payout = client.payouts().get("po-1").await.unwrap();
    assert!(matches!(payout.status, PayoutStatus::Pending(_)));

    let requests = server.received_requests().await.unwrap();
    let get = requests
        .iter()
        .find(|r| r.method.as_str() == "GET")
        .unwrap();
    assert!(get.headers.get("Tl-Signature").is_none());
}

#[tokio::test]
async fn test_signing_failure_stops_the_request() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/v3/payments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = PaymentsClient::builder(options(&server))
        .with_signer(Arc::new(FailingSigner))
        .build()
        .unwrap();

    let err = client
        .payments()
        .create(&create_payment_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Signing(_)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_provider_lookup_passes_client_id() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v3/payments-providers/mock-gb"))
        .and(query_param("client_id", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "provider_id": "mock-gb",
            "display_name": "Mock Bank",
            "country_code": "GB"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = PaymentsClient::builder(options(&server)).build().unwrap();
    let provider = client.providers().get("mock-gb").await.unwrap();

    assert_eq!(provider.display_name.as_deref(), Some("Mock Bank"));
}
