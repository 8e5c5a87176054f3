//! HTTP-level tests for the provider clients, using wiremock stand-ins
//! for the real endpoints.

use tarjimon_translate::{
    FallbackTranslator, GoogleTranslate, MyMemoryTranslate, TranslationProvider, YandexTranslate,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn google_parses_segmented_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("sl", "uz"))
        .and(query_param("tl", "ru"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            [["Привет ", "Salom ", null], ["мир", "dunyo", null]],
            null,
            "uz"
        ])))
        .mount(&server)
        .await;

    let provider = GoogleTranslate::with_base_url(server.uri());
    let result = provider.translate("uz", "ru", "Salom dunyo").await.unwrap();
    assert_eq!(result, "Привет мир");
}

#[tokio::test]
async fn google_server_error_is_a_provider_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = GoogleTranslate::with_base_url(server.uri());
    assert!(provider.translate("uz", "ru", "Salom").await.is_err());
}

#[tokio::test]
async fn mymemory_parses_translation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("langpair", "uz|en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "responseData": { "translatedText": "Hello" },
            "responseStatus": 200
        })))
        .mount(&server)
        .await;

    let provider = MyMemoryTranslate::with_base_url(server.uri());
    let result = provider.translate("uz", "en", "Salom").await.unwrap();
    assert_eq!(result, "Hello");
}

#[tokio::test]
async fn mymemory_rejection_is_an_error() {
    let server = MockServer::start().await;

    // MyMemory reports quota errors with HTTP 200 and a string status
    Mock::given(method("GET"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "responseData": { "translatedText": "MYMEMORY WARNING" },
            "responseStatus": "403",
            "responseDetails": "AUTHORIZATION REQUIRED"
        })))
        .mount(&server)
        .await;

    let provider = MyMemoryTranslate::with_base_url(server.uri());
    let err = provider.translate("uz", "en", "Salom").await.unwrap_err();
    assert!(err.to_string().contains("AUTHORIZATION"));
}

#[tokio::test]
async fn yandex_parses_translation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1.5/tr.json/translate"))
        .and(query_param("lang", "ru-en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 200,
            "lang": "ru-en",
            "text": ["Hello world"]
        })))
        .mount(&server)
        .await;

    let provider = YandexTranslate::with_base_url(server.uri(), "key-123");
    let result = provider.translate("ru", "en", "Привет мир").await.unwrap();
    assert_eq!(result, "Hello world");
}

#[tokio::test]
async fn yandex_api_level_error_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1.5/tr.json/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 401,
            "message": "API key is invalid"
        })))
        .mount(&server)
        .await;

    let provider = YandexTranslate::with_base_url(server.uri(), "bad-key");
    let err = provider.translate("ru", "en", "Привет").await.unwrap_err();
    assert!(err.to_string().contains("invalid"));
}

#[tokio::test]
async fn chain_falls_through_dead_endpoint_to_live_one() {
    let dead = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1.5/tr.json/translate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&dead)
        .await;

    let live = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            [["Здравствуйте", "Salom", null]],
            null,
            "uz"
        ])))
        .mount(&live)
        .await;

    let engine = FallbackTranslator::new(vec![
        Box::new(YandexTranslate::with_base_url(dead.uri(), "key")),
        Box::new(GoogleTranslate::with_base_url(live.uri())),
    ]);

    let outcome = engine.translate("Salom", "uz", "ru").await;
    assert_eq!(outcome.provider.as_deref(), Some("Google"));
    assert_eq!(outcome.text.as_deref(), Some("Здравствуйте"));
}
