// Integration tests for the upload client against a stub backend.

mod common;

use axum::http::StatusCode;
use common::spawn_stub;
use serde_json::json;
use voz_tutor::{ExchangeClient, ExchangeError};

#[tokio::test]
async fn send_parses_a_successful_body() {
    let (url, captured) = spawn_stub(
        StatusCode::OK,
        json!({"transcription": "Olá", "ai_response": "Oi", "audio_base64": "bXAz"}),
    )
    .await;

    let client = ExchangeClient::new(url.clone(), Some("tok".to_string()));
    assert_eq!(client.endpoint(), url);

    let response = client.send(b"audio-bytes".to_vec()).await.expect("exchange");

    assert_eq!(response.transcription.as_deref(), Some("Olá"));
    assert_eq!(response.ai_response.as_deref(), Some("Oi"));
    assert_eq!(response.audio_base64.as_deref(), Some("bXAz"));
    assert_eq!(response.speech().expect("speech clip").bytes, b"mp3");

    let uploads = captured.lock().unwrap();
    assert_eq!(uploads[0].audio, b"audio-bytes");
    assert_eq!(uploads[0].token_header.as_deref(), Some("tok"));
}

#[tokio::test]
async fn send_without_token_omits_the_header() {
    let (url, captured) = spawn_stub(
        StatusCode::OK,
        json!({"transcription": "a", "ai_response": "b"}),
    )
    .await;

    let client = ExchangeClient::new(url, None);
    client.send(b"audio".to_vec()).await.expect("exchange");

    assert_eq!(captured.lock().unwrap()[0].token_header, None);
}

#[tokio::test]
async fn server_error_with_message_is_surfaced() {
    let (url, _captured) = spawn_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"message": "limite excedido"}),
    )
    .await;

    let client = ExchangeClient::new(url, None);
    let err = client.send(b"audio".to_vec()).await.unwrap_err();

    match err {
        ExchangeError::Server(message) => assert_eq!(message, "limite excedido"),
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn server_error_without_message_uses_the_fallback() {
    let (url, _captured) = spawn_stub(StatusCode::BAD_REQUEST, json!({})).await;

    let client = ExchangeClient::new(url, None);
    let err = client.send(b"audio".to_vec()).await.unwrap_err();

    match err {
        ExchangeError::Server(message) => assert_eq!(message, "Erro desconhecido no servidor."),
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn unexpected_success_body_is_malformed() {
    // 2xx with a JSON body that is not the expected object shape.
    let (url, _captured) = spawn_stub(StatusCode::OK, json!("não é um objeto")).await;

    let client = ExchangeClient::new(url, None);
    let err = client.send(b"audio".to_vec()).await.unwrap_err();

    assert!(matches!(err, ExchangeError::Malformed(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind and immediately drop a listener so the port refuses connections.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = ExchangeClient::new(format!("http://{}/process_audio/", addr), None);
    let err = client.send(b"audio".to_vec()).await.unwrap_err();

    assert!(matches!(err, ExchangeError::Transport(_)));
}
