mod common;

use std::{sync::Arc, time::Duration};

use common::{create_test_client, Event, Scripted, ScriptedTransport};
use planwatch_core::{
    chat::{FAILURE_MESSAGE, THINKING_MESSAGE},
    ChatReply, MessageId, PollPhase, Sender, SendOutcome,
};
use serde_json::json;
use tokio::time::sleep;

const CHAT: &str = "/manus/chat";
const STATUS: &str = "/manus/status";

fn create_chat_transport(reply: Scripted) -> Arc<ScriptedTransport> {
    Arc::new(ScriptedTransport::with_delay(Duration::from_millis(100)).route(CHAT, [reply]))
}

#[tokio::test(start_paused = true)]
async fn test_successful_send_replaces_placeholder_and_lingers() {
    let transport = create_chat_transport(Scripted::json(&json!({ "result": "Trip planned" })));
    let (renderer, client) = create_test_client(transport.clone());
    let chat = client.chat();

    let outcome = chat.handle_send_message("  plan a trip  ").await;

    assert_eq!(
        outcome,
        SendOutcome::Replied(ChatReply {
            result: Some("Trip planned".to_string()),
            error: None,
        })
    );
    assert!(!chat.is_waiting());

    let events = renderer.events();
    assert_eq!(
        &events[..6],
        &[
            Event::Message {
                id: MessageId(0),
                content: "plan a trip".to_string(),
                sender: Sender::User,
            },
            Event::ClearInput,
            Event::Message {
                id: MessageId(1),
                content: THINKING_MESSAGE.to_string(),
                sender: Sender::System,
            },
            Event::InputEnabled(false),
            Event::ShowPanel,
            Event::Reset,
        ]
    );
    assert_eq!(
        &events[events.len() - 2..],
        &[
            Event::Replace {
                id: MessageId(1),
                content: "Trip planned".to_string(),
            },
            Event::InputEnabled(true),
        ]
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].ends_with("/manus/chat?query=plan+a+trip"));

    // Polling keeps running for the linger, then stops on its own
    sleep(Duration::from_millis(2_800)).await;
    assert!(matches!(client.controller().phase(), PollPhase::Polling { .. }));
    sleep(Duration::from_millis(300)).await;
    assert_eq!(client.controller().phase(), PollPhase::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_sends_issue_one_request() {
    let transport = create_chat_transport(Scripted::json(&json!({ "result": "Done" })));
    let (renderer, client) = create_test_client(transport.clone());
    let chat = client.chat();

    let (first, second) = tokio::join!(
        chat.handle_send_message("first"),
        chat.handle_send_message("second")
    );

    assert!(matches!(first, SendOutcome::Replied(_)));
    assert_eq!(second, SendOutcome::Ignored);
    assert_eq!(transport.request_count(CHAT), 1);
    assert_eq!(renderer.count(&Event::ClearInput), 1);
    client.controller().stop();
}

#[tokio::test(start_paused = true)]
async fn test_blank_input_is_ignored() {
    let transport = create_chat_transport(Scripted::ok("{}"));
    let (renderer, client) = create_test_client(transport.clone());

    let outcome = client.chat().handle_send_message(" \n\t").await;

    assert_eq!(outcome, SendOutcome::Ignored);
    assert!(renderer.events().is_empty());
    assert!(transport.requests().is_empty());
    assert_eq!(client.controller().phase(), PollPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_shows_apology_and_stops_polling() {
    let transport = create_chat_transport(Scripted::status(500));
    let (renderer, client) = create_test_client(transport);

    let outcome = client.chat().handle_send_message("hello").await;

    assert_eq!(
        outcome,
        SendOutcome::Failed("All 1 candidate URLs failed".to_string())
    );
    assert!(renderer.events().contains(&Event::Replace {
        id: MessageId(1),
        content: format!("{FAILURE_MESSAGE} (All 1 candidate URLs failed)"),
    }));
    assert_eq!(
        renderer.log_count("Chat request failed: All 1 candidate URLs failed"),
        1
    );
    assert_eq!(renderer.count(&Event::InputEnabled(true)), 1);
    assert_eq!(client.controller().phase(), PollPhase::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_error_reply_stops_polling_immediately() {
    let transport = create_chat_transport(Scripted::json(&json!({ "error": "quota exceeded" })));
    let (renderer, client) = create_test_client(transport);

    let outcome = client.chat().handle_send_message("hello").await;

    let SendOutcome::Replied(reply) = outcome else {
        panic!("expected a reply, got {outcome:?}");
    };
    assert!(reply.is_error());
    assert!(renderer.events().contains(&Event::Replace {
        id: MessageId(1),
        content: "quota exceeded".to_string(),
    }));
    assert_eq!(client.controller().phase(), PollPhase::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_linger_only_stops_its_own_session() {
    let transport = Arc::new(
        ScriptedTransport::with_delay(Duration::from_millis(100))
            .route(CHAT, [Scripted::json(&json!({ "result": "ok" }))])
            .route(STATUS, [Scripted::ok("{}")]),
    );
    let (_renderer, client) = create_test_client(transport);
    let chat = client.chat();
    let controller = client.controller();

    // First reply at 0.1s schedules a stop at 3.1s
    chat.handle_send_message("first").await;
    let first = controller.current_session();

    sleep(Duration::from_millis(900)).await;
    // Second reply at 1.1s schedules a stop at 4.1s
    chat.handle_send_message("second").await;
    let second = controller.current_session();
    assert_ne!(first, second);

    sleep(Duration::from_millis(2_200)).await;
    assert_eq!(controller.current_session(), second);
    assert!(matches!(controller.phase(), PollPhase::Polling { .. }));

    sleep(Duration::from_millis(1_000)).await;
    assert_eq!(controller.phase(), PollPhase::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_send_releases_in_flight_guard() {
    let transport = Arc::new(
        ScriptedTransport::with_delay(Duration::from_secs(30))
            .route(CHAT, [Scripted::json(&json!({ "result": "ok" }))]),
    );
    let (_renderer, client) = create_test_client(transport.clone());
    let chat = client.chat();
    let controller = client.controller();

    tokio::select! {
        _ = chat.handle_send_message("slow") => panic!("request should still be pending"),
        _ = sleep(Duration::from_secs(1)) => {
            assert!(chat.is_waiting());
            controller.stop();
        }
    }

    assert!(!chat.is_waiting());
    assert_eq!(controller.phase(), PollPhase::Stopped);

    let outcome = chat.handle_send_message("again").await;
    assert!(matches!(outcome, SendOutcome::Replied(_)));
    assert_eq!(transport.request_count(CHAT), 2);
    controller.stop();
}
