//! End-to-end dispatch behavior over the public API.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use courier_rpc_router::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SayRequest {
    greeting: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SayReply {
    reply: String,
}

fn echo_router() -> Router {
    let mut router = Router::new();
    router
        .register("demo.Echo/Say", |_ctx, input: SayRequest| async move {
            Ok::<_, HandlerError>(SayReply {
                reply: input.greeting,
            })
        })
        .unwrap();
    router
        .register("demo.Echo/Fail", |_ctx, _input: SayRequest| async move {
            Err::<SayReply, _>(HandlerError::new("boom"))
        })
        .unwrap();
    router
}

#[tokio::test]
async fn dispatch_yields_the_handler_output() {
    let router = echo_router();
    let reply = router
        .handle(
            CallContext::new(),
            r#"{"procedure":"demo.Echo/Say","request":{"greeting":"hello"}}"#,
        )
        .await
        .unwrap();
    assert_eq!(
        reply,
        r#"{"procedure":"demo.Echo/Say","response":{"reply":"hello"}}"#
    );
}

#[tokio::test]
async fn unknown_operation_names_the_procedure() {
    let router = echo_router();
    let err = router
        .handle(
            CallContext::new(),
            r#"{"procedure":"svc/Missing","request":{}}"#,
        )
        .await
        .unwrap_err();
    match err {
        RouterError::UnknownOperation { ref procedure } => assert_eq!(procedure, "svc/Missing"),
        ref other => panic!("expected UnknownOperation, got: {other:?}"),
    }
    assert!(err.to_string().contains("svc/Missing"));
}

#[tokio::test]
async fn malformed_input_is_rejected_before_lookup() {
    let router = echo_router();

    for input in [
        "not json",
        "{}",
        r#"{"procedure":"","request":{}}"#,
        // Response payload on the inbound direction.
        r#"{"procedure":"demo.Echo/Say","response":{"reply":"hi"}}"#,
        // Both payloads at once.
        r#"{"procedure":"demo.Echo/Say","request":{},"response":{}}"#,
        // No payload at all.
        r#"{"procedure":"demo.Echo/Say"}"#,
    ] {
        let err = router.handle(CallContext::new(), input).await.unwrap_err();
        assert!(
            matches!(err, RouterError::MalformedEnvelope(_)),
            "input {input:?} should be malformed, got: {err:?}"
        );
    }
}

#[tokio::test]
async fn handler_failure_surfaces_without_a_reply() {
    let router = echo_router();
    let err = router
        .handle(
            CallContext::new(),
            r#"{"procedure":"demo.Echo/Fail","request":{"greeting":"hi"}}"#,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::Handler { .. }));
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn request_decode_failure_does_not_invoke_the_handler() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let invoked = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&invoked);

    let mut router = Router::new();
    router
        .register("demo.Echo/Say", move |_ctx, input: SayRequest| {
            let flag = Arc::clone(&flag);
            async move {
                flag.store(true, Ordering::SeqCst);
                Ok::<_, HandlerError>(SayReply {
                    reply: input.greeting,
                })
            }
        })
        .unwrap();

    let err = router
        .handle(
            CallContext::new(),
            r#"{"procedure":"demo.Echo/Say","request":{"greeting":42}}"#,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::RequestDecode { .. }));
    assert!(!invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn unknown_request_fields_are_ignored() {
    let router = echo_router();
    let reply = router
        .handle(
            CallContext::new(),
            r#"{"procedure":"demo.Echo/Say","request":{"greeting":"hello","futureField":true}}"#,
        )
        .await
        .unwrap();
    assert_eq!(
        reply,
        r#"{"procedure":"demo.Echo/Say","response":{"reply":"hello"}}"#
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_calls_do_not_cross_talk() {
    let router = Arc::new(echo_router());

    let mut tasks = Vec::new();
    for i in 0..32 {
        let router = Arc::clone(&router);
        tasks.push(tokio::spawn(async move {
            let input = format!(
                r#"{{"procedure":"demo.Echo/Say","request":{{"greeting":"task-{i}"}}}}"#
            );
            let reply = router.handle(CallContext::new(), &input).await.unwrap();
            (i, reply)
        }));
    }

    for task in tasks {
        let (i, reply) = task.await.unwrap();
        assert_eq!(
            reply,
            format!(r#"{{"procedure":"demo.Echo/Say","response":{{"reply":"task-{i}"}}}}"#)
        );
    }
}

#[tokio::test]
async fn handle_message_reports_failures_in_envelope_shape() {
    let router = echo_router();
    let reply = router
        .handle_message(
            CallContext::new(),
            r#"{"procedure":"demo.Echo/Fail","request":{"greeting":"hi"}}"#,
        )
        .await
        .unwrap();

    let envelope = Envelope::from_json(&reply).unwrap();
    assert_eq!(envelope.procedure, "demo.Echo/Fail");
    assert!(envelope.request.is_none());
    let payload: ErrorPayload = serde_json::from_str(envelope.response.unwrap().get()).unwrap();
    assert!(payload.message().contains("boom"));
}

#[tokio::test]
async fn handle_message_recovers_procedure_from_ill_formed_envelopes() {
    let router = echo_router();
    // Both payloads present: well-formedness fails, but the procedure is
    // known and the error reply must be addressed to it.
    let reply = router
        .handle_message(
            CallContext::new(),
            r#"{"procedure":"demo.Echo/Say","request":{},"response":{}}"#,
        )
        .await
        .unwrap();

    let envelope = Envelope::from_json(&reply).unwrap();
    assert_eq!(envelope.procedure, "demo.Echo/Say");
    let payload: ErrorPayload = serde_json::from_str(envelope.response.unwrap().get()).unwrap();
    assert!(payload.message().contains("malformed envelope"));
}

#[tokio::test]
async fn handle_message_surfaces_unaddressable_failures_locally() {
    let router = echo_router();
    // No procedure to address a reply to: the failure stays local instead of
    // going out as an envelope that would itself be malformed.
    for input in ["not json", "{}", r#"{"procedure":"","request":{}}"#] {
        let err = router
            .handle_message(CallContext::new(), input)
            .await
            .unwrap_err();
        assert!(
            matches!(err, RouterError::MalformedEnvelope(_)),
            "input {input:?} should fail locally, got: {err:?}"
        );
    }
}

#[derive(Debug)]
struct Unencodable;

impl Serialize for Unencodable {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(<S::Error as serde::ser::Error>::custom("refusing to encode"))
    }
}

#[tokio::test]
async fn response_encode_failure_signals_a_defect() {
    let mut router = Router::new();
    router
        .register("demo.Echo/Broken", |_ctx, _input: SayRequest| async move {
            Ok::<_, HandlerError>(Unencodable)
        })
        .unwrap();

    let err = router
        .handle(
            CallContext::new(),
            r#"{"procedure":"demo.Echo/Broken","request":{"greeting":"hi"}}"#,
        )
        .await
        .unwrap_err();
    match err {
        RouterError::ResponseEncode { ref procedure, .. } => {
            assert_eq!(procedure, "demo.Echo/Broken");
        }
        ref other => panic!("expected ResponseEncode, got: {other:?}"),
    }
    assert!(err.to_string().contains("refusing to encode"));
}

#[tokio::test]
async fn handle_message_passes_successes_through_unchanged() {
    let router = echo_router();
    let reply = router
        .handle_message(
            CallContext::new(),
            r#"{"procedure":"demo.Echo/Say","request":{"greeting":"hello"}}"#,
        )
        .await
        .unwrap();
    assert_eq!(
        reply,
        r#"{"procedure":"demo.Echo/Say","response":{"reply":"hello"}}"#
    );
}

#[test]
fn duplicate_registration_fails_loudly() {
    let mut router = echo_router();
    let err = router
        .register("demo.Echo/Say", |_ctx, input: SayRequest| async move {
            Ok::<_, HandlerError>(SayReply {
                reply: input.greeting,
            })
        })
        .unwrap_err();
    assert_eq!(err, RegisterError::Duplicate("demo.Echo/Say".to_string()));
}

#[test]
fn codec_round_trips_registered_message_types() {
    let request = SayRequest {
        greeting: "hello".to_string(),
    };
    let reply = SayReply {
        reply: "hello".to_string(),
    };

    let decoded: SayRequest = JsonCodec.decode(&JsonCodec.encode(&request).unwrap()).unwrap();
    assert_eq!(decoded, request);
    let decoded: SayReply = JsonCodec.decode(&JsonCodec.encode(&reply).unwrap()).unwrap();
    assert_eq!(decoded, reply);
}

#[test]
fn registry_exposes_registered_operations() {
    let router = echo_router();
    let mut operations = router.registry().operations();
    operations.sort_unstable();
    assert_eq!(operations, vec!["demo.Echo/Fail", "demo.Echo/Say"]);
    assert!(router.registry().contains("demo.Echo/Say"));
    assert_eq!(router.registry().len(), 2);
}
