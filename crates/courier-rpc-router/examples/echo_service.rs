//! Echo service walked end to end through the router.
//!
//! Registers `demo.Echo/Say`, feeds one well-formed call and one unknown
//! procedure through the dispatcher, and prints the raw reply strings a
//! transport loop would ship back to the peer.

use serde::{Deserialize, Serialize};

use courier_rpc_router::prelude::*;

#[derive(Debug, Serialize, Deserialize)]
struct SayRequest {
    greeting: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SayReply {
    reply: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut router = Router::new();
    router.register("demo.Echo/Say", |_ctx, input: SayRequest| async move {
        if input.greeting.is_empty() {
            return Err(HandlerError::new("greeting must not be empty"));
        }
        Ok(SayReply {
            reply: input.greeting,
        })
    })?;

    let call = r#"{"procedure":"demo.Echo/Say","request":{"greeting":"hello"}}"#;
    let reply = router.handle(CallContext::new(), call).await?;
    println!("reply:       {reply}");

    // handle_message delivers failures as error envelopes instead of
    // surfacing them locally, so the peer always parses one shape.
    let missing = r#"{"procedure":"demo.Echo/Missing","request":{}}"#;
    let report = router.handle_message(CallContext::new(), missing).await?;
    println!("error reply: {report}");

    Ok(())
}
