use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::{Query, State};
use axum::response::sse::{Event, Sse};
use futures::Stream;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::events::{ClientIdentity, Envelope, EventBroker};
use crate::models::dtos::EventStreamParams;
use crate::models::AppState;

/// Bridges one subscriber's broker queue onto the SSE response body and
/// unregisters the subscriber when the response is dropped, so a closed
/// browser tab cleans itself out of the registry.
pub struct ClientEventStream {
    id: Uuid,
    receiver: mpsc::Receiver<Envelope>,
    broker: Arc<EventBroker>,
}

impl Stream for ClientEventStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.receiver.poll_recv(cx) {
            Poll::Ready(Some(envelope)) => {
                let name: &'static str = envelope.event.into();
                Poll::Ready(Some(Ok(Event::default().event(name).data(envelope.payload))))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ClientEventStream {
    fn drop(&mut self) {
        self.broker.unregister(self.id);
    }
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    summary = "Subscribe to the realtime event stream",
    description = "Long-lived server-sent-events response. Every event carries a kebab-case \
                   name and a JSON payload; `connected` arrives first, `heartbeat` keeps the \
                   transport alive. Identity comes from query parameters populated by the \
                   reverse proxy.",
    operation_id = "subscribeEvents",
    params(
        ("role" = String, Query, description = "Audience bucket: user, member or partner"),
        ("user_id" = Option<i32>, Query, description = "Member id, required for role=member"),
        ("vendor_id" = Option<i32>, Query, description = "Vendor id, required for role=partner"),
    ),
    responses(
        (status = 200, description = "SSE stream of named events", content_type = "text/event-stream"),
    ),
)]
pub async fn subscribe_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventStreamParams>,
) -> Sse<ClientEventStream> {
    let identity = ClientIdentity::from(&params);
    let (id, receiver) = state.events.register(identity);
    Sse::new(ClientEventStream {
        id,
        receiver,
        broker: state.events.clone(),
    })
}
