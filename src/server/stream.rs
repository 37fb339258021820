//! Server-sent event stream of one hotel's order events.

use crate::server::model::config::StreamConfig;
use crate::server::model::event::{Connected, OrderEvent};
use crate::server::store::bus::Subscription;
use crate::server::store::Store;
use actix_web::web::Bytes;
use futures_util::Stream;
use log::{debug, error};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::time::{self, Interval, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

const KEEP_ALIVE_FRAME: &[u8] = b": keep-alive\n\n";
const OPEN_FRAME: &[u8] = b"event: open\ndata: ok\n\n";

/// Everything a dashboard connection holds. Dropping the session releases the
/// bus subscription and the keep-alive timer together.
pub(crate) struct StreamSession {
    hotel_slug: String,
    pending: VecDeque<Bytes>,
    subscription: Subscription,
    keep_alive: Interval,
    shutdown: Pin<Box<WaitForCancellationFutureOwned>>,
    finished: bool,
}

impl StreamSession {
    pub fn open(store: &Store, hotel_slug: &str, config: StreamConfig, shutdown: CancellationToken) -> Self {
        let subscription = store.subscribe(hotel_slug);

        let mut keep_alive = time::interval_at(time::Instant::now() + config.keep_alive, config.keep_alive);
        keep_alive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut pending = VecDeque::with_capacity(2);
        if let Ok(json) = serde_json::to_string(&Connected { hotel: hotel_slug }) {
            pending.push_back(data_frame(&json));
        }
        pending.push_back(Bytes::from_static(OPEN_FRAME));

        debug!("stream opened for hotel={}", hotel_slug);
        Self {
            hotel_slug: hotel_slug.to_string(),
            pending,
            subscription,
            keep_alive,
            shutdown: Box::pin(shutdown.cancelled_owned()),
            finished: false,
        }
    }
}

fn data_frame(json: &str) -> Bytes {
    Bytes::from(format!("data: {}\n\n", json))
}

fn encode_event(event: &OrderEvent) -> Result<Bytes, serde_json::Error> {
    serde_json::to_string(event).map(|json| data_frame(&json))
}

impl Stream for StreamSession {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        if this.shutdown.as_mut().poll(cx).is_ready() {
            debug!("server shutting down, closing stream for hotel={}", this.hotel_slug);
            this.finished = true;
            return Poll::Ready(None);
        }
        if let Some(frame) = this.pending.pop_front() {
            return Poll::Ready(Some(Ok(frame)));
        }

        loop {
            match this.subscription.poll_recv(cx) {
                Poll::Ready(Some(event)) => match encode_event(&event) {
                    Ok(frame) => return Poll::Ready(Some(Ok(frame))),
                    Err(e) => {
                        error!("failed to encode event for hotel={}, {}", this.hotel_slug, e);
                        continue;
                    }
                },
                Poll::Ready(None) => {
                    this.finished = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => break,
            }
        }

        if this.keep_alive.poll_tick(cx).is_ready() {
            return Poll::Ready(Some(Ok(Bytes::from_static(KEEP_ALIVE_FRAME))));
        }
        Poll::Pending
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        debug!("stream closed for hotel={}", self.hotel_slug);
    }
}
