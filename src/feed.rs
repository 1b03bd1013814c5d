//! Blockchain feed transport (wasm only)
//!
//! Owns the WebSocket to the public blockchain API: subscribe handshake on
//! open, one `record_event` per incoming message, reconnect with a fixed
//! delay on close. The core never sees any of this; it only receives event
//! counts through the shared [`SignalAggregator`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, WebSocket};

use crate::sim::SignalAggregator;

/// Public unconfirmed-transaction feed
pub const FEED_URL: &str = "wss://ws.blockchain.info/inv";
/// Subscription handshake sent once the socket opens
const SUBSCRIBE_MSG: &str = r#"{"op":"unconfirmed_sub"}"#;
/// Delay before retrying a dropped connection
pub const RECONNECT_DELAY_MS: i32 = 5000;

/// Connection state reported to the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Connected,
    Disconnected,
    Error,
}

/// Handle to a live feed connection.
///
/// `shutdown` closes the socket and suppresses the reconnect timer; a
/// close event arriving afterwards is a no-op.
pub struct FeedHandle {
    socket: Rc<RefCell<Option<WebSocket>>>,
    shutdown: Rc<Cell<bool>>,
}

impl FeedHandle {
    pub fn shutdown(&self) {
        self.shutdown.set(true);
        if let Some(ws) = self.socket.borrow().as_ref() {
            let _ = ws.close();
        }
    }
}

/// Open the feed and keep it alive until the handle is shut down.
pub fn connect(
    aggregator: Rc<RefCell<SignalAggregator>>,
    on_status: Rc<dyn Fn(FeedStatus)>,
) -> FeedHandle {
    let socket = Rc::new(RefCell::new(None));
    let shutdown = Rc::new(Cell::new(false));
    open_socket(aggregator, on_status, socket.clone(), shutdown.clone());
    FeedHandle { socket, shutdown }
}

fn open_socket(
    aggregator: Rc<RefCell<SignalAggregator>>,
    on_status: Rc<dyn Fn(FeedStatus)>,
    socket_slot: Rc<RefCell<Option<WebSocket>>>,
    shutdown: Rc<Cell<bool>>,
) {
    let ws = match WebSocket::new(FEED_URL) {
        Ok(ws) => ws,
        Err(err) => {
            log::error!("Failed to open feed socket: {err:?}");
            on_status(FeedStatus::Error);
            return;
        }
    };

    // Subscribe on open
    {
        let ws = ws.clone();
        let on_status = on_status.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if ws.send_with_str(SUBSCRIBE_MSG).is_ok() {
                log::info!("Feed connected, subscribed to unconfirmed transactions");
                on_status(FeedStatus::Connected);
            }
        });
        ws.set_onopen(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    // Every message is one qualifying event; the payload is irrelevant
    {
        let aggregator = aggregator.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MessageEvent| {
            aggregator.borrow_mut().record_event();
        });
        ws.set_onmessage(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    // Reconnect after a delay, unless the handle was shut down
    {
        let aggregator = aggregator.clone();
        let on_status_close = on_status.clone();
        let socket_slot = socket_slot.clone();
        let shutdown = shutdown.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::CloseEvent| {
            if shutdown.get() {
                return;
            }
            log::warn!("Feed disconnected, retrying in {RECONNECT_DELAY_MS} ms");
            on_status_close(FeedStatus::Disconnected);

            let aggregator = aggregator.clone();
            let on_status = on_status_close.clone();
            let socket_slot = socket_slot.clone();
            let shutdown = shutdown.clone();
            let retry = Closure::once_into_js(move || {
                if shutdown.get() {
                    return;
                }
                open_socket(aggregator, on_status, socket_slot, shutdown);
            });
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    retry.unchecked_ref(),
                    RECONNECT_DELAY_MS,
                );
            }
        });
        ws.set_onclose(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    // Errors just close the socket; the close handler drives the retry
    {
        let ws = ws.clone();
        let on_status = on_status.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::ErrorEvent| {
            log::error!("Feed socket error");
            on_status(FeedStatus::Error);
            let _ = ws.close();
        });
        ws.set_onerror(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    *socket_slot.borrow_mut() = Some(ws);
}
