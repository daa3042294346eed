//! Browser WebSocket link to the wave server

use crate::ws_state::LinkState;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

/// Shared message buffer - WS callback pushes, viewer drains in update()
pub type MessageBuffer = Rc<RefCell<VecDeque<String>>>;

pub struct WsClient {
    ws: WebSocket,
    state: Rc<RefCell<LinkState>>,
}

impl WsClient {
    /// Connect to the server; text frames are appended to `msg_buffer`
    pub fn connect(url: &str, msg_buffer: MessageBuffer, state: Rc<RefCell<LinkState>>) -> Result<Self, JsValue> {
        info!(url, "Connecting to WebSocket");

        let ws = WebSocket::new(url)?;

        let state_clone = state.clone();
        let on_open = Closure::wrap(Box::new(move |_| {
            info!("WebSocket connected");
            *state_clone.borrow_mut() = LinkState::Connected;
        }) as Box<dyn Fn(JsValue)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        let on_msg = Closure::wrap(Box::new(move |e: MessageEvent| {
            if let Ok(txt) = e.data().dyn_into::<js_sys::JsString>() {
                msg_buffer.borrow_mut().push_back(txt.into());
            }
        }) as Box<dyn Fn(MessageEvent)>);
        ws.set_onmessage(Some(on_msg.as_ref().unchecked_ref()));
        on_msg.forget();

        let state_clone = state.clone();
        let on_err = Closure::wrap(Box::new(move |e: ErrorEvent| {
            let msg = e.message();
            error!(error = %msg, "WebSocket error");
            *state_clone.borrow_mut() = LinkState::Error(msg);
        }) as Box<dyn Fn(ErrorEvent)>);
        ws.set_onerror(Some(on_err.as_ref().unchecked_ref()));
        on_err.forget();

        let state_clone = state.clone();
        let on_close = Closure::wrap(Box::new(move |e: CloseEvent| {
            warn!(code = e.code(), reason = %e.reason(), "WebSocket closed");
            *state_clone.borrow_mut() = LinkState::Disconnected;
        }) as Box<dyn Fn(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        Ok(Self { ws, state })
    }

    /// Send a text frame; ignored unless connected
    pub fn send(&self, text: &str) {
        if !self.state.borrow().is_connected() {
            return;
        }
        if let Err(e) = self.ws.send_with_str(text) {
            warn!(?e, "Failed to send");
        }
    }
}
