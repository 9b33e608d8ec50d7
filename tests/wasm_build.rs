#![cfg(target_arch = "wasm32")]

//! WASM build test
//!
//! Smoke tests for the exported classes and functions; run with
//! `wasm-pack test --headless --chrome`.

use std::cell::RefCell;
use std::rc::Rc;

use site_core_wasm::api::{
    handle_api_request, init_site_backend, segment_text_js, set_mail_transport, BioInput, PostInteractions,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn status_of(response: &JsValue) -> f64 {
    js_sys::Reflect::get(response, &JsValue::from_str("status"))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or_default()
}

#[wasm_bindgen_test]
fn test_segment_text_returns_array() {
    let segments = segment_text_js("mail a@b.com").unwrap();
    assert!(js_sys::Array::is_array(&segments));
    assert_eq!(js_sys::Array::from(&segments).length(), 2);
}

#[wasm_bindgen_test]
fn test_waitlist_round_trip() {
    init_site_backend(JsValue::UNDEFINED).unwrap();
    let body = Some(r#"{"name":"Ada","email":"wasm@example.com"}"#.to_string());

    let first = handle_api_request("POST", "/api/waitlist", None, body.clone()).unwrap();
    assert_eq!(status_of(&first), 201.0);

    let second = handle_api_request("POST", "/api/waitlist", None, body).unwrap();
    assert_eq!(status_of(&second), 409.0);
}

#[wasm_bindgen_test]
fn test_malformed_query_is_bad_request() {
    init_site_backend(JsValue::UNDEFINED).unwrap();
    let response = handle_api_request("GET", "/api/support", Some("[1,2".to_string()), None).unwrap();
    assert_eq!(status_of(&response), 400.0);
}

#[wasm_bindgen_test]
fn test_post_interactions_toggle() {
    let mut interactions = PostInteractions::new();
    let first = interactions.toggle_bookmark("wasm-post");
    let second = interactions.toggle_bookmark("wasm-post");
    assert_ne!(first, second);
}

#[wasm_bindgen_test]
fn test_reentrant_mail_transport_does_not_deadlock() {
    init_site_backend(JsValue::UNDEFINED).unwrap();

    let nested: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&nested);
    let transport = Closure::<dyn FnMut(JsValue)>::new(move |_email: JsValue| {
        // Swap the transport and call back into the backend mid-request
        set_mail_transport(js_sys::Function::new_no_args(""));
        let inner = handle_api_request("GET", "/api/waitlist", None, None);
        sink.borrow_mut().push(inner.is_err());
    });
    set_mail_transport(transport.as_ref().unchecked_ref::<js_sys::Function>().clone());

    let body = Some(r#"{"name":"Ada","email":"reentrant@example.com"}"#.to_string());
    let response = handle_api_request("POST", "/api/waitlist", None, body).unwrap();

    assert_eq!(status_of(&response), 201.0);
    assert_eq!(*nested.borrow(), vec![true]);

    set_mail_transport(js_sys::Function::new_no_args(""));
}

#[wasm_bindgen_test]
fn test_bio_input_paints_and_ignores_cmd_chords() {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: web_sys::HtmlCanvasElement = document.create_element("canvas").unwrap().dyn_into().unwrap();

    let mut input = BioInput::new(canvas, JsValue::UNDEFINED).unwrap();
    input.resize(300.0, 60.0, 2.0).unwrap();
    input.focus();
    for key in ["h", "i"] {
        assert!(input.key_down(key, false, false, false));
    }

    // Cmd+V is left to the browser's paste event; Cmd+Z undoes
    assert!(!input.key_down("v", false, true, false));
    assert!(input.key_down("z", false, true, false));
    assert_eq!(input.value(), "h");

    input.render(0.0).unwrap();
}
