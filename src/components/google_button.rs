//! Google Sign-In Button
//!
//! Renders the Google Identity Services button into a div and hands the
//! returned ID token to the caller. Requires the GIS script on the page.

use js_sys::{Array, Function, Object, Reflect};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// `window.google.accounts.id`, once the script has loaded
fn google_id_api() -> Option<JsValue> {
    let win = web_sys::window()?;
    let google = Reflect::get(&win, &"google".into()).ok().filter(|v| v.is_object())?;
    let accounts = Reflect::get(&google, &"accounts".into()).ok().filter(|v| v.is_object())?;
    Reflect::get(&accounts, &"id".into()).ok().filter(|v| v.is_object())
}

fn call(target: &JsValue, method: &str, args: &Array) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &method.into())?.dyn_into()?;
    function.apply(target, args)
}

/// Initialize GIS for `client_id` and draw its button inside `container`.
///
/// The returned closure must outlive the button.
pub fn render_google_button(
    client_id: &str,
    container: &web_sys::HtmlElement,
    on_credential: impl Fn(String) + 'static,
) -> Result<Closure<dyn FnMut(JsValue)>, JsValue> {
    let api = google_id_api().ok_or_else(|| JsValue::from_str("Google Identity Services not loaded"))?;

    let callback = Closure::<dyn FnMut(JsValue)>::new(move |response: JsValue| {
        match Reflect::get(&response, &"credential".into()).ok().and_then(|v| v.as_string()) {
            Some(credential) => on_credential(credential),
            None => log::warn!("[AUTH] Google response without credential"),
        }
    });

    let config = Object::new();
    Reflect::set(&config, &"client_id".into(), &client_id.into())?;
    Reflect::set(&config, &"callback".into(), callback.as_ref())?;
    call(&api, "initialize", &Array::of1(&config))?;

    let options = Object::new();
    Reflect::set(&options, &"theme".into(), &"outline".into())?;
    Reflect::set(&options, &"size".into(), &"large".into())?;
    call(&api, "renderButton", &Array::of2(container.as_ref(), options.as_ref()))?;

    Ok(callback)
}

#[component]
pub fn GoogleSignInButton(#[prop(into)] client_id: String, on_credential: Callback<String>) -> impl IntoView {
    let node = NodeRef::<leptos::html::Div>::new();
    let handle = StoredValue::new_local(None::<Closure<dyn FnMut(JsValue)>>);

    Effect::new(move |_| {
        let Some(div) = node.get() else {
            return;
        };
        let el: web_sys::HtmlElement = div.into();
        match render_google_button(&client_id, &el, move |credential| on_credential.run(credential)) {
            Ok(closure) => handle.set_value(Some(closure)),
            Err(e) => log::warn!("[AUTH] Google sign-in unavailable: {:?}", e),
        }
    });

    view! { <div class="google-signin" node_ref=node></div> }
}
