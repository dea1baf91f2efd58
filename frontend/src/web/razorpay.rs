//! Razorpay Checkout bindings.
//!
//! Loads `checkout.js` on first use, opens the modal and resolves once the
//! donor pays or closes it.

use crate::checkout::{CheckoutGateway, CheckoutIntent, CheckoutOutcome};
use futures::channel::oneshot;
use gogreen_shared::protocol::PaymentConfirmation;
use gogreen_shared::{ApiError, ApiResult};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

const CHECKOUT_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

#[wasm_bindgen]
extern "C" {
    type Razorpay;

    #[wasm_bindgen(constructor, catch)]
    fn new(options: &JsValue) -> Result<Razorpay, JsValue>;

    #[wasm_bindgen(method)]
    fn open(this: &Razorpay);
}

#[derive(Serialize)]
struct Prefill<'a> {
    name: &'a str,
    email: &'a str,
    contact: &'a str,
}

#[derive(Serialize)]
struct Notes<'a> {
    location: &'a str,
    objective: &'a str,
}

#[derive(Serialize)]
struct Theme<'a> {
    color: &'a str,
}

#[derive(Serialize)]
struct CheckoutOptions<'a> {
    key: &'a str,
    amount: u64,
    currency: &'a str,
    name: &'a str,
    description: &'a str,
    order_id: &'a str,
    prefill: Prefill<'a>,
    notes: Notes<'a>,
    theme: Theme<'a>,
}

impl<'a> From<&'a CheckoutIntent> for CheckoutOptions<'a> {
    fn from(intent: &'a CheckoutIntent) -> Self {
        Self {
            key: &intent.key,
            amount: intent.amount_paise,
            currency: &intent.currency,
            name: &intent.name,
            description: &intent.description,
            order_id: &intent.order_id,
            prefill: Prefill {
                name: &intent.prefill_name,
                email: &intent.prefill_email,
                contact: &intent.prefill_contact,
            },
            notes: Notes {
                location: &intent.location,
                objective: &intent.objective,
            },
            theme: Theme {
                color: &intent.theme_color,
            },
        }
    }
}

fn load_failed() -> ApiError {
    ApiError::checkout("Unable to load Razorpay checkout")
}

fn script_loaded() -> bool {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("Razorpay")).ok())
        .is_some_and(|value| !value.is_undefined())
}

/// Appends the checkout script once and waits for it.
async fn ensure_script() -> ApiResult<()> {
    if script_loaded() {
        return Ok(());
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(load_failed)?;
    let body = document.body().ok_or_else(load_failed)?;
    let script = document
        .create_element("script")
        .map_err(|_| load_failed())?
        .dyn_into::<web_sys::HtmlScriptElement>()
        .map_err(|_| load_failed())?;
    script.set_src(CHECKOUT_SCRIPT_URL);

    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let resolve = |ok: bool| {
        let tx = tx.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(ok);
            }
        })
    };
    let on_load = resolve(true);
    let on_error = resolve(false);
    script.set_onload(Some(on_load.as_ref().unchecked_ref()));
    script.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    body.append_child(&script).map_err(|_| load_failed())?;

    match rx.await {
        Ok(true) => Ok(()),
        _ => {
            log::warn!("Razorpay checkout script failed to load");
            Err(load_failed())
        }
    }
}

fn set_property(target: &JsValue, key: &str, value: &JsValue) -> ApiResult<()> {
    js_sys::Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|_| load_failed())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RazorpayGateway;

#[async_trait::async_trait(?Send)]
impl CheckoutGateway for RazorpayGateway {
    async fn open(&self, intent: CheckoutIntent) -> ApiResult<CheckoutOutcome> {
        ensure_script().await?;

        let options = serde_wasm_bindgen::to_value(&CheckoutOptions::from(&intent))
            .map_err(|e| ApiError::Encoding(e.to_string()))?;

        let (tx, rx) = oneshot::channel::<ApiResult<CheckoutOutcome>>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let settle = {
            let tx = tx.clone();
            move |outcome: ApiResult<CheckoutOutcome>| {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(outcome);
                }
            }
        };

        let on_paid = {
            let settle = settle.clone();
            Closure::<dyn FnMut(JsValue)>::new(move |response: JsValue| {
                let outcome = serde_wasm_bindgen::from_value::<PaymentConfirmation>(response)
                    .map(CheckoutOutcome::Paid)
                    .map_err(|_| ApiError::checkout("Unexpected response from Razorpay"));
                settle(outcome);
            })
        };
        let on_dismiss = Closure::<dyn FnMut()>::new(move || settle(Ok(CheckoutOutcome::Dismissed)));

        let modal = js_sys::Object::new();
        set_property(&modal, "ondismiss", on_dismiss.as_ref())?;
        set_property(&options, "modal", &modal)?;
        set_property(&options, "handler", on_paid.as_ref())?;

        let checkout = Razorpay::new(&options).map_err(|_| load_failed())?;
        checkout.open();

        // the closures above must outlive the modal
        let outcome = rx
            .await
            .unwrap_or_else(|_| Err(ApiError::checkout("Checkout closed unexpectedly")));
        drop((on_paid, on_dismiss));
        outcome
    }
}
