use crate::components::icons::Star;
use gogreen_shared::ApiError;
use gogreen_shared::format::fallback_avatar_url;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Inline message shown above a form or section.
#[derive(Debug, Clone, PartialEq)]
pub enum Flash {
    Error(String),
    Success(String),
}

impl Flash {
    pub fn error(err: impl ToString) -> Self {
        Self::Error(err.to_string())
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }
}

impl From<ApiError> for Flash {
    fn from(err: ApiError) -> Self {
        Self::error(err)
    }
}

#[component]
pub fn Notice(#[prop(into)] flash: Signal<Option<Flash>>) -> impl IntoView {
    move || {
        flash.get().map(|flash| {
            let (class, text) = match flash {
                Flash::Error(text) => ("alert alert-error text-sm py-2", text),
                Flash::Success(text) => ("alert alert-success text-sm py-2", text),
            };
            view! {
                <div role="alert" class=class>
                    <span>{text}</span>
                </div>
            }
        })
    }
}

#[component]
pub fn Loading(#[prop(into)] text: String) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center gap-3 py-12 text-base-content/60">
            <span class="loading loading-spinner loading-md text-primary"></span>
            <span>{text}</span>
        </div>
    }
}

/// Five stars, the first `rating` filled.
#[component]
pub fn Stars(
    #[prop(into)] rating: Signal<u8>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let size = if class.is_empty() {
        "h-4 w-4".to_string()
    } else {
        class
    };
    view! {
        <div class="flex items-center gap-0.5">
            {(1..=5u8)
                .map(|star| {
                    let size = size.clone();
                    let class = move || {
                        if star <= rating.get() {
                            format!("{size} text-warning fill-current")
                        } else {
                            format!("{size} text-base-content/20")
                        }
                    };
                    view! { <Star attr:class=class /> }
                })
                .collect_view()}
        </div>
    }
}

/// Uploaded avatar when present, else a generated initials image.
#[component]
pub fn Avatar(
    #[prop(into)] name: String,
    #[prop(into)] src: Option<String>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let src = src
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| fallback_avatar_url(&name));
    let class = if class.is_empty() {
        "w-10 h-10".to_string()
    } else {
        class
    };
    view! {
        <div class="avatar">
            <div class=format!("{class} rounded-full ring ring-primary/20")>
                <img src=src alt=name />
            </div>
        </div>
    }
}

/// First file picked in an `<input type="file">` change event.
pub fn selected_file(ev: &web_sys::Event) -> Option<web_sys::File> {
    ev.target()
        .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
        .and_then(|input| input.files())
        .and_then(|files| files.get(0))
}

/// Object URL for previewing a picked image.
pub fn preview_url(file: &web_sys::File) -> Option<String> {
    web_sys::Url::create_object_url_with_blob(file).ok()
}
