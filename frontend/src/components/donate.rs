use crate::api::use_api;
use crate::auth::use_auth;
use crate::checkout::{
    CUSTOM_OBJECTIVE, DASHBOARD_REDIRECT_DELAY, DonationDraft, OBJECTIVE_OPTIONS, donate,
};
use crate::components::common::{Flash, Notice};
use crate::components::icons::{MapPin, TreePine};
use crate::search::LocationSearch;
use crate::sync::RequestGuard;
use crate::web::razorpay::RazorpayGateway;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use gogreen_shared::protocol::PaymentConfigQuery;
use gogreen_shared::{GeocodeResult, PaymentConfig};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DonatePage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();
    let user = auth.user();

    let draft = RwSignal::new(DonationDraft::for_user(user.get_untracked().as_ref()));
    let (config, set_config) = signal(PaymentConfig::default());
    let (results, set_results) = signal(Vec::<GeocodeResult>::new());
    let (searching, set_searching) = signal(false);
    let (processing, set_processing) = signal(false);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    let search = LocationSearch::new(api.clone());
    let guard = RequestGuard::new();
    on_cleanup({
        let search = search.clone();
        let guard = guard.clone();
        move || {
            search.cancel();
            guard.cancel();
        }
    });

    // Contact fields track the session record.
    Effect::new(move |_| {
        if let Some(current) = user.get() {
            draft.update(|d| {
                d.full_name = current.full_name;
                d.email = current.email;
                d.phone = current.phone;
            });
        }
    });

    {
        let api = api.clone();
        let ticket = guard.begin();
        spawn_local(async move {
            let result = api.call(&PaymentConfigQuery).await;
            ticket.apply(result, |result| match result {
                Ok(loaded) => set_config.set(loaded.normalized()),
                Err(e) => set_flash.set(Some(e.into())),
            });
        });
    }

    let on_location = {
        let search = search.clone();
        move |ev| {
            let text = event_target_value(&ev);
            draft.update(|d| d.set_location_text(&text));
            let Some(lookup) = search.input(&text) else {
                set_results.set(Vec::new());
                set_searching.set(false);
                return;
            };
            set_searching.set(true);
            spawn_local(async move {
                // None: superseded by a newer keystroke, which owns the spinner
                let Some(result) = lookup.await else {
                    return;
                };
                set_searching.set(false);
                match result {
                    Ok(found) => set_results.set(found),
                    Err(e) => {
                        set_results.set(Vec::new());
                        set_flash.set(Some(e.into()));
                    }
                }
            });
        }
    };

    let select_location = Callback::new(move |place: GeocodeResult| {
        search.cancel();
        draft.update(|d| d.select_location(&place));
        set_results.set(Vec::new());
        set_searching.set(false);
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_flash.set(None);
        set_processing.set(true);

        let api = api.clone();
        let snapshot = draft.get_untracked();
        let config = config.get_untracked();
        spawn_local(async move {
            match donate(&api, &RazorpayGateway, &snapshot, &config).await {
                Ok(receipt) => {
                    set_flash.set(Some(Flash::success(receipt.message)));
                    set_timeout(
                        move || router.navigate_to(AppRoute::Dashboard),
                        DASHBOARD_REDIRECT_DELAY,
                    );
                }
                Err(e) => set_flash.set(Some(e.into())),
            }
            set_processing.set(false);
        });
    };

    let total = move || {
        let price = config.with(|c| c.tree_price_inr);
        draft.with(|d| d.estimated_total_inr(price))
    };

    view! {
        <div class="max-w-3xl mx-auto px-4 py-10">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body gap-4">
                    <div class="flex items-center gap-3">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <TreePine attr:class="h-7 w-7" />
                        </div>
                        <div>
                            <h1 class="text-3xl font-bold text-primary">"Donate Trees"</h1>
                            <p class="text-base-content/70 text-sm">
                                "Choose your trees, pin a location and pay securely with Razorpay."
                            </p>
                        </div>
                    </div>

                    <Notice flash=flash />

                    <form class="grid md:grid-cols-2 gap-4" on:submit=on_submit>
                        <input
                            type="text"
                            placeholder="Full Name"
                            class="input input-bordered w-full"
                            required
                            prop:value=move || draft.with(|d| d.full_name.clone())
                            on:input=move |ev| draft.update(|d| d.full_name = event_target_value(&ev))
                        />
                        <input
                            type="email"
                            class="input input-bordered w-full bg-base-200 cursor-not-allowed"
                            readonly
                            prop:value=move || draft.with(|d| d.email.clone())
                        />
                        <input
                            type="tel"
                            placeholder="Phone Number"
                            class="input input-bordered w-full"
                            required
                            prop:value=move || draft.with(|d| d.phone.clone())
                            on:input=move |ev| draft.update(|d| d.phone = event_target_value(&ev))
                        />
                        <input
                            type="number"
                            min="1"
                            placeholder="Number of Trees"
                            class="input input-bordered w-full"
                            required
                            prop:value=move || draft.with(|d| d.number_of_trees.clone())
                            on:input=move |ev| draft.update(|d| d.number_of_trees = event_target_value(&ev))
                        />
                        <input
                            type="text"
                            placeholder="Preferred Tree Species (optional)"
                            class="input input-bordered w-full md:col-span-2"
                            prop:value=move || draft.with(|d| d.tree_species.clone())
                            on:input=move |ev| draft.update(|d| d.tree_species = event_target_value(&ev))
                        />

                        <div class="relative md:col-span-2">
                            <label class="input input-bordered flex items-center gap-2 w-full">
                                <MapPin attr:class="h-4 w-4 opacity-60" />
                                <input
                                    type="text"
                                    class="grow"
                                    placeholder="Planting Location (search the map)"
                                    required
                                    prop:value=move || draft.with(|d| d.planting_location.clone())
                                    on:input=on_location
                                />
                            </label>
                            <Show when=move || searching.get()>
                                <p class="text-xs text-base-content/60 mt-1">"Searching locations..."</p>
                            </Show>
                            <Show when=move || results.with(|r| !r.is_empty())>
                                <ul class="menu absolute top-full left-0 right-0 z-10 mt-1 bg-base-100 rounded-box shadow-lg max-h-56 overflow-y-auto flex-nowrap">
                                    <For
                                        each=move || results.get().into_iter().enumerate()
                                        key=|(index, place)| format!("{}-{index}", place.place_name)
                                        children=move |(_, place)| {
                                            let label = place.place_name.clone();
                                            view! {
                                                <li>
                                                    <button
                                                        type="button"
                                                        class="text-left text-sm"
                                                        on:click=move |_| select_location.run(place.clone())
                                                    >
                                                        {label}
                                                    </button>
                                                </li>
                                            }
                                        }
                                    />
                                </ul>
                            </Show>
                        </div>

                        <select
                            class="select select-bordered w-full"
                            prop:value=move || draft.with(|d| d.objective.clone())
                            on:change=move |ev| draft.update(|d| d.objective = event_target_value(&ev))
                        >
                            {OBJECTIVE_OPTIONS
                                .iter()
                                .map(|option| view! { <option value=*option>{*option}</option> })
                                .collect_view()}
                        </select>

                        {move || {
                            if draft.with(|d| d.objective == CUSTOM_OBJECTIVE) {
                                view! {
                                    <input
                                        type="text"
                                        placeholder="Enter your objective"
                                        class="input input-bordered w-full"
                                        prop:value=move || draft.with(|d| d.custom_objective.clone())
                                        on:input=move |ev| draft.update(|d| d.custom_objective = event_target_value(&ev))
                                    />
                                }
                                .into_any()
                            } else {
                                view! {
                                    <input
                                        type="text"
                                        placeholder="Dedication Name (optional)"
                                        class="input input-bordered w-full"
                                        prop:value=move || draft.with(|d| d.dedication_name.clone())
                                        on:input=move |ev| draft.update(|d| d.dedication_name = event_target_value(&ev))
                                    />
                                }
                                .into_any()
                            }
                        }}

                        <textarea
                            class="textarea textarea-bordered w-full md:col-span-2"
                            rows="4"
                            placeholder="Additional notes (optional)"
                            prop:value=move || draft.with(|d| d.notes.clone())
                            on:input=move |ev| draft.update(|d| d.notes = event_target_value(&ev))
                        ></textarea>

                        <div class="md:col-span-2 rounded-box bg-primary/5 border border-primary/20 p-4">
                            <p class="text-sm text-base-content/80">
                                "Price per tree: "
                                <span class="font-semibold">
                                    {move || format!("INR {}", config.with(|c| c.tree_price_inr))}
                                </span>
                            </p>
                            <p class="text-lg font-bold text-primary">
                                {move || format!("Total: INR {}", total())}
                            </p>
                            {move || {
                                draft.with(|d| {
                                    d.coordinates().map(|(lat, lng)| {
                                        let map_url = d.selected_map_url();
                                        view! {
                                            <div class="text-xs text-base-content/60 mt-1 space-y-1">
                                                <p>{format!("Map pin: {lat}, {lng}")}</p>
                                                {map_url.map(|href| view! {
                                                    <a href=href target="_blank" rel="noreferrer" class="link link-primary font-semibold">
                                                        "Verify selected location on the map"
                                                    </a>
                                                })}
                                            </div>
                                        }
                                    })
                                })
                            }}
                        </div>

                        <button type="submit" class="btn btn-primary md:col-span-2" disabled=processing>
                            <Show when=move || processing.get()>
                                <span class="loading loading-spinner"></span>
                            </Show>
                            {move || {
                                if processing.get() {
                                    "Processing Payment..."
                                } else {
                                    "Proceed To Razorpay Payment"
                                }
                            }}
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
