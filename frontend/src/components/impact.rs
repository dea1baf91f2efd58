use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::icons::{ArrowRight, Globe, Leaf, ShieldCheck, TreePine, Wallet};
use crate::sync::RequestGuard;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use gogreen_shared::format::{inr, number};
use gogreen_shared::impact::ImpactSnapshot;
use gogreen_shared::protocol::PublicImpactQuery;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Maximum bar height of the monthly growth chart, in pixels.
const GROWTH_CHART_HEIGHT: u64 = 240;
const MIN_BAR_HEIGHT: u64 = 6;

/// Fallback numbers overlaid with `public-impact` once it answers. A failed
/// request keeps the fallback.
pub fn use_impact_snapshot() -> ReadSignal<ImpactSnapshot> {
    let api = use_api();
    let (snapshot, set_snapshot) = signal(ImpactSnapshot::default());

    let guard = RequestGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel()
    });

    let ticket = guard.begin();
    spawn_local(async move {
        let result = api.call(&PublicImpactQuery).await;
        ticket.apply(result, |result| match result {
            Ok(response) => set_snapshot.update(|s| s.merge(&response)),
            Err(e) => log::warn!("Public impact unavailable, keeping fallback numbers: {e}"),
        });
    });

    snapshot
}

/// The four headline counters shared by the landing and impact pages.
pub fn stat_cards(snapshot: ReadSignal<ImpactSnapshot>, co2_label: &'static str) -> impl IntoView {
    let card = move |label: &'static str, icon: AnyView, value: Signal<String>| {
        view! {
            <article class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="w-fit rounded-2xl bg-primary/10 p-3 text-primary">{icon}</div>
                    <p class="text-4xl font-bold text-primary">{move || value.get()}</p>
                    <p class="text-sm font-semibold tracking-[0.2em] text-base-content/60">{label}</p>
                </div>
            </article>
        }
    };

    view! {
        <div class="grid items-stretch gap-4 md:grid-cols-2 xl:grid-cols-4">
            {card(
                "TOTAL TREES",
                view! { <TreePine attr:class="h-5 w-5" /> }.into_any(),
                Signal::derive(move || snapshot.with(|s| number(s.metrics.trees_planted))),
            )}
            {card(
                co2_label,
                view! { <Leaf attr:class="h-5 w-5" /> }.into_any(),
                Signal::derive(move || snapshot.with(|s| number(s.metrics.co2_offset_kg_per_year))),
            )}
            {card(
                "DONATIONS (INR)",
                view! { <Wallet attr:class="h-5 w-5" /> }.into_any(),
                Signal::derive(move || snapshot.with(|s| inr(s.metrics.donations_inr_total))),
            )}
            {card(
                "ACTIVE DONORS",
                view! { <Globe attr:class="h-5 w-5" /> }.into_any(),
                Signal::derive(move || snapshot.with(|s| number(s.metrics.donors()))),
            )}
        </div>
    }
}

/// Labelled percentage bar.
pub fn rate_bar(
    label: &'static str,
    percent: Signal<f64>,
    class: &'static str,
) -> impl IntoView {
    view! {
        <div>
            <div class="mb-2 flex items-center justify-between text-lg font-semibold">
                <span>{label}</span>
                <span>{move || format!("{}%", percent.get())}</span>
            </div>
            <progress
                class=format!("progress {class} h-4 w-full")
                value=move || percent.get().clamp(0.0, 100.0).to_string()
                max="100"
            ></progress>
        </div>
    }
}

fn growth_chart(snapshot: ReadSignal<ImpactSnapshot>) -> impl IntoView {
    view! {
        <div class="h-80 rounded-box bg-base-200/50 p-5 flex items-end justify-between gap-3">
            {move || {
                snapshot
                    .with(ImpactSnapshot::growth_bars)
                    .into_iter()
                    .map(|(month, trees, percent)| {
                        let height = (percent * GROWTH_CHART_HEIGHT / 100).max(MIN_BAR_HEIGHT);
                        view! {
                            <div class="flex flex-1 flex-col items-center justify-end">
                                <div class="mb-2 text-xs font-semibold text-base-content/60">
                                    {number(trees as f64)}
                                </div>
                                <div
                                    class="w-full max-w-12 rounded-t-xl bg-gradient-to-t from-primary to-secondary"
                                    style=format!("height: {height}px")
                                ></div>
                                <div class="mt-3 text-lg font-semibold text-base-content/70">{month}</div>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

const VERIFICATION_STEPS: [(&str, &str); 3] = [
    (
        "Map Coordinates Captured",
        "Each plantation record stores location coordinates and order metadata for traceability.",
    ),
    (
        "Admin Proof Validation",
        "Internal admin approval and plantation evidence prevent fake or duplicate reporting.",
    ),
    (
        "Publicly Trackable Links",
        "Donors receive tracking and certificate links so impact can be revisited anytime.",
    ),
];

#[component]
pub fn ImpactPage() -> impl IntoView {
    let auth = use_auth();
    let snapshot = use_impact_snapshot();
    let start = move || {
        if auth.is_authenticated_signal().get() {
            AppRoute::DonateTrees
        } else {
            AppRoute::Signup
        }
    };
    let metric = move |pick: fn(&ImpactSnapshot) -> f64| Signal::derive(move || snapshot.with(pick));

    view! {
        <main>
            <section class="bg-gradient-to-br from-primary to-secondary text-primary-content">
                <div class="mx-auto max-w-6xl px-6 py-20">
                    <span class="badge badge-outline gap-2 py-3">
                        <TreePine attr:class="h-4 w-4" />
                        "Public Impact Dashboard"
                    </span>
                    <h1 class="mt-7 max-w-4xl text-5xl font-bold leading-tight md:text-6xl">
                        "Global Impact Dashboard"
                    </h1>
                    <p class="mt-5 max-w-4xl text-xl opacity-85">
                        "Real-time transparency. See how the community is reforesting the planet, one tree at a time."
                    </p>
                </div>
            </section>

            <section class="mx-auto -mt-10 max-w-6xl px-6 pb-12">
                {stat_cards(snapshot, "CO2 REMOVED (KG / YEAR)")}
            </section>

            <section class="mx-auto max-w-6xl px-6 py-3 grid gap-6 lg:grid-cols-2">
                <article class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h2 class="text-4xl font-bold">"Monthly Plantation Growth"</h2>
                        {growth_chart(snapshot)}
                    </div>
                </article>
                <article class="card bg-primary text-primary-content shadow-xl">
                    <div class="card-body">
                        <h2 class="text-4xl font-bold">"Our Commitment"</h2>
                        <p class="mt-3 text-2xl leading-relaxed">
                            "Every donation supports verified plantation activity. We keep operations lean and maximize direct on-ground climate impact."
                        </p>
                        <div class="mt-5 rounded-box bg-white/15 p-4">
                            {move || {
                                snapshot.with(|s| {
                                    format!(
                                        "{}% operations and technology, {}% direct plantation and care.",
                                        s.commitment.operations_share_percent,
                                        s.commitment.plantation_share_percent,
                                    )
                                })
                            }}
                        </div>
                        <div class="mt-8 grid grid-cols-2 gap-4">
                            <div>
                                <p class="text-6xl font-bold">
                                    {move || snapshot.with(|s| format!("{}%", s.commitment.transparency_percent))}
                                </p>
                                <p class="mt-1 text-xl">"Transparent"</p>
                            </div>
                            <div>
                                <p class="text-6xl font-bold">
                                    {move || snapshot.with(|s| s.commitment.monitoring_support.clone())}
                                </p>
                                <p class="mt-1 text-xl">"Monitoring"</p>
                            </div>
                        </div>
                    </div>
                </article>
            </section>

            <section class="mx-auto max-w-6xl px-6 py-10">
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body grid gap-10 lg:grid-cols-2">
                        <div>
                            <h2 class="text-4xl font-bold md:text-5xl">"Verification Framework"</h2>
                            <p class="mt-4 text-lg text-base-content/70">
                                "We measure outcomes, not claims. Impact data is tied to donation and approval records, which keeps reporting consistent and auditable."
                            </p>
                            <div class="mt-9 space-y-6">
                                {VERIFICATION_STEPS
                                    .iter()
                                    .map(|(title, description)| view! {
                                        <div class="flex gap-4">
                                            <div class="mt-1 h-fit rounded-xl bg-primary/10 p-3 text-primary">
                                                <ShieldCheck attr:class="h-6 w-6" />
                                            </div>
                                            <div>
                                                <h3 class="text-2xl font-bold">{*title}</h3>
                                                <p class="mt-1 text-base-content/70">{*description}</p>
                                            </div>
                                        </div>
                                    })
                                    .collect_view()}
                            </div>
                        </div>
                        <div class="rounded-box border border-base-300 bg-base-200/40 p-6">
                            <h3 class="text-3xl font-bold">"Survival Comparison"</h3>
                            <p class="mt-2 text-base-content/70">
                                "Community quality benchmark compared against broad industry figures."
                            </p>
                            <div class="mt-8 space-y-7">
                                {rate_bar(
                                    "Community Survival Rate",
                                    metric(|s| s.metrics.community_survival_rate_percent),
                                    "progress-success",
                                )}
                                {rate_bar(
                                    "Industry Average",
                                    metric(|s| s.metrics.industry_survival_rate_percent),
                                    "progress-neutral",
                                )}
                                {rate_bar(
                                    "Approval Rate",
                                    metric(|s| s.metrics.approval_rate_percent),
                                    "progress-info",
                                )}
                            </div>
                            <div class="mt-9 flex flex-wrap gap-3">
                                {move || view! {
                                    <Link to=start() class="btn btn-primary gap-2">
                                        "Start Planting"
                                        <ArrowRight attr:class="h-4 w-4" />
                                    </Link>
                                }}
                                <Link to=AppRoute::Landing class="btn btn-outline">
                                    "Back to Home"
                                </Link>
                            </div>
                        </div>
                    </div>
                </div>
            </section>
        </main>
    }
}
