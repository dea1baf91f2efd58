use crate::auth::use_auth;
use crate::components::icons::{ArrowRight, Globe, Leaf, ShieldCheck, Sparkles, TreePine};
use crate::components::impact::{rate_bar, stat_cards, use_impact_snapshot};
use crate::components::reviews::CommunityReviews;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

const HERO_IMAGE: &str =
    "https://images.unsplash.com/photo-1448375240586-882707db888b?auto=format&fit=crop&w=2200&q=80";
const PLANTING_IMAGE: &str =
    "https://images.unsplash.com/photo-1466611653911-95081537e5b7?auto=format&fit=crop&w=1400&q=80";

fn feature(icon: AnyView, title: &'static str, body: &'static str) -> impl IntoView {
    view! {
        <article class="card bg-base-100 shadow-xl transition hover:-translate-y-1">
            <div class="card-body">
                <div class="w-fit rounded-2xl bg-primary/10 p-4 text-primary">{icon}</div>
                <h3 class="text-3xl font-bold">{title}</h3>
                <p class="mt-2 text-lg leading-relaxed text-base-content/70">{body}</p>
            </div>
        </article>
    }
}

#[component]
pub fn LandingPage() -> impl IntoView {
    let auth = use_auth();
    let snapshot = use_impact_snapshot();
    let plant_target = move || {
        if auth.is_authenticated_signal().get() {
            AppRoute::DonateTrees
        } else {
            AppRoute::Signup
        }
    };

    view! {
        <div>
            <section class="relative min-h-[82vh] overflow-hidden">
                <img src=HERO_IMAGE alt="Forest at sunrise" class="absolute inset-0 h-full w-full object-cover" />
                <div class="absolute inset-0 bg-gradient-to-b from-black/70 via-black/50 to-base-200"></div>
                <div class="relative z-10 mx-auto flex min-h-[82vh] max-w-6xl items-center px-6 py-20">
                    <div class="w-full text-center text-white">
                        <span class="badge badge-outline gap-2 px-5 py-4 text-white border-white/30 bg-white/10">
                            <Sparkles attr:class="h-4 w-4 text-success" />
                            "Live Impact Tracker"
                        </span>
                        <h1 class="mx-auto mt-8 max-w-4xl text-5xl font-bold leading-tight md:text-7xl">
                            "Plant Trees."
                            <span class="block text-success">"Heal The Planet."</span>
                        </h1>
                        <p class="mx-auto mt-6 max-w-3xl text-lg text-white/85 md:text-2xl">
                            "Join the green movement to offset carbon footprints. Track every plantation and watch measurable impact grow over time."
                        </p>
                        <div class="mt-10 flex flex-col items-center justify-center gap-4 sm:flex-row">
                            {move || view! {
                                <Link to=plant_target() class="btn btn-primary btn-lg gap-2">
                                    "Plant a Tree Now"
                                    <ArrowRight attr:class="h-5 w-5" />
                                </Link>
                            }}
                            <Link to=AppRoute::Impact class="btn btn-outline btn-lg text-white border-white/40">
                                "View Public Impact"
                            </Link>
                        </div>
                    </div>
                </div>
            </section>

            <section class="mx-auto -mt-14 max-w-6xl px-6 pb-14 relative z-10">
                {stat_cards(snapshot, "CO2 OFFSET (KG / YEAR)")}
            </section>

            <section class="mx-auto max-w-6xl px-6 py-14">
                <div class="mb-12 text-center">
                    <h2 class="text-4xl font-bold md:text-5xl">"Complete Transparency"</h2>
                    <p class="mx-auto mt-4 max-w-3xl text-xl text-base-content/70">
                        "We believe in showing, not just telling. Each donation is trackable, auditable, and built for long-term trust."
                    </p>
                </div>
                <div class="grid gap-6 md:grid-cols-3">
                    {feature(
                        view! { <Globe attr:class="h-7 w-7" /> }.into_any(),
                        "GPS Tracking",
                        "Every plantation request is linked to real map coordinates so anyone can verify where trees are growing.",
                    )}
                    {feature(
                        view! { <ShieldCheck attr:class="h-7 w-7" /> }.into_any(),
                        "Verified Impact",
                        "Orders move from payment to admin approval with proof updates so impact is transparent, not assumed.",
                    )}
                    {feature(
                        view! { <TreePine attr:class="h-7 w-7" /> }.into_any(),
                        "Species Diversity",
                        "Native and climate-appropriate tree choices improve biodiversity and long-term campus resilience.",
                    )}
                </div>
            </section>

            <section class="mx-auto max-w-6xl px-6 py-16">
                <div class="grid items-stretch gap-10 rounded-[2rem] bg-base-100 p-8 shadow-xl lg:grid-cols-2 lg:p-12">
                    <div class="relative overflow-hidden rounded-3xl">
                        <img src=PLANTING_IMAGE alt="Planting a sapling" class="h-full min-h-80 w-full object-cover" />
                        <div class="absolute bottom-6 left-6 badge badge-neutral gap-2 py-4">
                            <Leaf attr:class="h-4 w-4 text-success" />
                            "Verified campus plantation"
                        </div>
                    </div>
                    <div class="flex flex-col justify-center">
                        <h2 class="text-5xl font-bold leading-tight">
                            "Our Impact vs."
                            <span class="block text-primary">"Global Need"</span>
                        </h2>
                        <p class="mt-6 text-xl leading-relaxed text-base-content/70">
                            "While deforestation continues at an alarming pace, our community is pushing back with verified plantation and consistent survival monitoring."
                        </p>
                        <div class="mt-10 space-y-7">
                            {rate_bar(
                                "Our Survival Rate",
                                Signal::derive(move || snapshot.with(|s| s.metrics.community_survival_rate_percent)),
                                "progress-success",
                            )}
                            {rate_bar(
                                "Industry Average",
                                Signal::derive(move || snapshot.with(|s| s.metrics.industry_survival_rate_percent)),
                                "progress-neutral",
                            )}
                        </div>
                        <Link to=AppRoute::Impact class="btn btn-link px-0 mt-8 w-fit gap-2">
                            "Explore Public Impact Report"
                            <ArrowRight attr:class="h-4 w-4" />
                        </Link>
                    </div>
                </div>
            </section>

            <CommunityReviews />
        </div>
    }
}
