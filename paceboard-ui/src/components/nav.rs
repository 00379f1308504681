//! Navigation Component
//!
//! Header navigation bar with logo, links, and the sign-out button.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let signed_in = move || state.user.get().is_some();

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"📈"</span>
                        <span class="text-xl font-bold text-white">"Paceboard"</span>
                    </A>

                    // Navigation links (only when signed in)
                    {move || {
                        if signed_in() {
                            view! {
                                <div class="flex items-center space-x-1">
                                    <NavLink href="/" label="Calendar" />
                                    <NavLink href="/data" label="Data" />
                                    <NavLink href="/dashboard" label="Dashboard" />
                                    <SignOutButton />
                                </div>
                            }.into_view()
                        } else {
                            view! {}.into_view()
                        }
                    }}
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
        >
            {label}
        </A>
    }
}

/// Sign-out button: revokes the session then clears local state
#[component]
fn SignOutButton() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let on_click = move |_| {
        let state = state.clone();
        spawn_local(async move {
            match api::logout().await {
                Ok(()) => {
                    state.reset();
                    state.show_success("Signed out");
                }
                Err(e) => {
                    state.show_error(&e);
                }
            }
        });
    };

    view! {
        <button
            on:click=on_click
            class="ml-2 px-4 py-2 rounded-lg text-gray-400 hover:text-white hover:bg-gray-700 transition-colors"
        >
            "Sign out"
        </button>
    }
}
