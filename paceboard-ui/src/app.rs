//! App Root Component
//!
//! Main application component with routing, the auth gate, and global
//! providers.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{Loading, Nav, Toast};
use crate::pages::{AuthPage, CalendarPage, DashboardPage, DataPage};
use crate::state::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    // Resolve the session once on startup
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let state_for_session = state.clone();
    create_effect(move |_| {
        let state = state_for_session.clone();
        spawn_local(async move {
            match api::fetch_session().await {
                Ok(Some(user)) => {
                    state.user.set(Some(user));
                }
                Ok(None) => {}
                Err(e) => {
                    state.show_error(&e);
                }
            }
            state.auth_checked.set(true);
        });
    });

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                // Navigation header
                <Nav />

                // Main content area
                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <Routes>
                        <Route path="/auth" view=AuthPage />
                        <Route path="/" view=|| view! {
                            <RequireAuth>
                                <CalendarPage />
                            </RequireAuth>
                        } />
                        <Route path="/data" view=|| view! {
                            <RequireAuth>
                                <DataPage />
                            </RequireAuth>
                        } />
                        <Route path="/dashboard" view=|| view! {
                            <RequireAuth>
                                <DashboardPage />
                            </RequireAuth>
                        } />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                // Footer with session status
                <Footer />

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Auth gate: unauthenticated visitors are sent to /auth
#[component]
fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        {move || {
            if !state.auth_checked.get() {
                // Still resolving the session
                view! { <Loading /> }.into_view()
            } else if state.user.get().is_none() {
                view! { <Redirect path="/auth" /> }.into_view()
            } else {
                children().into_view()
            }
        }}
    }
}

/// Footer component showing who is signed in
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                // Session status
                <div class="flex items-center space-x-2">
                    {move || {
                        match state.user.get() {
                            Some(user) => view! {
                                <span class="flex items-center space-x-1 text-green-400">
                                    <span class="w-2 h-2 bg-green-400 rounded-full" />
                                    <span>{format!("Signed in as @{}", user.handle)}</span>
                                </span>
                            }.into_view(),
                            None => view! {
                                <span class="flex items-center space-x-1 text-gray-400">
                                    <span class="w-2 h-2 bg-gray-500 rounded-full" />
                                    <span>"Signed out"</span>
                                </span>
                            }.into_view(),
                        }
                    }}
                </div>

                // Loading indicator
                {move || {
                    if state.loading.get() {
                        view! {
                            <div class="flex items-center space-x-2 text-primary-400">
                                <div class="loading-spinner w-4 h-4" />
                                <span>"Loading..."</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>
        </footer>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Go to Calendar"
            </A>
        </div>
    }
}
