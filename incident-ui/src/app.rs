use leptos::*;

use crate::components::admin::AdminConsole;
use crate::components::dashboard::Dashboard;
use crate::components::header::AppHeader;
use crate::components::register::RegisterOrgView;
use crate::directory::DirectoryStore;
use crate::route::{self, Route};
use crate::session::{use_session, SessionStore};

/// App shell. Owns the session and directory contexts and swaps the
/// main view on the URL hash.
#[component]
pub fn App() -> impl IntoView {
    let session = SessionStore::init();
    let directory = DirectoryStore::init();
    provide_context(session);
    provide_context(directory);

    let route = route::init();

    create_effect(move |_| {
        if session.is_signed_in() {
            directory.refresh();
        }
    });

    view! {
      <div class="app">
        <Show when=move || session.is_signed_in() fallback=|| view! { <SignedOut/> }>
          <AppHeader/>
          <main class="content">
            {move || match route.get() {
                Route::Dashboard => view! { <Dashboard/> }.into_view(),
                Route::Admin => view! { <AdminConsole/> }.into_view(),
                Route::Register => view! { <RegisterOrgView/> }.into_view(),
            }}
          </main>
        </Show>
      </div>
    }
}

#[component]
fn SignedOut() -> impl IntoView {
    let session = use_session();
    view! {
      <div class="signin panel">
        <h1>"IncidentFlow"</h1>
        <p class="meta">
          "No active session. Sign in through your identity provider, then check again."
        </p>
        <button class="primary" on:click=move |_| session.reload()>"Check again"</button>
      </div>
    }
}
