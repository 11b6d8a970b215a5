use leptos::*;

use crate::route::{self, Route};
use crate::session::use_session;

#[component]
pub fn UserNav() -> impl IntoView {
    let session = use_session();
    let open = create_rw_signal(false);

    let go_admin = move || {
        open.set(false);
        route::navigate(Route::Admin);
    };
    let sign_out = move || {
        open.set(false);
        session.sign_out();
        route::navigate(Route::Dashboard);
    };

    view! {
      <div class="user-nav">
        <button class="avatar" on:click=move |_| open.update(|o| *o = !*o)>
          {move || session.user().map(|u| u.initials()).unwrap_or_else(|| "U".to_string())}
        </button>
        <Show when=move || open.get() fallback=|| ()>
          <div class="menu">
            {move || session.user().map(|user| view! {
                <div class="menu-head">
                  <b>{user.display_name().to_string()}</b>
                  <p class="meta">{user.email.clone()}</p>
                  <span class=format!("pill role-{}", user.role.code().to_lowercase())>
                    {user.role.code()}
                  </span>
                </div>
            })}
            <Show when=move || session.role().can_manage_users() fallback=|| ()>
              <button class="menu-item" on:click=move |_| go_admin()>"Admin Console"</button>
            </Show>
            <button class="menu-item" on:click=move |_| sign_out()>"Sign Out"</button>
          </div>
        </Show>
      </div>
    }
}
