use incident_core::incident::Severity;
use incident_core::stats::{AdminStats, UserPerformance};
use incident_core::timestamp;
use incident_core::user::{ChangeUserRole, Role};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::components::metrics::MetricsPanel;
use crate::directory::use_directory;
use crate::session::use_session;

/// Admin-only view: org KPIs, the analytics panel, and the member
/// roster with role management. Non-admins get a notice instead; the
/// API enforces the same boundary underneath.
#[component]
pub fn AdminConsole() -> impl IntoView {
    let session = use_session();
    let directory = use_directory();

    let stats = create_rw_signal(None::<AdminStats>);
    let loading = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);
    let editing = create_rw_signal(None::<UserPerformance>);
    let scorecard = create_rw_signal(None::<UserPerformance>);

    let load_stats = move || {
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_admin_stats().await {
                Ok(fetched) => stats.set(Some(fetched)),
                Err(err) => {
                    let message = if err.is_permission_denied() {
                        "Admins only. Your account does not have access to these metrics."
                            .to_string()
                    } else {
                        err.to_string()
                    };
                    error.set(Some(message));
                }
            }
            loading.set(false);
        });
    };
    load_stats();

    view! {
      <Show
        when=move || session.role().can_manage_users()
        fallback=|| view! {
          <div class="panel narrow">
            <h1>"Admins only"</h1>
            <p class="meta">"This console is restricted to admin accounts."</p>
            <a href="#/">"Back to dashboard"</a>
          </div>
        }
      >
        <div class="stack">
          <div class="panel">
            <div class="toolbar">
              <h1>"Admin Console"</h1>
              <button class="ghost" on:click=move |_| load_stats()>"Refresh"</button>
            </div>
            {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
            <Show when=move || loading.get() fallback=|| ()>
              <p class="meta">"Loading stats..."</p>
            </Show>
            <div class="stat-grid">
              <div class="stat-card">
                <span class="stat-label">"Members"</span>
                <span class="stat-value">
                  {move || stats.with(|s| s.as_ref().map(|s| s.total_users).unwrap_or(0))}
                </span>
              </div>
              <div class="stat-card">
                <span class="stat-label">"Total Incidents"</span>
                <span class="stat-value">
                  {move || stats.with(|s| s.as_ref().map(|s| s.total_incidents).unwrap_or(0))}
                </span>
              </div>
              <div class="stat-card">
                <span class="stat-label">"Active"</span>
                <span class="stat-value">
                  {move || stats.with(|s| s.as_ref().map(|s| s.active_incidents).unwrap_or(0))}
                </span>
              </div>
              <div class="stat-card error">
                <span class="stat-label">"Critical (SEV1)"</span>
                <span class="stat-value">
                  {move || {
                      stats.with(|s| {
                          s.as_ref().map(|s| s.severity_count(Severity::Sev1)).unwrap_or(0)
                      })
                  }}
                </span>
              </div>
            </div>
          </div>

          <MetricsPanel/>

          <div class="panel">
            <h2>"Members"</h2>
            <div class="member-table">
              <div class="member-row head">
                <span>"Member"</span>
                <span>"Role"</span>
                <span>"Joined"</span>
                <span>"Assigned"</span>
                <span>"Resolved"</span>
                <span>"Rate"</span>
                <span></span>
              </div>
              <For
                each=move || stats.with(|s| s.as_ref().map(|s| s.users.clone()).unwrap_or_default())
                key=|user| (user.id.clone(), user.role)
                children=move |user: UserPerformance| {
                    let is_self = session
                        .user()
                        .map(|me| me.id == user.id)
                        .unwrap_or(false);
                    let rate = user.resolution_rate();
                    let open_scorecard = {
                        let user = user.clone();
                        move || scorecard.set(Some(user.clone()))
                    };
                    let open_editor = {
                        let user = user.clone();
                        move || editing.set(Some(user.clone()))
                    };
                    view! {
                      <div class="member-row">
                        <span>
                          <b>{user.full_name.clone()}</b>
                          <p class="meta">{user.email.clone()}</p>
                        </span>
                        <span>
                          <span class=format!("pill role-{}", user.role.code().to_lowercase())>
                            {user.role.code()}
                          </span>
                        </span>
                        <span class="meta">{timestamp::date_label(&user.created_at)}</span>
                        <span>{user.assigned_count}</span>
                        <span>{user.resolved_count}</span>
                        <span>
                          <div class="rate-bar">
                            <div class="rate-fill" style:width=format!("{rate}%")></div>
                          </div>
                          <span class="meta">{format!("{rate}%")}</span>
                        </span>
                        <span class="row">
                          <button class="ghost" on:click=move |_| open_scorecard()>"Stats"</button>
                          <button
                            class="ghost"
                            disabled=is_self
                            on:click=move |_| open_editor()
                          >"Edit"</button>
                        </span>
                      </div>
                    }
                }
              />
            </div>
          </div>

          <EditUserModal
            target=editing
            on_saved=move |_| {
                load_stats();
                directory.refresh();
            }
          />
          <UserScorecard target=scorecard/>
        </div>
      </Show>
    }
}

/// Role editor plus the two-step member removal. Opens from the roster;
/// the Edit button is disabled for the signed-in admin so an org cannot
/// lock itself out here.
#[component]
fn EditUserModal(
    target: RwSignal<Option<UserPerformance>>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let role_choice = create_rw_signal(Role::Engineer);
    let busy = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);
    let remove_armed = create_rw_signal(false);

    create_effect(move |_| {
        if let Some(user) = target.get() {
            role_choice.set(user.role);
            error.set(None);
            remove_armed.set(false);
        }
    });

    let save = move || {
        let Some(user) = target.get_untracked() else { return };
        let body = ChangeUserRole {
            role: role_choice.get_untracked(),
        };
        busy.set(true);
        spawn_local(async move {
            match api::change_user_role(&user.id, &body).await {
                Ok(()) => {
                    target.set(None);
                    on_saved.call(());
                }
                Err(err) => {
                    log::error!("role change failed: {err}");
                    error.set(Some(err.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let remove = move || {
        if !remove_armed.get_untracked() {
            remove_armed.set(true);
            return;
        }
        let Some(user) = target.get_untracked() else { return };
        busy.set(true);
        spawn_local(async move {
            match api::delete_user(&user.id).await {
                Ok(()) => {
                    target.set(None);
                    on_saved.call(());
                }
                Err(err) => {
                    log::error!("member removal failed: {err}");
                    error.set(Some(err.to_string()));
                }
            }
            busy.set(false);
        });
    };

    view! {
      <Show when=move || target.with(|t| t.is_some()) fallback=|| ()>
        <div class="overlay" on:click=move |_| target.set(None)>
          <div class="modal" on:click=|ev| ev.stop_propagation()>
            <h2>"Edit Member"</h2>
            <p class="meta">
              {move || target.with(|t| t.as_ref().map(|u| u.full_name.clone()).unwrap_or_default())}
            </p>
            <label class="field">
              <span>"Role"</span>
              <select
                prop:value=move || role_choice.get().code().to_string()
                on:change=move |ev| {
                    role_choice.set(Role::from_label_lossy(&event_target_value(&ev)));
                }
              >
                {Role::ALL
                    .into_iter()
                    .map(|role| {
                        view! { <option value=role.code()>{role.description()}</option> }
                    })
                    .collect_view()}
              </select>
            </label>
            {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
            <div class="modal-foot spread">
              <button class="danger" disabled=move || busy.get() on:click=move |_| remove()>
                {move || if remove_armed.get() { "Confirm Removal" } else { "Remove Member" }}
              </button>
              <div class="row">
                <button class="ghost" on:click=move |_| target.set(None)>"Cancel"</button>
                <button class="primary" disabled=move || busy.get() on:click=move |_| save()>
                  {move || if busy.get() { "Saving..." } else { "Save" }}
                </button>
              </div>
            </div>
          </div>
        </div>
      </Show>
    }
}

/// Read-only per-member activity card.
#[component]
fn UserScorecard(target: RwSignal<Option<UserPerformance>>) -> impl IntoView {
    view! {
      <Show when=move || target.with(|t| t.is_some()) fallback=|| ()>
        <div class="overlay" on:click=move |_| target.set(None)>
          <div class="modal" on:click=|ev| ev.stop_propagation()>
            {move || target.with(|t| t.as_ref().map(|user| view! {
                <h2>{user.full_name.clone()}</h2>
                <p class="meta">{user.email.clone()}</p>
                <p>
                  <span class=format!("pill role-{}", user.role.code().to_lowercase())>
                    {user.role.code()}
                  </span>
                  <span class="meta">
                    {format!(" joined {}", timestamp::date_label(&user.created_at))}
                  </span>
                </p>
                <div class="stat-grid">
                  <div class="stat-card">
                    <span class="stat-label">"Assigned"</span>
                    <span class="stat-value">{user.assigned_count}</span>
                  </div>
                  <div class="stat-card">
                    <span class="stat-label">"Resolved"</span>
                    <span class="stat-value">{user.resolved_count}</span>
                  </div>
                  <div class="stat-card">
                    <span class="stat-label">"Resolution Rate"</span>
                    <span class="stat-value">{format!("{}%", user.resolution_rate())}</span>
                  </div>
                  <div class="stat-card">
                    <span class="stat-label">"Comments"</span>
                    <span class="stat-value">{user.comments_made}</span>
                  </div>
                  <div class="stat-card">
                    <span class="stat-label">"Escalations"</span>
                    <span class="stat-value">{user.escalations_triggered}</span>
                  </div>
                </div>
            }))}
            <div class="modal-foot">
              <button class="ghost" on:click=move |_| target.set(None)>"Close"</button>
            </div>
          </div>
        </div>
      </Show>
    }
}
