use incident_core::filter::{filter_incidents, FilterState};
use incident_core::incident::Incident;
use incident_core::timestamp;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::components::action_modal::ActionModal;
use crate::components::create_modal::CreateIncidentModal;
use crate::components::filters_bar::FiltersBar;
use crate::components::history::HistoryPanel;
use crate::components::stats::StatCards;
use crate::components::{severity_class, status_class};
use crate::directory::use_directory;

/// The incident feed: tallies on top, filters and table below, with the
/// history slide-over and the create/action modals hanging off it.
#[component]
pub fn Dashboard() -> impl IntoView {
    let directory = use_directory();

    let incidents = create_rw_signal(Vec::<Incident>::new());
    let loading = create_rw_signal(true);
    let error = create_rw_signal(None::<String>);
    let filters = create_rw_signal(FilterState::default());
    let selected = create_rw_signal(None::<Incident>);
    let action_target = create_rw_signal(None::<Incident>);
    let create_open = create_rw_signal(false);

    let load_incidents = move || {
        loading.set(true);
        spawn_local(async move {
            match api::fetch_incidents().await {
                Ok(list) => {
                    incidents.set(list);
                    error.set(None);
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        });
    };
    load_incidents();

    let visible = create_memo(move |_| {
        incidents.with(|list| filters.with(|filters| filter_incidents(list, filters)))
    });

    view! {
      <div class="stack">
        <StatCards incidents=incidents/>

        <div class="panel">
          <div class="toolbar">
            <FiltersBar filters=filters/>
            <div class="row">
              <button class="ghost" on:click=move |_| load_incidents()>"Refresh"</button>
              <button class="primary" on:click=move |_| create_open.set(true)>
                "Declare Incident"
              </button>
            </div>
          </div>

          <Show when=move || error.get().is_some() fallback=|| ()>
            <p class="error">{move || error.get().unwrap_or_default()}</p>
          </Show>
          <Show when=move || loading.get() && incidents.with(|list| list.is_empty()) fallback=|| ()>
            <p class="meta">"Loading incidents..."</p>
          </Show>

          <table class="incident-table">
            <thead>
              <tr>
                <th>"Severity"</th>
                <th>"Incident"</th>
                <th>"Status"</th>
                <th>"Assignee"</th>
                <th>"Updated"</th>
                <th></th>
              </tr>
            </thead>
            <tbody>
              <For
                each=move || visible.get()
                key=|incident| (incident.id.clone(), incident.updated_at.clone())
                children=move |incident: Incident| {
                    let row_target = incident.clone();
                    let manage_target = incident.clone();
                    let owner_id = incident.owner_id.clone();
                    let updated = timestamp::compact_label(&incident.updated_at);
                    view! {
                      <tr class="incident-row" on:click=move |_| selected.set(Some(row_target.clone()))>
                        <td>
                          <span class=format!("badge {}", severity_class(incident.severity))>
                            {incident.severity.code()}
                          </span>
                        </td>
                        <td>
                          <div class="title">{incident.title.clone()}</div>
                          <div class="meta mono">{incident.short_id().to_string()}</div>
                        </td>
                        <td>
                          <span class=format!("pill {}", status_class(&incident.status))>
                            {incident.status.clone()}
                          </span>
                        </td>
                        <td>{move || directory.display_name(owner_id.as_deref())}</td>
                        <td class="meta">{updated}</td>
                        <td>
                          <button
                            class="ghost"
                            on:click=move |ev| {
                                ev.stop_propagation();
                                action_target.set(Some(manage_target.clone()));
                            }
                          >"Manage"</button>
                        </td>
                      </tr>
                    }
                }
              />
            </tbody>
          </table>

          <Show when=move || !loading.get() && visible.with(|list| list.is_empty()) fallback=|| ()>
            <p class="meta empty">"No incidents match the current filters."</p>
          </Show>
        </div>
      </div>
      <HistoryPanel selected=selected/>
      <CreateIncidentModal open=create_open on_created=move |_| load_incidents()/>
      <ActionModal target=action_target on_done=move |_| load_incidents()/>
    }
}
