use incident_core::filter::FilterState;
use incident_core::incident::{status, Severity};
use incident_core::user::User;
use leptos::*;

use crate::directory::use_directory;

/// The status chips offered on the dashboard. Rarer states stay
/// reachable through search.
const STATUS_CHIPS: [&str; 4] = [
    status::DETECTED,
    status::INVESTIGATING,
    status::MITIGATED,
    status::RESOLVED,
];

#[component]
pub fn FiltersBar(filters: RwSignal<FilterState>) -> impl IntoView {
    let directory = use_directory();

    view! {
      <div class="filters">
        <input
          class="search"
          type="search"
          placeholder="Search by title or ID..."
          prop:value=move || filters.with(|f| f.search.clone())
          on:input=move |ev| filters.update(|f| f.search = event_target_value(&ev))
        />
        <div class="chip-row">
          {Severity::ALL
              .into_iter()
              .map(|sev| {
                  view! {
                    <button
                      class="chip"
                      class:active=move || filters.with(|f| f.severities.contains(&sev))
                      on:click=move |_| filters.update(|f| f.toggle_severity(sev))
                    >{sev.code()}</button>
                  }
              })
              .collect_view()}
        </div>
        <div class="chip-row">
          {STATUS_CHIPS
              .into_iter()
              .map(|chip| {
                  view! {
                    <button
                      class="chip"
                      class:active=move || filters.with(|f| f.statuses.contains(chip))
                      on:click=move |_| filters.update(|f| f.toggle_status(chip))
                    >{chip}</button>
                  }
              })
              .collect_view()}
        </div>
        <select
          class="assignee"
          prop:value=move || filters.with(|f| f.assignee_id.clone().unwrap_or_default())
          on:change=move |ev| {
              let value = event_target_value(&ev);
              filters.update(|f| f.assignee_id = (!value.is_empty()).then_some(value));
          }
        >
          <option value="">"All Assignees"</option>
          <For
            each=move || directory.directory().get().users().to_vec()
            key=|user| user.id.clone()
            children=move |user: User| {
                view! { <option value=user.id.clone()>{user.full_name.clone()}</option> }
            }
          />
        </select>
        <Show when=move || filters.with(|f| f.active_count() > 0) fallback=|| ()>
          <button class="ghost" on:click=move |_| filters.update(|f| f.clear_facets())>
            {move || filters.with(|f| format!("Clear All ({})", f.active_count()))}
          </button>
        </Show>
      </div>
    }
}
