use incident_core::incident::{DashboardTallies, Incident};
use leptos::*;

#[component]
pub fn StatCards(incidents: RwSignal<Vec<Incident>>) -> impl IntoView {
    let tallies = create_memo(move |_| incidents.with(|list| DashboardTallies::tally(list)));
    view! {
      <div class="stat-grid">
        <div class="stat-card">
          <span class="stat-label">"Critical (SEV1)"</span>
          <span class="stat-value error">{move || tallies.get().critical}</span>
        </div>
        <div class="stat-card">
          <span class="stat-label">"Investigating"</span>
          <span class="stat-value warn">{move || tallies.get().investigating}</span>
        </div>
        <div class="stat-card">
          <span class="stat-label">"Active"</span>
          <span class="stat-value">{move || tallies.get().active}</span>
        </div>
      </div>
    }
}
