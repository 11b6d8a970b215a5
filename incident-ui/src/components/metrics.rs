use incident_core::stats::{Analytics, AnalyticsWindow};
use incident_core::timestamp;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;

/// Response-time analytics over a selectable lookback window. The
/// first load takes the API's default window and syncs the selector to
/// whatever the response reports it covered.
#[component]
pub fn MetricsPanel() -> impl IntoView {
    let window_choice = create_rw_signal(AnalyticsWindow::default());
    let analytics = create_rw_signal(None::<Analytics>);
    let loading = create_rw_signal(true);
    let error = create_rw_signal(None::<String>);

    spawn_local(async move {
        match api::fetch_analytics().await {
            Ok(fetched) => {
                if let Some(window) = AnalyticsWindow::from_days(fetched.time_window_days) {
                    window_choice.set(window);
                }
                analytics.set(Some(fetched));
            }
            Err(err) => error.set(Some(err.to_string())),
        }
        loading.set(false);
    });

    let select_window = move |window: AnalyticsWindow| {
        window_choice.set(window);
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api::fetch_analytics_window(window).await {
                Ok(fetched) => analytics.set(Some(fetched)),
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        });
    };

    let metric = move |pick: fn(&Analytics) -> String| {
        analytics.with(|a| a.as_ref().map(pick).unwrap_or_else(|| "-".to_string()))
    };

    let volume_bars = move || {
        analytics.with(|a| {
            a.as_ref()
                .map(|a| {
                    let peak = a.peak_volume();
                    a.volume_trend
                        .iter()
                        .map(|point| (point.date.clone(), point.count, peak))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
    };

    view! {
      <div class="panel">
        <div class="toolbar">
          <h2>"Analytics"</h2>
          <div class="chip-row">
            {AnalyticsWindow::ALL
                .into_iter()
                .map(|window| {
                    view! {
                      <button
                        class="chip"
                        class:active=move || window_choice.get() == window
                        on:click=move |_| select_window(window)
                      >{window.label()}</button>
                    }
                })
                .collect_view()}
          </div>
        </div>

        {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
        <Show when=move || loading.get() fallback=|| ()>
          <p class="meta">"Loading analytics..."</p>
        </Show>

        <div class="stat-grid">
          <div class="stat-card">
            <span class="stat-label">"MTTR"</span>
            <span class="stat-value">
              {move || metric(|a| format!("{:.1} h", a.mttr_hours))}
            </span>
          </div>
          <div class="stat-card">
            <span class="stat-label">"MTTA"</span>
            <span class="stat-value">
              {move || metric(|a| format!("{:.1} m", a.mtta_minutes))}
            </span>
          </div>
          <div class="stat-card">
            <span class="stat-label">"SLA Breaches"</span>
            <span class="stat-value">
              {move || metric(|a| a.total_breaches.to_string())}
            </span>
          </div>
          <div class="stat-card">
            <span class="stat-label">"Breach Rate"</span>
            <span class="stat-value">
              {move || metric(|a| format!("{:.1}%", a.sla_breach_rate))}
            </span>
          </div>
        </div>

        <div class="volume">
          <h3>"Incident Volume"</h3>
          <For
            each=volume_bars
            key=|(date, count, _)| (date.clone(), *count)
            children=move |(date, count, peak): (String, u64, u64)| {
                let width = count * 100 / peak;
                view! {
                  <div class="volume-row">
                    <span class="meta">{timestamp::date_label(&date)}</span>
                    <div class="volume-bar">
                      <div class="volume-fill" style:width=format!("{width}%")></div>
                    </div>
                    <span>{count}</span>
                  </div>
                }
            }
          />
          <Show
            when=move || {
                !loading.get()
                    && analytics.with(|a| {
                        a.as_ref().map(|a| a.volume_trend.is_empty()).unwrap_or(false)
                    })
            }
            fallback=|| ()
          >
            <p class="empty">"No incidents in this window."</p>
          </Show>
        </div>
      </div>
    }
}
