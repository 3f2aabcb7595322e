use crate::components::Chip;
use crate::state::{use_auth, use_services, use_toasts};
use leptos::*;
use medisync_core::records::dashboard::{
    alerts, refresh, team_members, AlertSeverity, DashboardStats, TeamStatus,
};
use medisync_core::notifications::Severity;
use medisync_core::UserRole;
use wasm_bindgen_futures::spawn_local;

fn alert_class(severity: AlertSeverity) -> &'static str {
    match severity {
        AlertSeverity::Critical => "error",
        AlertSeverity::Moderate => "warning",
        AlertSeverity::Stable => "success",
    }
}

fn team_class(status: TeamStatus) -> &'static str {
    match status {
        TeamStatus::Active => "success",
        TeamStatus::Standby => "warning",
        TeamStatus::Offline => "muted",
    }
}

#[component]
fn StatCard(#[prop(into)] label: String, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
      <div class="stat">
        <b>{move || value.get()}</b>
        <span class="meta">{label}</span>
      </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let services = use_services();
    let stats = create_rw_signal(DashboardStats::default());
    let refreshing = create_rw_signal(false);

    let is_admin = {
        let auth = auth.clone();
        move || auth.has_role(UserRole::Admin)
    };
    let greeting = move || {
        auth.user
            .with(|u| u.as_ref().map(|u| format!("Welcome back, {}", u.first_name)))
            .unwrap_or_else(|| "Welcome back".to_owned())
    };

    let on_refresh = move |_| {
        if refreshing.get_untracked() {
            return;
        }
        refreshing.set(true);
        let services = services.clone();
        let toasts = toasts.clone();
        spawn_local(async move {
            let mut rng = rand::thread_rng();
            let next = refresh(
                &services.delay,
                services.config.dashboard_refresh_delay,
                stats.get_untracked(),
                &mut rng,
            )
            .await;
            let previous = stats.get_untracked();
            stats.set(next);
            refreshing.set(false);
            if next.critical_cases > previous.critical_cases {
                toasts.show(
                    format!("{} critical cases open", next.critical_cases),
                    Severity::Warning,
                    Some("Critical cases rising".to_owned()),
                );
            } else {
                toasts.success("Dashboard updated");
            }
        });
    };

    let stat = move |read: fn(&DashboardStats) -> String| Signal::derive(move || stats.with(read));

    view! {
      <section>
        <header class="page-header">
          <div>
            <h1>{greeting}</h1>
            <Show when=is_admin.clone() fallback=|| ()>
              <p class="meta">"Signed in with administrator access"</p>
            </Show>
          </div>
          <button on:click=on_refresh disabled=move || refreshing.get()>
            {move || if refreshing.get() { "Refreshing…" } else { "Refresh" }}
          </button>
        </header>
        <div class="stats">
          <StatCard label="Active emergencies" value=stat(|s| s.active_emergencies.to_string())/>
          <StatCard label="Available teams" value=stat(|s| s.available_teams.to_string())/>
          <StatCard label="Avg. response time" value=stat(|s| format!("{:.1} min", s.avg_response_time))/>
          <StatCard label="Success rate" value=stat(|s| format!("{}%", s.success_rate))/>
          <StatCard label="Total patients" value=stat(|s| s.total_patients.to_string())/>
          <StatCard label="Critical cases" value=stat(|s| s.critical_cases.to_string())/>
        </div>
        <div class="grid two">
          <article class="card">
            <h3>"Recent alerts"</h3>
            <ul class="list">
              {alerts()
                  .into_iter()
                  .map(|a| view! {
                    <li>
                      <Chip label=a.kind.clone() kind=alert_class(a.severity)/>
                      <span>{a.location}</span>
                      <span class="meta">{format!("{} · {}", a.timestamp, a.status)}</span>
                    </li>
                  })
                  .collect_view()}
            </ul>
          </article>
          <article class="card">
            <h3>"Team on shift"</h3>
            <ul class="list">
              {team_members()
                  .into_iter()
                  .map(|m| view! {
                    <li>
                      <span>{m.name}</span>
                      <span class="meta">{m.role}</span>
                      <Chip label=m.status.as_str() kind=team_class(m.status)/>
                    </li>
                  })
                  .collect_view()}
            </ul>
          </article>
        </div>
      </section>
    }
}
