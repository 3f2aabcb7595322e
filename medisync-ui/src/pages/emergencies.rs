use super::use_fixture;
use crate::components::{Chip, Loading, SearchBox};
use crate::state::{use_auth, use_toasts};
use leptos::*;
use medisync_core::records::emergencies::{
    self, active_high_priority, status_filter, EmergencySeverity, EmergencyStatus,
};
use medisync_core::records::PageRequest;

fn severity_class(severity: EmergencySeverity) -> &'static str {
    match severity {
        EmergencySeverity::High => "error",
        EmergencySeverity::Medium => "warning",
        EmergencySeverity::Low => "success",
    }
}

#[component]
pub fn EmergenciesPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let store = use_fixture(emergencies::fixture);
    let search = create_rw_signal(String::new());
    let status = create_rw_signal(None::<EmergencyStatus>);
    let can_update = move || {
        auth.has_permission("update_emergencies") || auth.has_permission("manage_emergencies")
    };

    let visible = move || {
        let term = search.get();
        let filter = status_filter(status.get());
        store.with(|s| {
            s.as_ref()
                .map(|s| s.query(&term, &filter, PageRequest::everything()).items)
                .unwrap_or_default()
        })
    };
    let high_priority =
        move || store.with(|s| s.as_ref().map_or(0, |s| active_high_priority(s.all())));

    let set_status = Callback::new(move |(id, next): (u32, EmergencyStatus)| {
        store.update(|s| {
            let Some(s) = s else { return };
            let Some(mut emergency) = s.get(id).cloned() else {
                return;
            };
            emergency.status = next;
            if next == EmergencyStatus::Stable {
                emergency.progress = 100;
            }
            match s.update(id, emergency) {
                Ok(e) => toasts.success(format!("{} marked {}", e.kind, e.status.as_str())),
                Err(err) => toasts.error(err.to_string()),
            }
        });
    });

    view! {
      <section>
        <h1>"Emergency Cases"</h1>
        <div class="stats">
          <div class="stat"><b>{move || store.with(|s| s.as_ref().map_or(0, |s| s.len()))}</b>" open cases"</div>
          <div class="stat"><b>{high_priority}</b>" high priority"</div>
        </div>
        <div class="filters">
          <SearchBox value=search placeholder="Search by type or location"/>
          <select on:change=move |ev| status.set(EmergencyStatus::parse(&event_target_value(&ev)))>
            <option value="all">"All statuses"</option>
            {EmergencyStatus::ALL
                .into_iter()
                .map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
                .collect_view()}
          </select>
        </div>
        <Show when=move || store.with(Option::is_some) fallback=|| view! { <Loading/> }>
          <div class="grid">
            <For
              each=visible
              key=|e| (e.id, e.status.as_str())
              children={
                let can_update = can_update.clone();
                move |e| {
                  let id = e.id;
                  let current = e.status;
                  let can_update = can_update.clone();
                  view! {
                    <article class="card">
                      <header>
                        <h3>{e.kind.clone()}</h3>
                        <Chip label=e.status.as_str() kind=e.status.as_str()/>
                        <Chip label=e.severity.as_str() kind=severity_class(e.severity)/>
                      </header>
                      <p class="meta">{format!("{} · reported {}", e.location, e.time_reported)}</p>
                      <p>{e.description.clone()}</p>
                      <p class="meta">
                        {e.assigned_hospital.clone().unwrap_or_else(|| "No hospital assigned".to_owned())}
                        {e.assigned_ambulance.clone().map(|a| format!(" · {a}"))}
                        {e.eta.clone().map(|eta| format!(" · ETA {eta}"))}
                      </p>
                      <progress max="100" value=e.progress.to_string()></progress>
                      <Show when=move || can_update() fallback=|| ()>
                        <select on:change=move |ev| {
                            if let Some(next) = EmergencyStatus::parse(&event_target_value(&ev)) {
                                set_status.call((id, next));
                            }
                        }>
                          {EmergencyStatus::ALL
                              .into_iter()
                              .map(|s| view! { <option value=s.as_str() selected=s == current>{s.as_str()}</option> })
                              .collect_view()}
                        </select>
                      </Show>
                    </article>
                  }
                }
              }
            />
          </div>
        </Show>
      </section>
    }
}
