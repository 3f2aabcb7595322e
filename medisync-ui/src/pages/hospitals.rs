use super::use_fixture;
use crate::components::{Chip, Loading, SearchBox};
use crate::state::{use_auth, use_toasts};
use leptos::*;
use medisync_core::records::hospitals::{self, capacity_summary, HospitalFilter, HospitalStatus};
use medisync_core::records::PageRequest;

#[component]
pub fn HospitalsPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let store = use_fixture(hospitals::fixture);
    let search = create_rw_signal(String::new());
    let status = create_rw_signal(None::<HospitalStatus>);
    let emergency_only = create_rw_signal(false);
    let can_manage = {
        let auth = auth.clone();
        move || auth.has_permission("manage_hospitals")
    };

    let visible = move || {
        let filter = HospitalFilter {
            status: status.get(),
            emergency_only: emergency_only.get(),
        };
        let term = search.get();
        store.with(|s| {
            s.as_ref()
                .map(|s| s.query(&term, |h| filter.matches(h), PageRequest::everything()).items)
                .unwrap_or_default()
        })
    };
    let summary = move || {
        store.with(|s| s.as_ref().map(|s| capacity_summary(s.all())).unwrap_or_default())
    };

    let remove = Callback::new(move |id: u32| {
        store.update(|s| {
            if let Some(s) = s {
                match s.delete(id) {
                    Ok(h) => toasts.success(format!("{} removed", h.name)),
                    Err(err) => toasts.error(err.to_string()),
                }
            }
        });
    });

    view! {
      <section>
        <h1>"Hospitals"</h1>
        <div class="stats">
          <div class="stat"><b>{move || summary().hospitals}</b>" facilities"</div>
          <div class="stat"><b>{move || summary().available_beds}</b>{move || format!(" of {} beds free", summary().total_beds)}</div>
          <div class="stat"><b>{move || summary().emergency_ready}</b>" accepting emergencies"</div>
        </div>
        <div class="filters">
          <SearchBox value=search placeholder="Search by name or location"/>
          <select on:change=move |ev| status.set(HospitalStatus::parse(&event_target_value(&ev)))>
            <option value="all">"All statuses"</option>
            {HospitalStatus::ALL
                .into_iter()
                .map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
                .collect_view()}
          </select>
          <label>
            <input
              type="checkbox"
              prop:checked=move || emergency_only.get()
              on:change=move |ev| emergency_only.set(event_target_checked(&ev))
            />
            " Emergency capacity only"
          </label>
        </div>
        <Show when=move || store.with(Option::is_some) fallback=|| view! { <Loading/> }>
          <div class="grid">
            <For
              each=visible
              key=|h| h.id
              children={
                let can_manage = can_manage.clone();
                move |h| {
                  let id = h.id;
                  let can_manage = can_manage.clone();
                  view! {
                    <article class="card">
                      <header>
                        <h3>{h.name.clone()}</h3>
                        <Chip label=h.status.as_str() kind=h.status.as_str()/>
                      </header>
                      <p class="meta">{h.location.clone()}</p>
                      <p>{format!("{} / {} beds available ({}% occupied)", h.available_beds, h.total_beds, h.occupancy_rate)}</p>
                      <p class="meta">{format!("{} · {}", h.phone, h.email)}</p>
                      <div class="chips">
                        {h.specialties.iter().map(|s| view! { <Chip label=s.clone() kind="tag"/> }).collect_view()}
                      </div>
                      <ul class="departments">
                        {h.departments
                            .iter()
                            .map(|d| view! {
                              <li>{format!("{}: {}/{} beds", d.name, d.available_beds, d.total_beds)}</li>
                            })
                            .collect_view()}
                      </ul>
                      <footer class="meta">
                        {format!("Updated {}", h.last_updated)}
                        <Show when=move || can_manage() fallback=|| ()>
                          <button class="link danger" on:click=move |_| remove.call(id)>"Delete"</button>
                        </Show>
                      </footer>
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
