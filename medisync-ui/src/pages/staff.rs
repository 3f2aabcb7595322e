use super::use_fixture;
use crate::components::{Chip, Loading, SearchBox};
use crate::state::{use_auth, use_toasts};
use leptos::*;
use medisync_core::records::staff::{self, on_duty_count, roles, DutyStatus, StaffFilter};
use medisync_core::records::PageRequest;

#[component]
pub fn StaffPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let store = use_fixture(staff::fixture);
    let search = create_rw_signal(String::new());
    let role = create_rw_signal(None::<String>);
    let status = create_rw_signal(None::<DutyStatus>);
    let can_manage = move || auth.has_permission("manage_staff");

    let visible = move || {
        let filter = StaffFilter {
            role: role.get(),
            status: status.get(),
        };
        let term = search.get();
        store.with(|s| {
            s.as_ref()
                .map(|s| s.query(&term, |m| filter.matches(m), PageRequest::everything()).items)
                .unwrap_or_default()
        })
    };
    let role_options =
        move || store.with(|s| s.as_ref().map(|s| roles(s.all())).unwrap_or_default());
    let on_duty = move || store.with(|s| s.as_ref().map_or(0, |s| on_duty_count(s.all())));

    let toggle_duty = Callback::new(move |id: u32| {
        store.update(|s| {
            let Some(s) = s else { return };
            let Some(mut member) = s.get(id).cloned() else {
                return;
            };
            member.status = match member.status {
                DutyStatus::OnDuty => DutyStatus::OffDuty,
                DutyStatus::OffDuty | DutyStatus::OnCall => DutyStatus::OnDuty,
            };
            match s.update(id, member) {
                Ok(m) => toasts.success(format!("{} is now {}", m.name, m.status.as_str())),
                Err(err) => toasts.error(err.to_string()),
            }
        });
    });

    view! {
      <section>
        <h1>"Staff"</h1>
        <div class="stats">
          <div class="stat"><b>{on_duty}</b>" on duty"</div>
          <div class="stat"><b>{move || store.with(|s| s.as_ref().map_or(0, |s| s.len()))}</b>" total"</div>
        </div>
        <div class="filters">
          <SearchBox value=search placeholder="Search by name or role"/>
          <select on:change=move |ev| {
              let value = event_target_value(&ev);
              role.set((value != "all").then_some(value));
          }>
            <option value="all">"All roles"</option>
            {move || role_options()
                .into_iter()
                .map(|r| view! { <option value=r.clone()>{r.clone()}</option> })
                .collect_view()}
          </select>
          <select on:change=move |ev| status.set(DutyStatus::parse(&event_target_value(&ev)))>
            <option value="all">"All statuses"</option>
            {DutyStatus::ALL
                .into_iter()
                .map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
                .collect_view()}
          </select>
        </div>
        <Show when=move || store.with(Option::is_some) fallback=|| view! { <Loading/> }>
          <div class="grid">
            <For
              each=visible
              key=|m| (m.id, m.status.as_str())
              children={
                let can_manage = can_manage.clone();
                move |m| {
                  let id = m.id;
                  let can_manage = can_manage.clone();
                  let rating = m.performance.rating.map(|r| format!(" · rated {r:.1}"));
                  view! {
                    <article class="card">
                      <header>
                        <span class="avatar">{m.initials()}</span>
                        <div>
                          <h3>{m.name.clone()}</h3>
                          <div class="meta">
                            {m.role.clone()}
                            {m.specialty.clone().map(|s| format!(" · {s}"))}
                          </div>
                        </div>
                        <Chip label=m.status.as_str() kind=m.status.as_str()/>
                      </header>
                      <p class="meta">{format!("{} · {}", m.hospital, m.location)}</p>
                      <p class="meta">{format!("{} · {}", m.phone, m.email)}</p>
                      <p>{format!("Shift {} · {} experience", m.shift, m.experience)}</p>
                      <p>
                        {format!(
                            "{} cases · {:.1} min response · {:.0}% success",
                            m.performance.cases_handled,
                            m.performance.response_time,
                            m.performance.success_rate,
                        )}
                        {rating}
                      </p>
                      <div class="chips">
                        {m.certifications.iter().map(|c| view! { <Chip label=c.clone() kind="tag"/> }).collect_view()}
                      </div>
                      <ul class="shifts">
                        {m.upcoming_shifts
                            .iter()
                            .map(|s| view! { <li>{format!("{} {} at {}", s.date, s.time, s.hospital)}</li> })
                            .collect_view()}
                      </ul>
                      <footer class="meta">
                        {m.last_active.clone().map(|t| format!("Last active {t}"))}
                        <Show when=move || can_manage() fallback=|| ()>
                          <button class="link" on:click=move |_| toggle_duty.call(id)>"Toggle duty"</button>
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
