use super::use_fixture;
use crate::components::{Chip, Loading, Pager, SearchBox};
use crate::state::{use_auth, use_services, use_toasts};
use leptos::*;
use medisync_core::records::appointments::{
    self, status_counts, AppointmentStatus, AppointmentTab, ROWS_PER_PAGE_OPTIONS,
};
use medisync_core::records::PageRequest;

#[component]
pub fn AppointmentsPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let services = use_services();
    let store = use_fixture(appointments::fixture);
    let search = create_rw_signal(String::new());
    let tab = create_rw_signal(AppointmentTab::All);
    let current = create_rw_signal(0usize);
    let rows_per_page = create_rw_signal(services.config.rows_per_page);
    let can_manage = move || auth.has_permission("manage_appointments");

    // A new search, tab or page size starts again from the first page.
    create_effect(move |_| {
        search.with(|_| ());
        tab.with(|_| ());
        rows_per_page.with(|_| ());
        current.set(0);
    });

    let page = Signal::derive(move || {
        let term = search.get();
        let tab = tab.get();
        let request = PageRequest::new(current.get(), rows_per_page.get());
        store.with(|s| {
            s.as_ref()
                .map(|s| s.query(&term, |a| tab.admits(a.status), request))
        })
    });
    let counts = move || {
        store.with(|s| s.as_ref().map(|s| status_counts(s.all())).unwrap_or_default())
    };

    let cancel = Callback::new(move |id: u32| {
        store.update(|s| {
            let Some(s) = s else { return };
            let Some(mut appointment) = s.get(id).cloned() else {
                return;
            };
            appointment.status = AppointmentStatus::Cancelled;
            match s.update(id, appointment) {
                Ok(a) => toasts.success(format!("Appointment with {} cancelled", a.patient_name)),
                Err(err) => toasts.error(err.to_string()),
            }
        });
    });

    view! {
      <section>
        <h1>"Appointments"</h1>
        <div class="stats">
          <div class="stat"><b>{move || counts().scheduled}</b>" scheduled"</div>
          <div class="stat"><b>{move || counts().completed}</b>" completed"</div>
          <div class="stat"><b>{move || counts().cancelled}</b>" cancelled"</div>
          <div class="stat"><b>{move || counts().no_show}</b>" no-show"</div>
        </div>
        <div class="tabs" role="tablist">
          {AppointmentTab::ALL
              .into_iter()
              .map(|t| view! {
                <button
                  role="tab"
                  class:active=move || tab.get() == t
                  on:click=move |_| tab.set(t)
                >{t.label()}</button>
              })
              .collect_view()}
        </div>
        <div class="filters">
          <SearchBox value=search placeholder="Search by patient, doctor or type"/>
          <label>
            "Rows per page "
            <select on:change=move |ev| {
                if let Ok(n) = event_target_value(&ev).parse::<usize>() {
                    rows_per_page.set(n);
                }
            }>
              {ROWS_PER_PAGE_OPTIONS
                  .into_iter()
                  .map(|n| view! {
                    <option value=n.to_string() selected=move || rows_per_page.get() == n>{n}</option>
                  })
                  .collect_view()}
            </select>
          </label>
        </div>
        <Show when=move || store.with(Option::is_some) fallback=|| view! { <Loading/> }>
          <table>
            <thead>
              <tr>
                <th>"Patient"</th><th>"Doctor"</th><th>"Date"</th><th>"Time"</th>
                <th>"Type"</th><th>"Status"</th><th>"Notes"</th><th></th>
              </tr>
            </thead>
            <tbody>
              <For
                each=move || page.get().map(|p| p.items).unwrap_or_default()
                key=|a| (a.id, a.status.as_str())
                children={
                  let can_manage = can_manage.clone();
                  move |a| {
                    let id = a.id;
                    let scheduled = a.status == AppointmentStatus::Scheduled;
                    let can_manage = can_manage.clone();
                    view! {
                      <tr>
                        <td>{a.patient_name.clone()}<div class="meta">{a.patient_id.clone()}</div></td>
                        <td>{a.doctor_name.clone()}</td>
                        <td>{a.date.clone()}</td>
                        <td>{a.time.clone()}</td>
                        <td>{a.kind.clone()}</td>
                        <td><Chip label=a.status.as_str() kind=a.status.as_str()/></td>
                        <td class="meta">{a.notes.clone().unwrap_or_default()}</td>
                        <td>
                          <Show when=move || scheduled && can_manage() fallback=|| ()>
                            <button class="link danger" on:click=move |_| cancel.call(id)>"Cancel"</button>
                          </Show>
                        </td>
                      </tr>
                    }
                  }
                }
              />
            </tbody>
          </table>
          <Pager page=page current=current/>
        </Show>
      </section>
    }
}
