use crate::state::use_toasts;
use leptos::*;

#[component]
pub fn ToastStack() -> impl IntoView {
    let toasts = use_toasts();
    let items = toasts.items;
    view! {
      <div class="toasts" aria-live="polite">
        <For
          each=move || items.get()
          key=|n| n.id.clone()
          children=move |n| {
            let toasts = toasts.clone();
            let id = n.id.clone();
            view! {
              <div class=format!("toast {}", n.severity.as_str())>
                {n.title.clone().map(|t| view! { <b>{t}</b> })}
                <span>{n.message.clone()}</span>
                <button class="link" on:click=move |_| toasts.dismiss(&id)>"×"</button>
              </div>
            }
          }
        />
      </div>
    }
}
