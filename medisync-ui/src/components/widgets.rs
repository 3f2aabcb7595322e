use leptos::*;
use medisync_core::records::Page;

#[component]
pub fn SearchBox(value: RwSignal<String>, #[prop(into)] placeholder: String) -> impl IntoView {
    view! {
      <input
        class="search"
        type="search"
        placeholder=placeholder
        prop:value=move || value.get()
        on:input=move |ev| value.set(event_target_value(&ev))
      />
    }
}

/// One dismissible banner for a failed simulated call.
#[component]
pub fn ErrorBanner(
    error: Signal<Option<String>>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    view! {
      <Show when=move || error.with(Option::is_some) fallback=|| ()>
        <div class="banner error" role="alert">
          <span>{move || error.get().unwrap_or_default()}</span>
          <button class="link" on:click=move |_| on_dismiss.call(())>"Dismiss"</button>
        </div>
      </Show>
    }
}

#[component]
pub fn Loading() -> impl IntoView {
    view! { <div class="loading" aria-busy="true">"Loading…"</div> }
}

/// Previous/next controls under a paginated table.
#[component]
pub fn Pager<R: Clone + 'static>(
    page: Signal<Option<Page<R>>>,
    current: RwSignal<usize>,
) -> impl IntoView {
    let count = move || page.with(|p| p.as_ref().map_or(1, |p| p.page_count().max(1)));
    let total = move || page.with(|p| p.as_ref().map_or(0, |p| p.total));
    view! {
      <div class="pager">
        <span class="meta">{move || format!("{} results", total())}</span>
        <button
          disabled=move || current.get() == 0
          on:click=move |_| current.update(|c| *c = c.saturating_sub(1))
        >"Previous"</button>
        <span>{move || format!("Page {} of {}", current.get() + 1, count())}</span>
        <button
          disabled=move || current.get() + 1 >= count()
          on:click=move |_| current.update(|c| *c += 1)
        >"Next"</button>
      </div>
    }
}

/// A status chip; `kind` becomes part of the CSS class.
#[component]
pub fn Chip(#[prop(into)] label: String, #[prop(into)] kind: String) -> impl IntoView {
    view! { <span class=format!("chip {kind}")>{label}</span> }
}
