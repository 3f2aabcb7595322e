use leptos::*;
use leptos_router::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
      <div class="not-found">
        <h1>"404"</h1>
        <p>"The page you are looking for does not exist."</p>
        <A href="/dashboard">"Back to dashboard"</A>
      </div>
    }
}
