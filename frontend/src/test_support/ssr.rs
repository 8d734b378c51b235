//! Host-side rendering harness for panel tests. Views render to static HTML
//! under a throwaway reactive runtime, with resource loading suppressed so no
//! network effect ever fires.

use leptos::*;

/// Runs `f` inside a fresh reactive runtime and disposes the runtime before
/// returning, so signals from one test never leak into the next.
pub fn with_runtime<T>(f: impl FnOnce() -> T) -> T {
    let runtime = leptos::create_runtime();
    let result = f();
    runtime.dispose();
    result
}

/// Renders a view to its HTML string for markup assertions.
pub fn render_to_string<F, N>(view: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView + 'static,
{
    leptos_reactive::suppress_resource_load(true);
    let html = with_runtime(move || view().into_view().render_to_string().to_string());
    leptos_reactive::suppress_resource_load(false);
    html
}
