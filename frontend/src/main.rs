use wasm_bindgen_futures::spawn_local;

use haven_frontend::{config, mount_app};

fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("Starting Haven frontend: initializing runtime config");

    spawn_local(async move {
        config::init().await;
        log::info!("Runtime config initialized");
        mount_app();
    });
}
