#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
mod contract;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = contract::run() {
        eprintln!("contract check failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
