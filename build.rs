use std::env;

fn main() {
    println!("cargo:rustc-check-cfg=cfg(has_execinfo)");
    println!("cargo:rerun-if-changed=build.rs");

    let os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_env = env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();

    // `backtrace(3)` and `backtrace_symbols(3)` live in glibc and in the
    // macOS libSystem. musl and bionic don't ship <execinfo.h>.
    if (os == "linux" && target_env == "gnu") || os == "macos" {
        println!("cargo:rustc-cfg=has_execinfo");
    }
}
