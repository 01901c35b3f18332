use std::env;

fn main() {
    println!("cargo:rustc-check-cfg=cfg(armv6m)");

    // Software cannot rely on reading the debug registers on ARMv6-M
    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("thumbv6m-") {
        println!("cargo:rustc-cfg=armv6m");
    }
}
