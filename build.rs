//! Generates `include/accpeaks.h` for C callers of the `accp_*` functions.

use std::env;
use std::path::PathBuf;

const HEADER_NAME: &str = "accpeaks.h";

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let include_dir = crate_dir.join("include");
    std::fs::create_dir_all(&include_dir).unwrap();

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("ACCPEAKS_H")
        .with_cpp_compat(true)
        .with_documentation(true)
        .with_header("/* Peak detection for accelerometry series. Generated, do not edit. */")
        .generate()
        .expect("failed to generate accpeaks C header");
    bindings.write_to_file(include_dir.join(HEADER_NAME));

    println!("cargo:rerun-if-changed=src/ffi");
    println!("cargo:rerun-if-changed=src/data/peak.rs");
    println!("cargo:rerun-if-changed=src/stage/traits.rs");
}
