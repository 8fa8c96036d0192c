use std::{env, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");

    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };

    let result = cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("JAR_FFI_H")
        .generate();

    match result {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("jar_ffi.h"));
        }
        Err(err) => println!("cargo:warning=jar_ffi.h not generated: {err}"),
    }
}
