use std::path::PathBuf;

fn main() {
    let crate_dir =
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    println!("cargo:rerun-if-changed=src");

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("KEYLINK_H")
        .generate();

    // Header generation failures are reported, not fatal.
    match bindings {
        Ok(bindings) => {
            let include = crate_dir.join("include");
            if std::fs::create_dir_all(&include).is_ok() {
                bindings.write_to_file(include.join("keylink.h"));
            }
        }
        Err(e) => println!("cargo:warning=cbindgen: {e}"),
    }
}
