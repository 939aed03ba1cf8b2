fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile proto files
    // BTreeMap keeps map fields ordered so identical requests encode identically
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .btree_map(["."])
        .compile_protos(&["proto/run_function.proto"], &["proto"])?;

    // Re-run if proto files change
    println!("cargo:rerun-if-changed=proto/run_function.proto");

    Ok(())
}
