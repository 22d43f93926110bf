fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile product catalog proto
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/product.proto"], &["proto/"])?;

    Ok(())
}
