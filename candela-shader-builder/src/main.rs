use std::{env, fs};

use spirv_builder::{Capability, MetadataPrintout, SpirvBuilder};

fn main() {
    // HACK spirv-builder compiles into the regular `target` directory, which
    //      invalidates the host artifacts whenever shaders and host builds
    //      alternate; pretending to be a nested Cargo invocation makes
    //      spirv-builder pick its own --target-dir and keeps both caches
    //      intact.
    env::set_var("PROFILE", "release");
    env::set_var("OUT_DIR", "../target/spirv/release/build/shader/out");

    let compile_result =
        SpirvBuilder::new("../candela-shaders", "spirv-unknown-spv1.5")
            .print_metadata(MetadataPrintout::None)
            .capability(Capability::Int8)
            .capability(Capability::ImageQuery)
            .release(true)
            .build()
            .unwrap();

    fs::copy(
        compile_result.module.unwrap_single(),
        "target/candela-shaders.spv",
    )
    .unwrap();
}
